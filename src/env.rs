use kdam::tqdm;
use ndarray::Array2;
use tracing::info;

use crate::agent::Agent;
use crate::bandit::Bandit;
use crate::error::{BanditError, Result};

/// `(average_reward, average_optimal_fraction)`, both shaped `(trials, agents)`.
pub type RunResults = (Array2<f64>, Array2<f64>);

/// Runs a set of agents against one bandit, repeated over independent experiments.
pub struct Environment<'a, B: Bandit> {
    bandit: &'a mut B,
    agents: Vec<&'a mut dyn Agent>,
    label: String,
    show_progress: bool,
}

impl<'a, B: Bandit> Environment<'a, B> {
    pub fn new(bandit: &'a mut B, agents: Vec<&'a mut dyn Agent>, label: &str) -> Self {
        Self {
            bandit,
            agents,
            label: label.to_string(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bandit(&self) -> &B {
        &*self.bandit
    }

    pub fn agents(&self) -> &[&'a mut dyn Agent] {
        &self.agents
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    pub fn reset(&mut self) -> Result<()> {
        self.bandit.reset()?;
        for agent in self.agents.iter_mut() {
            agent.reset();
        }
        Ok(())
    }

    /// Every agent acts once per trial, in registration order, against the same
    /// bandit instance. Rewards and optimal hits are summed per `(trial, agent)`
    /// and averaged over `experiments`.
    pub fn run(&mut self, trials: usize, experiments: usize) -> Result<RunResults> {
        if experiments < 1 {
            return Err(BanditError::InvalidParameter(
                "experiments must be at least 1".to_string(),
            ));
        }
        info!(
            label = %self.label,
            trials,
            experiments,
            agents = self.agents.len(),
            "starting run"
        );
        let mut scores: Array2<f64> = Array2::zeros((trials, self.agents.len()));
        let mut optimal: Array2<f64> = Array2::zeros((trials, self.agents.len()));

        let experiment_iter: Box<dyn Iterator<Item = usize>> = if self.show_progress {
            Box::new(tqdm!(0..experiments))
        } else {
            Box::new(0..experiments)
        };
        for _ in experiment_iter {
            self.reset()?;
            for t in 0..trials {
                for (i, agent) in self.agents.iter_mut().enumerate() {
                    let action: usize = agent.choose()?;
                    let (reward, is_optimal) = self.bandit.pull(action)?;
                    agent.observe(reward)?;

                    scores[[t, i]] += reward;
                    if is_optimal {
                        optimal[[t, i]] += 1.0;
                    }
                }
            }
        }

        scores /= experiments as f64;
        optimal /= experiments as f64;
        info!(label = %self.label, "run finished");
        Ok((scores, optimal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_selection::{EpsilonGreedy, UpperConfidenceBound};
    use crate::agent::{BetaAgent, ValueAgent};
    use crate::bandit::{BernoulliBandit, MultiArmedBandit};
    use ndarray::Array1;

    struct ConstantAgent {
        action: usize,
        rewards: Vec<f64>,
        resets: usize,
    }

    impl ConstantAgent {
        fn new(action: usize) -> Self {
            Self {
                action,
                rewards: vec![],
                resets: 0,
            }
        }
    }

    impl Agent for ConstantAgent {
        fn choose(&mut self) -> Result<usize> {
            Ok(self.action)
        }

        fn observe(&mut self, reward: f64) -> Result<()> {
            self.rewards.push(reward);
            Ok(())
        }

        fn reset(&mut self) {
            self.resets += 1;
        }

        fn name(&self) -> String {
            format!("always {}", self.action)
        }

        fn estimates(&self) -> Array1<f64> {
            let mut values: Array1<f64> = Array1::zeros(self.action + 1);
            values[self.action] = 1.0;
            values
        }
    }

    #[test]
    fn results_have_trials_by_agents_shape() {
        let mut bandit = MultiArmedBandit::new(3).unwrap();
        let mut a = ConstantAgent::new(0);
        let mut b = ConstantAgent::new(2);
        let mut env = Environment::new(
            &mut bandit,
            vec![&mut a as &mut dyn Agent, &mut b],
            "shape",
        );
        let (scores, optimal) = env.run(17, 3).unwrap();
        assert_eq!(scores.dim(), (17, 2));
        assert_eq!(optimal.dim(), (17, 2));
        assert!(optimal.iter().all(|v| *v == 1.0));
        assert!(scores.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn agents_are_reset_once_per_experiment() {
        let mut bandit = MultiArmedBandit::new(2).unwrap();
        let mut agent = ConstantAgent::new(1);
        {
            let mut env = Environment::new(
                &mut bandit,
                vec![&mut agent as &mut dyn Agent],
                "resets",
            );
            env.run(5, 4).unwrap();
        }
        assert_eq!(agent.resets, 4);
        assert_eq!(agent.rewards.len(), 20);
    }

    #[test]
    fn single_experiment_returns_raw_observations() {
        let mut bandit = BernoulliBandit::new(3, Some(vec![0.3, 0.5, 0.2]), None, 6).unwrap();
        let mut agent = ConstantAgent::new(1);
        let scores = {
            let mut env = Environment::new(&mut bandit, vec![&mut agent as &mut dyn Agent], "raw");
            let (scores, optimal) = env.run(50, 1).unwrap();
            assert!(optimal.iter().all(|v| *v == 1.0));
            scores
        };
        let observed: Vec<f64> = scores.column(0).to_vec();
        assert_eq!(observed, agent.rewards);
    }

    #[test]
    fn zero_experiments_is_rejected() {
        let mut bandit = MultiArmedBandit::new(2).unwrap();
        let mut env = Environment::new(&mut bandit, vec![], "empty");
        assert!(matches!(
            env.run(10, 0),
            Err(BanditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_trials_gives_empty_matrices() {
        let mut bandit = MultiArmedBandit::new(2).unwrap();
        let mut agent = ConstantAgent::new(0);
        let mut env = Environment::new(
            &mut bandit,
            vec![&mut agent as &mut dyn Agent],
            "no trials",
        );
        let (scores, optimal) = env.run(0, 2).unwrap();
        assert_eq!(scores.dim(), (0, 1));
        assert_eq!(optimal.dim(), (0, 1));
    }

    #[test]
    fn bandit_errors_abort_the_run() {
        let mut bandit = MultiArmedBandit::new(2).unwrap();
        let mut agent = ConstantAgent::new(5);
        let mut env = Environment::new(
            &mut bandit,
            vec![&mut agent as &mut dyn Agent],
            "bad action",
        );
        assert_eq!(
            env.run(3, 2),
            Err(BanditError::ActionOutOfRange { action: 5, k: 2 })
        );
    }

    #[test]
    fn label_and_names_are_exposed() {
        let mut bandit = MultiArmedBandit::new(2).unwrap();
        let mut a = ConstantAgent::new(0);
        let mut b = ConstantAgent::new(1);
        let env = Environment::new(
            &mut bandit,
            vec![&mut a as &mut dyn Agent, &mut b],
            "Bayesian Bandits",
        );
        assert_eq!(env.label(), "Bayesian Bandits");
        assert_eq!(env.agent_names(), vec!["always 0", "always 1"]);
        assert_eq!(env.bandit().k(), 2);
        assert_eq!(env.agents().len(), 2);
    }

    #[test]
    fn progress_bar_does_not_change_results() {
        let mut bandit = MultiArmedBandit::new(3).unwrap();
        let mut agent = ConstantAgent::new(2);
        let (scores, optimal) = {
            let mut env = Environment::new(
                &mut bandit,
                vec![&mut agent as &mut dyn Agent],
                "progress",
            )
            .with_progress(true);
            env.run(3, 2).unwrap()
        };
        assert_eq!(scores.dim(), (3, 1));
        assert!(optimal.iter().all(|v| *v == 1.0));
        assert_eq!(agent.resets, 2);
        assert_eq!(agent.rewards.len(), 6);
    }

    #[test]
    fn agent_beliefs_cover_every_arm_after_a_run() {
        let k: usize = 4;
        let mut bandit = BernoulliBandit::new(k, None, None, 11).unwrap();
        let mut ucb = ValueAgent::new(k, UpperConfidenceBound::new(1.0).into(), 0.0, None).unwrap();
        let mut beta = BetaAgent::new(k, 1, EpsilonGreedy::greedy(1).into(), true, 2).unwrap();
        let mut env = Environment::new(
            &mut bandit,
            vec![&mut ucb as &mut dyn Agent, &mut beta],
            "beliefs",
        );
        env.run(100, 2).unwrap();

        for agent in env.agents() {
            let estimates: Array1<f64> = agent.estimates();
            assert_eq!(estimates.len(), env.bandit().k());
            assert!(estimates.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        assert!(env.agents()[0].posterior().is_none());
        let (alpha, beta) = env.agents()[1].posterior().unwrap();
        assert_eq!(alpha.len(), k);
        // 100 bernoulli observations on top of the Beta(1, 1) prior
        assert_eq!(alpha.sum() + beta.sum(), 2.0 * k as f64 + 100.0);
    }
}
