use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Beta, Distribution};

use crate::action_selection::{ActionSelection, EnumActionSelection};
use crate::error::{BanditError, Result};

use super::Agent;

/// Beta-conjugate agent for binomial rewards.
///
/// Each arm carries a `Beta(alpha, beta)` posterior over its success probability,
/// starting from the uniform prior `Beta(1, 1)`. A reward of `r` successes out of
/// `n` adds `r` to `alpha` and `n - r` to `beta`. With `thompson` set, the policy
/// sees one posterior draw per arm (Thompson sampling); otherwise the posterior
/// means.
#[derive(Debug, Clone)]
pub struct BetaAgent {
    k: usize,
    n: u64,
    policy: EnumActionSelection,
    thompson: bool,
    rng: StdRng,
    alpha: Array1<f64>,
    beta: Array1<f64>,
    last_action: Option<usize>,
}

impl BetaAgent {
    pub fn new(
        k: usize,
        n: u64,
        policy: EnumActionSelection,
        thompson: bool,
        seed: u64,
    ) -> Result<Self> {
        if k < 1 || n < 1 {
            return Err(BanditError::InvalidParameter(format!(
                "a beta agent needs k >= 1 and n >= 1, got k={} n={}",
                k, n
            )));
        }
        Ok(Self {
            k,
            n,
            policy,
            thompson,
            rng: StdRng::seed_from_u64(seed),
            alpha: Array1::ones(k),
            beta: Array1::ones(k),
            last_action: None,
        })
    }

    pub fn alpha(&self) -> &Array1<f64> {
        &self.alpha
    }

    pub fn beta(&self) -> &Array1<f64> {
        &self.beta
    }

    /// Posterior means `alpha / (alpha + beta)`.
    pub fn posterior_means(&self) -> Array1<f64> {
        &self.alpha / &(&self.alpha + &self.beta)
    }

    fn value_estimates(&mut self) -> Result<Array1<f64>> {
        if !self.thompson {
            return Ok(self.posterior_means());
        }
        let mut draws: Array1<f64> = Array1::zeros(self.k);
        for i in 0..self.k {
            let posterior: Beta<f64> = Beta::new(self.alpha[i], self.beta[i])
                .map_err(|e| BanditError::Distribution(e.to_string()))?;
            draws[i] = posterior.sample(&mut self.rng);
        }
        Ok(draws)
    }
}

impl Agent for BetaAgent {
    fn choose(&mut self) -> Result<usize> {
        let values: Array1<f64> = self.value_estimates()?;
        let action: usize = self.policy.get_action(&values);
        self.last_action = Some(action);
        Ok(action)
    }

    fn observe(&mut self, reward: f64) -> Result<()> {
        let n: f64 = self.n as f64;
        if !(0.0..=n).contains(&reward) {
            return Err(BanditError::InvalidReward { reward, n: self.n });
        }
        let action: usize = self.last_action.take().ok_or(BanditError::AgentNotReady)?;
        self.alpha[action] += reward;
        self.beta[action] += n - reward;
        Ok(())
    }

    fn reset(&mut self) {
        self.alpha.fill(1.0);
        self.beta.fill(1.0);
        self.last_action = None;
        self.policy.reset();
    }

    fn name(&self) -> String {
        if self.thompson {
            format!("Bayesian {} (Thompson)", self.policy.name())
        } else {
            format!("Bayesian {}", self.policy.name())
        }
    }

    fn estimates(&self) -> Array1<f64> {
        self.posterior_means()
    }

    fn posterior(&self) -> Option<(Array1<f64>, Array1<f64>)> {
        Some((self.alpha.clone(), self.beta.clone()))
    }
}
