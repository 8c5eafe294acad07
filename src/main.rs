use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use ndarray::Array2;
use serde_json::{json, Value};
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use multi_armed_bandits::action_selection::{EpsilonGreedy, UpperConfidenceBound};
use multi_armed_bandits::agent::{BetaAgent, ValueAgent};
use multi_armed_bandits::bandit::{BernoulliBandit, BinomialBandit, GaussianBandit};
use multi_armed_bandits::utils::moving_average;
use multi_armed_bandits::{Agent, Bandit, EnumBandit, Environment};

const N_AGENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum BanditKind {
    Bernoulli,
    Binomial,
    Gaussian,
}

impl FromStr for BanditKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bernoulli" => Ok(Self::Bernoulli),
            "binomial" => Ok(Self::Binomial),
            "gaussian" => Ok(Self::Gaussian),
            _ => Err(format!(
                "unknown bandit '{}', use bernoulli, binomial or gaussian",
                s
            )),
        }
    }
}

/// Run an epsilon-greedy, an UCB and a Bayesian agent against a multi-armed bandit
/// and report their average reward and optimal action rate
#[derive(StructOpt, Debug)]
#[structopt(name = "RLRust - Multi-Armed Bandits")]
struct Cli {
    /// Reward distribution of the arms: bernoulli, binomial or gaussian
    #[structopt(long = "bandit", default_value = "bernoulli")]
    bandit: BanditKind,

    /// Number of arms of the bandit
    #[structopt(long = "n_arms", short = "k", default_value = "10")]
    n_arms: usize,

    /// Number of time steps of each experiment
    #[structopt(long = "n_trials", short = "t", default_value = "1000")]
    n_trials: usize,

    /// Number of independent experiments to average over
    #[structopt(long = "n_experiments", short = "e", default_value = "500")]
    n_experiments: usize,

    /// Trials per pull of the binomial bandit
    #[structopt(long = "binomial_trials", default_value = "5")]
    binomial_trials: u64,

    /// Mean of the prior used to draw the gaussian arm values
    #[structopt(long = "mu", default_value = "0.0")]
    mu: f64,

    /// Spread of the prior used to draw the gaussian arm values
    #[structopt(long = "sigma", default_value = "1.0")]
    sigma: f64,

    /// Pre-sample the rewards of each experiment at reset (bernoulli and binomial)
    #[structopt(long = "presample")]
    presample: bool,

    /// Exploration ratio of the epsilon-greedy agent
    #[structopt(long = "epsilon", default_value = "0.1")]
    epsilon: f64,

    /// Confidence level for the UCB action selection strategy
    #[structopt(long = "confidence_level", default_value = "1.0")]
    confidence_level: f64,

    /// Seed shared by the bandit and the agents
    #[structopt(long = "seed", default_value = "0")]
    seed: u64,

    /// Label of the experiment
    #[structopt(long = "label", default_value = "Bayesian Bandits")]
    label: String,

    /// Moving average window used to summarize the results
    #[structopt(long = "moving_average_window", default_value = "50")]
    moving_average_window: usize,

    /// Show a progress bar over the experiments
    #[structopt(long = "show_progress")]
    show_progress: bool,

    /// Write the averaged curves as JSON to this file
    #[structopt(long = "output", short = "o", parse(from_os_str))]
    output: Option<PathBuf>,
}

fn build_bandit(cli: &Cli) -> Result<EnumBandit> {
    let horizon: Option<usize> = if cli.presample {
        Some(cli.n_trials * N_AGENTS)
    } else {
        None
    };
    let bandit: EnumBandit = match cli.bandit {
        BanditKind::Bernoulli => BernoulliBandit::new(cli.n_arms, None, horizon, cli.seed)?.into(),
        BanditKind::Binomial => {
            BinomialBandit::new(cli.n_arms, cli.binomial_trials, None, horizon, cli.seed)?.into()
        }
        BanditKind::Gaussian => {
            GaussianBandit::new(cli.n_arms, cli.mu, cli.sigma, cli.seed)?.into()
        }
    };
    Ok(bandit)
}

fn tail_mean(window: usize, column: &[f64]) -> f64 {
    moving_average(window, column).last().copied().unwrap_or(0.0)
}

fn columns(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.columns().into_iter().map(|c| c.to_vec()).collect()
}

/// Seeds of the agents are offsets of the bandit seed.
fn derived_seed(seed: u64, offset: u64) -> u64 {
    seed.wrapping_add(offset)
}

fn beliefs(agent: &dyn Agent) -> Value {
    let mut belief = json!({
        "name": agent.name(),
        "estimates": agent.estimates().to_vec(),
    });
    if let Some((alpha, beta)) = agent.posterior() {
        belief["alpha"] = json!(alpha.to_vec());
        belief["beta"] = json!(beta.to_vec());
    }
    belief
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli: Cli = Cli::from_args();

    let mut bandit: EnumBandit = build_bandit(&cli)?;

    let mut epsilon_greedy = ValueAgent::new(
        cli.n_arms,
        EpsilonGreedy::new(cli.epsilon, derived_seed(cli.seed, 1)).into(),
        0.0,
        None,
    )?;
    let mut ucb = ValueAgent::new(
        cli.n_arms,
        UpperConfidenceBound::new(cli.confidence_level).into(),
        0.0,
        None,
    )?;
    let mut bayesian: Box<dyn Agent> = match cli.bandit {
        BanditKind::Bernoulli => Box::new(BetaAgent::new(
            cli.n_arms,
            1,
            EpsilonGreedy::greedy(derived_seed(cli.seed, 2)).into(),
            true,
            derived_seed(cli.seed, 3),
        )?),
        BanditKind::Binomial => Box::new(BetaAgent::new(
            cli.n_arms,
            cli.binomial_trials,
            EpsilonGreedy::greedy(derived_seed(cli.seed, 2)).into(),
            true,
            derived_seed(cli.seed, 3),
        )?),
        // optimistic initial values drive exploration on unbounded rewards
        BanditKind::Gaussian => Box::new(ValueAgent::new(
            cli.n_arms,
            EpsilonGreedy::greedy(derived_seed(cli.seed, 2)).into(),
            cli.mu + 5.0 * cli.sigma,
            None,
        )?),
    };

    let mut env = Environment::new(
        &mut bandit,
        vec![&mut epsilon_greedy as &mut dyn Agent, &mut ucb, bayesian.as_mut()],
        &cli.label,
    )
    .with_progress(cli.show_progress);

    let now: Instant = Instant::now();
    let (scores, optimal) = env.run(cli.n_trials, cli.n_experiments)?;
    let elapsed: std::time::Duration = now.elapsed();
    info!("Time elapsed: {:.2?}", elapsed);

    let names: Vec<String> = env.agent_names();
    let scores_by_agent: Vec<Vec<f64>> = columns(&scores);
    let optimal_by_agent: Vec<Vec<f64>> = columns(&optimal);

    println!(
        "{} ({} arms, {} trials, {} experiments)",
        env.label(),
        env.bandit().k(),
        cli.n_trials,
        cli.n_experiments
    );
    for (i, name) in names.iter().enumerate() {
        println!(
            "{:<32} average reward {:>8.4} \t optimal action {:>6.2}%",
            name,
            tail_mean(cli.moving_average_window, &scores_by_agent[i]),
            100.0 * tail_mean(cli.moving_average_window, &optimal_by_agent[i]),
        );
    }

    if let Some(path) = &cli.output {
        let report = json!({
            "label": env.label(),
            "agents": names,
            "action_values": env.bandit().action_values().to_vec(),
            "optimal": env.bandit().optimal(),
            "average_reward": scores_by_agent,
            "average_optimal": optimal_by_agent,
            "beliefs": env.agents().iter().map(|a| beliefs(&**a)).collect::<Vec<Value>>(),
        });
        let file: File = File::create(path)
            .with_context(|| format!("could not create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .with_context(|| format!("could not write results to {}", path.display()))?;
        info!("results saved to {}", path.display());
    }
    Ok(())
}
