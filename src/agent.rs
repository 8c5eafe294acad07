mod beta_agent;
mod value_agent;

pub use beta_agent::BetaAgent;
pub use value_agent::ValueAgent;

use ndarray::Array1;

use crate::error::Result;

/// Decision maker playing against a bandit.
///
/// The environment calls `choose` then feeds the reward of that action back
/// through `observe`, once per agent per time step.
pub trait Agent {
    fn choose(&mut self) -> Result<usize>;
    fn observe(&mut self, reward: f64) -> Result<()>;
    fn reset(&mut self);
    fn name(&self) -> String;

    /// Current belief about the value of every arm, one entry per arm.
    fn estimates(&self) -> Array1<f64>;

    /// `(alpha, beta)` parameters of a Beta posterior, for agents that keep one.
    fn posterior(&self) -> Option<(Array1<f64>, Array1<f64>)> {
        None
    }
}
