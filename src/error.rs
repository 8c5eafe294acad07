use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    /// Rejected construction or run parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Action {action} out of range for a bandit with {k} arms")]
    ActionOutOfRange { action: usize, k: usize },

    /// The pre-sampled window was fully consumed before the next reset
    #[error("Pre-sampled rewards exhausted after {horizon} pulls, reset the bandit first")]
    SamplesExhausted { horizon: usize },

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Agent must choose an action before observing a reward")]
    AgentNotReady,

    #[error("Reward {reward} outside of [0, {n}]")]
    InvalidReward { reward: f64, n: u64 },
}

pub type Result<T> = std::result::Result<T, BanditError>;
