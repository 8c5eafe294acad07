pub mod action_selection;
pub mod agent;
pub mod bandit;
pub mod env;
pub mod error;
pub mod utils;

pub use agent::Agent;
pub use bandit::{Bandit, EnumBandit};
pub use env::{Environment, RunResults};
pub use error::{BanditError, Result};
