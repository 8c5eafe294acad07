mod bernoulli_bandit;
mod binomial_bandit;
mod gaussian_bandit;
mod multi_armed_bandit;

use enum_dispatch::enum_dispatch;
use ndarray::Array1;

use crate::error::{BanditError, Result};

pub use bernoulli_bandit::BernoulliBandit;
pub use binomial_bandit::BinomialBandit;
pub use gaussian_bandit::GaussianBandit;
pub use multi_armed_bandit::MultiArmedBandit;

/// A reward source with `k` arms and a hidden ground truth.
///
/// `optimal()` always matches the argmax of `action_values()`, ties going to the
/// lowest index. `pull` may advance internal sampling state but never touches the
/// ground truth; only `reset` does.
#[enum_dispatch]
pub trait Bandit {
    fn k(&self) -> usize;
    fn action_values(&self) -> &Array1<f64>;
    fn optimal(&self) -> usize;
    fn reset(&mut self) -> Result<()>;
    fn pull(&mut self, action: usize) -> Result<(f64, bool)>;
}

#[derive(Debug, Clone)]
#[enum_dispatch(Bandit)]
pub enum EnumBandit {
    MultiArmedBandit(MultiArmedBandit),
    GaussianBandit(GaussianBandit),
    BinomialBandit(BinomialBandit),
    BernoulliBandit(BernoulliBandit),
}

fn check_arms(k: usize) -> Result<()> {
    if k < 1 {
        return Err(BanditError::InvalidParameter(format!(
            "a bandit needs at least one arm, got k={}",
            k
        )));
    }
    Ok(())
}

fn check_action(action: usize, k: usize) -> Result<()> {
    if action >= k {
        return Err(BanditError::ActionOutOfRange { action, k });
    }
    Ok(())
}
