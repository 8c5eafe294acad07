mod epsilon_greedy;
mod upper_confidence_bound;

use enum_dispatch::enum_dispatch;
use ndarray::Array1;

pub use epsilon_greedy::EpsilonGreedy;
pub use upper_confidence_bound::UpperConfidenceBound;

#[enum_dispatch]
pub trait ActionSelection {
    fn get_action(&mut self, values: &Array1<f64>) -> usize;
    fn reset(&mut self);
    fn name(&self) -> String;
}

#[derive(Debug, Clone)]
#[enum_dispatch(ActionSelection)]
pub enum EnumActionSelection {
    EpsilonGreedy(EpsilonGreedy),
    UpperConfidenceBound(UpperConfidenceBound),
}
