use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::ActionSelection;

/// Explores a uniformly random arm with probability `epsilon`, otherwise exploits
/// the best estimate. Ties between best estimates are broken at random.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    pub epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, seed: u64) -> Self {
        Self {
            epsilon,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn greedy(seed: u64) -> Self {
        Self::new(0.0, seed)
    }

    pub fn random(seed: u64) -> Self {
        Self::new(1.0, seed)
    }

    fn should_explore(&mut self) -> bool {
        self.epsilon != 0.0 && self.rng.gen::<f64>() < self.epsilon
    }

    fn break_ties(&mut self, values: &Array1<f64>) -> usize {
        let max: f64 = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let best: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == max)
            .map(|(i, _)| i)
            .collect();
        if best.len() <= 1 {
            return best.first().copied().unwrap_or(0);
        }
        best[self.rng.gen_range(0..best.len())]
    }
}

impl ActionSelection for EpsilonGreedy {
    fn get_action(&mut self, values: &Array1<f64>) -> usize {
        if self.should_explore() {
            self.rng.gen_range(0..values.len())
        } else {
            self.break_ties(values)
        }
    }

    fn reset(&mut self) {}

    fn name(&self) -> String {
        if self.epsilon == 0.0 {
            "Greedy".to_string()
        } else if self.epsilon == 1.0 {
            "Random".to_string()
        } else {
            format!("\u{3b5}-greedy (\u{3b5}={})", self.epsilon)
        }
    }
}
