use ndarray::Array1;

use crate::utils::argmax;

use super::ActionSelection;

#[derive(Debug, Clone)]
pub struct UpperConfidenceBound {
    action_counter: Array1<u64>,
    t: u64,
    confidence_level: f64,
}

impl UpperConfidenceBound {
    pub fn new(confidence_level: f64) -> Self {
        Self {
            action_counter: Array1::zeros(0),
            t: 1,
            confidence_level,
        }
    }

    fn bounds(&self, values: &Array1<f64>) -> Array1<f64> {
        let log_t: f64 = (self.t as f64).ln();
        let mut ucbs: Array1<f64> = Array1::zeros(values.len());
        for i in 0..values.len() {
            ucbs[i] = values[i]
                + self.confidence_level
                    * (log_t / (self.action_counter[i] as f64 + f64::MIN_POSITIVE)).sqrt()
        }
        ucbs
    }
}

impl ActionSelection for UpperConfidenceBound {
    fn get_action(&mut self, values: &Array1<f64>) -> usize {
        if self.action_counter.len() != values.len() {
            self.action_counter = Array1::zeros(values.len());
        }
        let action: usize = argmax(self.bounds(values).iter());
        self.action_counter[action] += 1;
        self.t += 1;
        action
    }

    fn reset(&mut self) {
        self.action_counter.fill(0);
        self.t = 1;
    }

    fn name(&self) -> String {
        format!("UCB (c={})", self.confidence_level)
    }
}
