use ndarray::Array1;

use super::{check_action, check_arms, Bandit};
use crate::error::Result;

/// Placeholder bandit: every arm is worth zero and every pull is optimal.
#[derive(Debug, Clone)]
pub struct MultiArmedBandit {
    k: usize,
    action_values: Array1<f64>,
    optimal: usize,
}

impl MultiArmedBandit {
    pub fn new(k: usize) -> Result<Self> {
        check_arms(k)?;
        Ok(Self {
            k,
            action_values: Array1::zeros(k),
            optimal: 0,
        })
    }
}

impl Bandit for MultiArmedBandit {
    fn k(&self) -> usize {
        self.k
    }

    fn action_values(&self) -> &Array1<f64> {
        &self.action_values
    }

    fn optimal(&self) -> usize {
        self.optimal
    }

    fn reset(&mut self) -> Result<()> {
        self.action_values = Array1::zeros(self.k);
        self.optimal = 0;
        Ok(())
    }

    fn pull(&mut self, action: usize) -> Result<(f64, bool)> {
        check_action(action, self.k)?;
        Ok((0.0, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BanditError;

    #[test]
    fn rejects_zero_arms() {
        assert!(matches!(
            MultiArmedBandit::new(0),
            Err(BanditError::InvalidParameter(_))
        ));
    }

    #[test]
    fn pulls_are_constant() {
        let mut bandit = MultiArmedBandit::new(3).unwrap();
        bandit.reset().unwrap();
        for action in 0..3 {
            assert_eq!(bandit.pull(action).unwrap(), (0.0, true));
        }
        assert_eq!(bandit.optimal(), 0);
        assert!(bandit.action_values().iter().all(|v| *v == 0.0));
    }
}
