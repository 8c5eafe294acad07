use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Normal, StandardNormal};
use tracing::debug;

use super::{check_action, check_arms, Bandit};
use crate::error::{BanditError, Result};
use crate::utils::argmax;

/// Gaussian bandits draw each arm's true mean from `Normal(mu, sigma)` on reset
/// and reward a pull with a unit-variance normal around that mean.
#[derive(Debug, Clone)]
pub struct GaussianBandit {
    k: usize,
    mu: f64,
    sigma: f64,
    prior: Normal<f64>,
    rng: StdRng,
    action_values: Array1<f64>,
    optimal: usize,
}

impl GaussianBandit {
    pub fn new(k: usize, mu: f64, sigma: f64, seed: u64) -> Result<Self> {
        check_arms(k)?;
        if !mu.is_finite() || !sigma.is_finite() {
            return Err(BanditError::InvalidParameter(format!(
                "mu and sigma must be finite, got mu={} sigma={}",
                mu, sigma
            )));
        }
        if sigma < 0.0 {
            return Err(BanditError::InvalidParameter(format!(
                "sigma must be non-negative, got {}",
                sigma
            )));
        }
        let prior: Normal<f64> = Normal::new(mu, sigma).map_err(|e| {
            BanditError::InvalidParameter(format!("sigma={} rejected: {}", sigma, e))
        })?;
        let mut bandit: GaussianBandit = Self {
            k,
            mu,
            sigma,
            prior,
            rng: StdRng::seed_from_u64(seed),
            action_values: Array1::zeros(k),
            optimal: 0,
        };
        bandit.reset()?;
        Ok(bandit)
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl Bandit for GaussianBandit {
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
        self.action_values = Array1::random_using(self.k, self.prior, &mut self.rng);
        self.optimal = argmax(self.action_values.iter());
        debug!(optimal = self.optimal, values = ?self.action_values, "gaussian bandit reset");
        Ok(())
    }

    fn pull(&mut self, action: usize) -> Result<(f64, bool)> {
        check_action(action, self.k)?;
        let noise: f64 = self.rng.sample(StandardNormal);
        Ok((self.action_values[action] + noise, action == self.optimal))
    }
}
