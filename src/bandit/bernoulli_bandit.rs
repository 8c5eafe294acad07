use ndarray::Array1;

use super::{Bandit, BinomialBandit};
use crate::error::Result;

/// The Bernoulli distribution is the `n = 1` case of the Binomial: a single
/// `p`-coin flip. Useful to model hit or miss events such as a user clicking on a
/// headline, ad or recommended product.
#[derive(Debug, Clone)]
pub struct BernoulliBandit {
    inner: BinomialBandit,
}

impl BernoulliBandit {
    pub fn new(k: usize, p: Option<Vec<f64>>, t: Option<usize>, seed: u64) -> Result<Self> {
        Ok(Self {
            inner: BinomialBandit::new(k, 1, p, t, seed)?,
        })
    }

    pub fn sample(&mut self) -> Result<Array1<f64>> {
        self.inner.sample()
    }

    pub fn cursor(&self) -> usize {
        self.inner.cursor()
    }

    pub fn horizon(&self) -> Option<usize> {
        self.inner.horizon()
    }

    pub fn n(&self) -> u64 {
        self.inner.n()
    }
}

impl Bandit for BernoulliBandit {
    fn k(&self) -> usize {
        self.inner.k()
    }

    fn action_values(&self) -> &Array1<f64> {
        self.inner.action_values()
    }

    fn optimal(&self) -> usize {
        self.inner.optimal()
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.reset()
    }

    fn pull(&mut self, action: usize) -> Result<(f64, bool)> {
        self.inner.pull(action)
    }
}
