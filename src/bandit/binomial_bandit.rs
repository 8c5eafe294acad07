use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution};
use tracing::debug;

use super::{check_action, check_arms, Bandit};
use crate::error::{BanditError, Result};
use crate::utils::argmax;

/// The Binomial distribution counts successes of a `p`-coin over `n` flips.
///
/// As a bandit it approximates a discrete rating or the "strength" of a response
/// to a single event. Without a fixed `p`, success probabilities are redrawn
/// uniformly on every reset.
///
/// With a horizon `t` the bandit pre-samples a `t x k` matrix on every reset and
/// replays it row by row. Every access consumes one row whatever the action, so
/// several agents sharing one bandit consume successive rows within a time step.
/// The `t + 1`-th access fails with [`BanditError::SamplesExhausted`].
#[derive(Debug, Clone)]
pub struct BinomialBandit {
    k: usize,
    n: u64,
    p: Option<Array1<f64>>,
    t: Option<usize>,
    rng: StdRng,
    dists: Vec<Binomial>,
    action_values: Array1<f64>,
    optimal: usize,
    samples: Option<Array2<u64>>,
    cursor: usize,
}

impl BinomialBandit {
    pub fn new(
        k: usize,
        n: u64,
        p: Option<Vec<f64>>,
        t: Option<usize>,
        seed: u64,
    ) -> Result<Self> {
        check_arms(k)?;
        if n < 1 {
            return Err(BanditError::InvalidParameter(format!(
                "n must be at least 1, got {}",
                n
            )));
        }
        if t == Some(0) {
            return Err(BanditError::InvalidParameter(
                "pre-sampling horizon t must be at least 1".to_string(),
            ));
        }
        let p: Option<Array1<f64>> = match p {
            Some(p) => {
                if p.len() != k {
                    return Err(BanditError::InvalidParameter(format!(
                        "expected {} probabilities, got {}",
                        k,
                        p.len()
                    )));
                }
                if let Some(bad) = p.iter().find(|v| !(0.0..=1.0).contains(*v)) {
                    return Err(BanditError::InvalidParameter(format!(
                        "probability {} outside of [0, 1]",
                        bad
                    )));
                }
                Some(Array1::from_vec(p))
            }
            None => None,
        };
        let mut bandit: BinomialBandit = Self {
            k,
            n,
            p,
            t,
            rng: StdRng::seed_from_u64(seed),
            dists: vec![],
            action_values: Array1::zeros(k),
            optimal: 0,
            samples: None,
            cursor: 0,
        };
        bandit.reset()?;
        Ok(bandit)
    }

    /// Next length-`k` reward vector: a replayed row in pre-sampled mode, a fresh
    /// draw otherwise.
    pub fn sample(&mut self) -> Result<Array1<f64>> {
        let row: Array1<f64> = match &self.samples {
            Some(samples) => {
                if self.cursor >= samples.nrows() {
                    return Err(BanditError::SamplesExhausted {
                        horizon: samples.nrows(),
                    });
                }
                samples.row(self.cursor).mapv(|v| v as f64)
            }
            None => return Ok(self.draw_row()),
        };
        self.cursor += 1;
        Ok(row)
    }

    /// Rows consumed since the last reset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn horizon(&self) -> Option<usize> {
        self.t
    }

    /// Trials per pull.
    pub fn n(&self) -> u64 {
        self.n
    }

    fn draw_row(&mut self) -> Array1<f64> {
        let rng: &mut StdRng = &mut self.rng;
        self.dists.iter().map(|d| d.sample(rng) as f64).collect()
    }

    fn build_dists(&self) -> Result<Vec<Binomial>> {
        self.action_values
            .iter()
            .map(|p| Binomial::new(self.n, *p).map_err(|e| BanditError::Distribution(e.to_string())))
            .collect()
    }
}

impl Bandit for BinomialBandit {
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
        self.action_values = match &self.p {
            Some(p) => p.clone(),
            None => Array1::random_using(self.k, Uniform::new(0.0, 1.0), &mut self.rng),
        };
        self.dists = self.build_dists()?;

        if let Some(t) = self.t {
            let rng: &mut StdRng = &mut self.rng;
            let dists: &Vec<Binomial> = &self.dists;
            self.samples = Some(Array2::from_shape_fn((t, self.k), |(_, j)| {
                dists[j].sample(rng)
            }));
            self.cursor = 0;
        }

        self.optimal = argmax(self.action_values.iter());
        debug!(optimal = self.optimal, values = ?self.action_values, "binomial bandit reset");
        Ok(())
    }

    fn pull(&mut self, action: usize) -> Result<(f64, bool)> {
        check_action(action, self.k)?;
        let sample: Array1<f64> = self.sample()?;
        Ok((sample[action], action == self.optimal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_parameters() {
        assert!(BinomialBandit::new(0, 1, None, None, 0).is_err());
        assert!(BinomialBandit::new(2, 0, None, None, 0).is_err());
        assert!(BinomialBandit::new(2, 1, Some(vec![0.5]), None, 0).is_err());
        assert!(BinomialBandit::new(2, 1, Some(vec![0.5, 1.5]), None, 0).is_err());
        assert!(BinomialBandit::new(2, 1, Some(vec![0.5, f64::NAN]), None, 0).is_err());
        assert!(BinomialBandit::new(2, 1, None, Some(0), 0).is_err());
    }

    #[test]
    fn rewards_stay_within_trials_per_pull() {
        let mut bandit = BinomialBandit::new(3, 4, None, None, 8).unwrap();
        assert_eq!(bandit.n(), 4);
        for _ in 0..3 {
            bandit.reset().unwrap();
            assert_eq!(bandit.n(), 4);
            for _ in 0..50 {
                let (reward, _) = bandit.pull(1).unwrap();
                assert!((0.0..=4.0).contains(&reward));
            }
        }
    }

    #[test]
    fn fixed_probabilities_survive_reset() {
        let mut bandit =
            BinomialBandit::new(3, 5, Some(vec![0.2, 0.7, 0.4]), Some(10), 1).unwrap();
        let before = bandit.action_values().clone();
        for _ in 0..5 {
            bandit.pull(0).unwrap();
        }
        bandit.reset().unwrap();
        assert_eq!(&before, bandit.action_values());
        assert_eq!(bandit.optimal(), 1);
        assert_eq!(bandit.cursor(), 0);
    }

    #[test]
    fn random_probabilities_are_redrawn() {
        let mut bandit = BinomialBandit::new(4, 3, None, None, 8).unwrap();
        let before = bandit.action_values().clone();
        assert!(before.iter().all(|p| (0.0..1.0).contains(p)));
        bandit.reset().unwrap();
        assert_ne!(&before, bandit.action_values());
    }

    #[test]
    fn presampled_window_serves_exactly_t_pulls() {
        let t: usize = 7;
        let mut bandit = BinomialBandit::new(3, 4, None, Some(t), 42).unwrap();
        for i in 0..t {
            assert_eq!(bandit.cursor(), i);
            bandit.pull(i % 3).unwrap();
        }
        assert_eq!(
            bandit.pull(0),
            Err(BanditError::SamplesExhausted { horizon: t })
        );
        assert_eq!(bandit.sample(), Err(BanditError::SamplesExhausted { horizon: t }));
        bandit.reset().unwrap();
        assert!(bandit.pull(0).is_ok());
    }

    #[test]
    fn every_pull_consumes_a_row_whatever_the_action() {
        let mut replay = BinomialBandit::new(3, 10, None, Some(4), 3).unwrap();
        let mut rows = replay.clone();
        for action in [2, 0, 1, 2] {
            let row = rows.sample().unwrap();
            let (reward, _) = replay.pull(action).unwrap();
            assert_eq!(reward, row[action]);
        }
        assert_eq!(replay.cursor(), 4);
    }

    #[test]
    fn lazy_mode_never_exhausts() {
        let mut bandit = BinomialBandit::new(2, 3, Some(vec![0.5, 0.5]), None, 0).unwrap();
        for _ in 0..1000 {
            let (reward, _) = bandit.pull(1).unwrap();
            assert!((0.0..=3.0).contains(&reward));
        }
        assert_eq!(bandit.cursor(), 0);
        assert_eq!(bandit.horizon(), None);
    }

    #[test]
    fn degenerate_probabilities_give_constant_rewards() {
        let mut bandit =
            BinomialBandit::new(2, 6, Some(vec![0.0, 1.0]), Some(20), 0).unwrap();
        for _ in 0..10 {
            assert_eq!(bandit.pull(0).unwrap(), (0.0, false));
            assert_eq!(bandit.pull(1).unwrap(), (6.0, true));
        }
    }

    #[test]
    fn same_seed_same_samples() {
        let mut a = BinomialBandit::new(5, 10, None, Some(50), 77).unwrap();
        let mut b = BinomialBandit::new(5, 10, None, Some(50), 77).unwrap();
        assert_eq!(a.action_values(), b.action_values());
        for _ in 0..50 {
            assert_eq!(a.sample().unwrap(), b.sample().unwrap());
        }
    }
}
