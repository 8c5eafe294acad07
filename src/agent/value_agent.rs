use ndarray::Array1;

use crate::action_selection::{ActionSelection, EnumActionSelection};
use crate::error::{BanditError, Result};

use super::Agent;

/// Keeps a point estimate per arm, updated with the sample average or, when
/// `gamma` is set, with a constant step size.
#[derive(Debug, Clone)]
pub struct ValueAgent {
    policy: EnumActionSelection,
    prior: f64,
    gamma: Option<f64>,
    value_estimates: Array1<f64>,
    action_attempts: Array1<u64>,
    t: u64,
    last_action: Option<usize>,
}

impl ValueAgent {
    pub fn new(
        k: usize,
        policy: EnumActionSelection,
        prior: f64,
        gamma: Option<f64>,
    ) -> Result<Self> {
        if k < 1 {
            return Err(BanditError::InvalidParameter(format!(
                "an agent needs at least one arm, got k={}",
                k
            )));
        }
        if let Some(g) = gamma {
            if !(g > 0.0 && g <= 1.0) {
                return Err(BanditError::InvalidParameter(format!(
                    "step size gamma must be in (0, 1], got {}",
                    g
                )));
            }
        }
        Ok(Self {
            policy,
            prior,
            gamma,
            value_estimates: Array1::from_elem(k, prior),
            action_attempts: Array1::zeros(k),
            t: 0,
            last_action: None,
        })
    }

    pub fn value_estimates(&self) -> &Array1<f64> {
        &self.value_estimates
    }

    pub fn action_attempts(&self) -> &Array1<u64> {
        &self.action_attempts
    }

    pub fn t(&self) -> u64 {
        self.t
    }
}

impl Agent for ValueAgent {
    fn choose(&mut self) -> Result<usize> {
        let action: usize = self.policy.get_action(&self.value_estimates);
        self.last_action = Some(action);
        Ok(action)
    }

    fn observe(&mut self, reward: f64) -> Result<()> {
        let action: usize = self.last_action.take().ok_or(BanditError::AgentNotReady)?;
        self.action_attempts[action] += 1;
        let g: f64 = match self.gamma {
            Some(gamma) => gamma,
            None => 1.0 / self.action_attempts[action] as f64,
        };
        let q: f64 = self.value_estimates[action];
        self.value_estimates[action] += g * (reward - q);
        self.t += 1;
        Ok(())
    }

    fn reset(&mut self) {
        self.value_estimates.fill(self.prior);
        self.action_attempts.fill(0);
        self.t = 0;
        self.last_action = None;
        self.policy.reset();
    }

    fn name(&self) -> String {
        self.policy.name()
    }

    fn estimates(&self) -> Array1<f64> {
        self.value_estimates.clone()
    }
}
