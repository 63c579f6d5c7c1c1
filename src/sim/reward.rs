//! Currency hand-off for passed obstacles
//!
//! The currency itself belongs to the host game. The runner only asks it to
//! credit an amount and reports back whatever the host says it credited.

use serde::{Deserialize, Serialize};

use crate::error::RewardError;

/// Receives rewards for obstacles passed without crashing
pub trait RewardSink {
    /// Credit `amount` and return what was actually credited
    fn award(&mut self, amount: u32) -> Result<u32, RewardError>;
}

impl<F> RewardSink for F
where
    F: FnMut(u32) -> Result<u32, RewardError>,
{
    fn award(&mut self, amount: u32) -> Result<u32, RewardError> {
        self(amount)
    }
}

/// In-memory currency with a payout multiplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: u64,
    /// Every award is scaled by this and rounded down
    pub multiplier: f32,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            balance: 0,
            multiplier: 1.0,
        }
    }
}

impl Wallet {
    pub fn with_multiplier(multiplier: f32) -> Self {
        Self {
            balance: 0,
            multiplier,
        }
    }
}

impl RewardSink for Wallet {
    fn award(&mut self, amount: u32) -> Result<u32, RewardError> {
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            return Err(RewardError::Rejected(format!(
                "bad multiplier {}",
                self.multiplier
            )));
        }
        let credited = (amount as f32 * self.multiplier).floor() as u32;
        self.balance += u64::from(credited);
        Ok(credited)
    }
}
