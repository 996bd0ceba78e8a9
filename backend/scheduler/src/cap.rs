//! Upper bound on the number of missed runs one call may enumerate.
//!
//! A job dormant for years, or a creation timestamp skewed by decades, would
//! otherwise make enumeration eat unbounded CPU and memory. Legitimate
//! outages (a controller wedged over a long weekend, ~80 hourly runs) stay
//! under the default.

use catchup_core::CatchupError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_MISSED_RUNS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafetyCap {
    limit: usize,
}

impl Default for SafetyCap {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MISSED_RUNS)
    }
}

impl SafetyCap {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Fails once `count_so_far` exceeds the limit.
    pub fn check(&self, count_so_far: usize) -> Result<(), CatchupError> {
        if count_so_far > self.limit {
            return Err(CatchupError::TooManyMissedRuns { limit: self.limit });
        }
        Ok(())
    }
}
