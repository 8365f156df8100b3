use thiserror::Error;

/// Errors in a bisection [`Config`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("iteration count must be at least 1")]
    ZeroIterations,
}

/// Configuration for the bisection search.
///
/// There is no tolerance: the search spends exactly `iterations` oracle
/// calls, because each call is a full RG flow and the achieved precision
/// `width / 2^iterations` is known up front. Budgets beyond what `f64` can
/// resolve end early with [`Status::ResolutionLimit`].
///
/// [`Status::ResolutionLimit`]: super::Status::ResolutionLimit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { iterations: 6 }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroIterations`] if `iterations` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }

    /// Width of the final interval for a starting width `width`.
    #[must_use]
    pub fn precision(&self, width: f64) -> f64 {
        let halvings = i32::try_from(self.iterations).unwrap_or(i32::MAX);
        width * 0.5_f64.powi(halvings)
    }
}
