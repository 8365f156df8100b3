use std::error::Error as StdError;

use thiserror::Error;

use tnrg_core::Phase;

use super::{config::ConfigError, interval::IntervalError};

/// Errors that can occur during a bisection search.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid interval")]
    InvalidInterval(#[from] IntervalError),

    #[error("invalid config")]
    InvalidConfig(#[from] ConfigError),

    #[error("phase oracle failed at T = {temperature}")]
    Oracle {
        temperature: f64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("both ends of [{low}, {high}] are {phase}; the interval does not bracket the transition")]
    NoPhaseChange { low: f64, high: f64, phase: Phase },

    #[error("[{low}, {high}] is ordered below and disordered above; the phases are inverted")]
    InvertedPhases { low: f64, high: f64 },
}

impl Error {
    pub(super) fn oracle<E>(temperature: f64, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Oracle {
            temperature,
            source: Box::new(source),
        }
    }
}
