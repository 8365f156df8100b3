use std::{error::Error as StdError, fmt};

use tnrg_core::{ConfigError, store::StoreError};
use tnrg_plot::WindowError;
use tnrg_solve::bisection;

/// Exit code for an invalid or unsupported configuration.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for a temperature bracket that does not straddle the transition.
pub const EXIT_BRACKET: u8 = 3;
/// Exit code for a failure inside the RG evaluator.
pub const EXIT_EVALUATOR: u8 = 4;
/// Exit code for a result file that cannot be read or written.
pub const EXIT_IO: u8 = 5;
/// Exit code for a plot window that cannot be opened.
pub const EXIT_DISPLAY: u8 = 6;

/// A driver failure, reduced to a message and a process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Builds an error whose message is `err` followed by its source chain.
    pub fn from_error(exit_code: u8, err: &(dyn StdError + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(exit_code, message)
    }

    /// Wraps a failure reported by the RG evaluator.
    pub fn evaluator<E: StdError + 'static>(err: &E) -> Self {
        Self::from_error(EXIT_EVALUATOR, err)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::from_error(EXIT_CONFIG, &err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::from_error(EXIT_IO, &err)
    }
}

impl From<bisection::Error> for AppError {
    fn from(err: bisection::Error) -> Self {
        let exit_code = match &err {
            bisection::Error::InvalidConfig(_) => EXIT_CONFIG,
            bisection::Error::Oracle { .. } => EXIT_EVALUATOR,
            bisection::Error::InvalidInterval(_)
            | bisection::Error::NoPhaseChange { .. }
            | bisection::Error::InvertedPhases { .. } => EXIT_BRACKET,
        };
        Self::from_error(exit_code, &err)
    }
}

impl From<bisection::IntervalError> for AppError {
    fn from(err: bisection::IntervalError) -> Self {
        bisection::Error::from(err).into()
    }
}

impl From<WindowError> for AppError {
    fn from(err: WindowError) -> Self {
        Self::from_error(EXIT_DISPLAY, &err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl StdError for AppError {}
