//! Command-line drivers for locating and characterizing the critical point
//! of 3D lattice models with TNRG.

use std::process::ExitCode;

pub mod args;
pub mod backend;
pub mod banner;
pub mod drivers;
pub mod error;
pub mod logging;

pub use error::AppError;

/// Turns a driver result into the process exit code, reporting failures
/// on stderr.
pub fn exit_code<T>(result: Result<T, AppError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
