//! RG evaluator backed by an external program.
//!
//! Each call spawns the backend once, writes a single JSON request
//! `{"operation": ..., "request": ...}` to its stdin and reads a single JSON
//! response from its stdout. The backend's stderr is captured and attached
//! to failures.

use std::{
    ffi::OsString,
    io::Write,
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tnrg_core::{
    RgEvaluator, ScalingTable,
    evaluator::{FlowReport, FlowRequest, PhaseReport, PhaseRequest, ScalingRequest},
    scaling::TableError,
};

/// Environment variable naming the backend program.
pub const BACKEND_ENV: &str = "TNRG_BACKEND";

/// Backend program used when neither a flag nor the environment names one.
pub const DEFAULT_BACKEND: &str = "tnrg-backend";

/// Errors raised while talking to the backend program.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("could not start RG backend `{}`", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while running `{operation}` on the RG backend")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode the `{operation}` request")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("RG backend failed on `{operation}` ({status}){}", stderr_suffix(.stderr))]
    Failed {
        operation: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("RG backend returned an invalid `{operation}` response{}", stderr_suffix(.stderr))]
    Decode {
        operation: &'static str,
        stderr: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("RG backend returned an inconsistent scaling table")]
    Table(#[from] TableError),
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(":\n{stderr}")
    }
}

#[derive(Serialize)]
struct Envelope<'a, R> {
    operation: &'static str,
    request: &'a R,
}

/// Runs RG work through an external program.
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandEvaluator {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Picks the backend from `flag`, then [`BACKEND_ENV`], then [`DEFAULT_BACKEND`].
    #[must_use]
    pub fn from_flag_or_env(flag: Option<PathBuf>) -> Self {
        let program = flag
            .or_else(|| std::env::var_os(BACKEND_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKEND));
        Self::new(program)
    }

    /// Appends a fixed argument passed on every call.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn call<R, T>(&self, operation: &'static str, request: &R) -> Result<T, BackendError>
    where
        R: Serialize,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(&Envelope { operation, request })
            .map_err(|source| BackendError::Encode { operation, source })?;

        log::debug!("{operation}: running {}", self.program.display());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&payload)
                .map_err(|source| BackendError::Io { operation, source })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|source| BackendError::Io { operation, source })?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(BackendError::Failed {
                operation,
                status: output.status,
                stderr,
            });
        }

        for line in stderr.lines() {
            log::debug!("{operation}: {line}");
        }

        serde_json::from_slice(&output.stdout).map_err(|source| BackendError::Decode {
            operation,
            stderr,
            source,
        })
    }
}

impl RgEvaluator for CommandEvaluator {
    type Error = BackendError;

    fn determine_phase(&self, request: &PhaseRequest<'_>) -> Result<PhaseReport, Self::Error> {
        self.call("determine_phase", request)
    }

    fn generate_flow(&self, request: &FlowRequest<'_>) -> Result<FlowReport, Self::Error> {
        self.call("generate_flow", request)
    }

    fn scaling_dimensions(
        &self,
        request: &ScalingRequest<'_>,
    ) -> Result<ScalingTable, Self::Error> {
        let table: ScalingTable = self.call("scaling_dimensions", request)?;
        table.validate()?;
        Ok(table)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    use std::path::Path;

    use tnrg_core::{Options, ParallelContext, Phase, Purpose, RgConfig, evaluator::Run};

    fn shell(script: &str) -> CommandEvaluator {
        CommandEvaluator::new("sh").arg("-c").arg(script)
    }

    fn config() -> RgConfig {
        RgConfig::assemble(&Options::default(), Purpose::FindCritical).unwrap()
    }

    #[test]
    fn decodes_phase_report() {
        let evaluator =
            shell(r#"cat > /dev/null; echo '{"phase": "ordered", "indicator": 0.25}'"#);
        let config = config();
        let run = Run::new(&config, Path::new("out"), ParallelContext::serial());

        let report = evaluator
            .determine_phase(&PhaseRequest {
                run,
                temperature: 4.5,
            })
            .unwrap();

        assert_eq!(report.phase, Phase::Ordered);
        assert_eq!(report.indicator, 0.25);
    }

    #[test]
    fn request_is_wrapped_in_an_envelope() {
        // Only answers the expected request.
        let evaluator = shell(
            r#"req=$(cat); case "$req" in
                 *'"operation":"determine_phase"'*'"temperature":4.5'*) echo '{"phase": "disordered", "indicator": -1.0}' ;;
                 *) echo "unexpected request: $req" >&2; exit 3 ;;
               esac"#,
        );
        let config = config();
        let run = Run::new(&config, Path::new("out"), ParallelContext::serial());

        let report = evaluator
            .determine_phase(&PhaseRequest {
                run,
                temperature: 4.5,
            })
            .unwrap();
        assert_eq!(report.phase, Phase::Disordered);
    }

    #[test]
    fn non_zero_exit_carries_stderr() {
        let evaluator = shell("cat > /dev/null; echo 'truncation unstable' >&2; exit 1");
        let config = config();
        let run = Run::new(&config, Path::new("out"), ParallelContext::serial());

        let err = evaluator
            .determine_phase(&PhaseRequest {
                run,
                temperature: 4.5,
            })
            .unwrap_err();

        match &err {
            BackendError::Failed { stderr, .. } => assert_eq!(stderr.trim(), "truncation unstable"),
            other => panic!("expected a failed backend, got {other:?}"),
        }
        assert!(err.to_string().ends_with("truncation unstable"));
    }

    #[test]
    fn garbage_output_is_a_decode_error() {
        let evaluator = shell("cat > /dev/null; echo 'not json'");
        let config = config();
        let run = Run::new(&config, Path::new("out"), ParallelContext::serial());

        let err = evaluator
            .generate_flow(&FlowRequest {
                run,
                plot_rg_max: 15,
            })
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }), "{err:?}");
    }

    #[test]
    fn mismatched_table_is_rejected() {
        let evaluator = shell(r#"cat > /dev/null; echo '{"rg_steps": [1, 2], "records": []}'"#);
        let config = config();
        let run = Run::new(&config, Path::new("out"), ParallelContext::serial());

        let err = evaluator
            .scaling_dimensions(&ScalingRequest {
                run,
                selection: tnrg_core::evaluator::SectorSelection::all(1, 2),
            })
            .unwrap_err();
        assert!(matches!(err, BackendError::Table(_)), "{err:?}");
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let evaluator = CommandEvaluator::new("/nonexistent/tnrg-backend");
        let config = config();
        let run = Run::new(&config, Path::new("out"), ParallelContext::serial());

        let err = evaluator
            .determine_phase(&PhaseRequest {
                run,
                temperature: 4.5,
            })
            .unwrap_err();
        assert!(matches!(err, BackendError::Spawn { .. }), "{err:?}");
    }
}
