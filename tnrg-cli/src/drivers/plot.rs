use std::path::PathBuf;

use serde::Serialize;
use tnrg_core::{
    ParallelContext, ScalingTable,
    layout::{SCALING_ERRORS_FILE, SCALING_FILE, tensors_dir},
    store,
};
use tnrg_plot::{Figure, PlotApp, StepErrors};

use crate::{AppError, args::PlotArgs, error::EXIT_IO};

/// Relative errors at one RG step, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorEntry {
    pub rg_step: usize,
    pub epsilon: Option<f64>,
    pub sigma: Option<f64>,
}

impl From<&StepErrors> for ErrorEntry {
    fn from(step: &StepErrors) -> Self {
        Self {
            rg_step: step.rg_step,
            epsilon: step.epsilon,
            sigma: step.sigma,
        }
    }
}

/// Result of a plot run.
#[derive(Debug)]
pub struct Outcome {
    pub figure: Figure,
    pub errors: Vec<StepErrors>,
    /// Relative-error file, if this process wrote one.
    pub saved: Option<PathBuf>,
}

/// Loads the stored scaling dimensions and lays out their figure.
///
/// # Errors
///
/// Fails if the table cannot be read or is inconsistent.
pub fn prepare(args: &PlotArgs) -> Result<Outcome, AppError> {
    let path = tensors_dir(&args.save_key().save_dir(&args.out_dir)).join(SCALING_FILE);
    let table: ScalingTable = store::read_json(&path)?;
    table
        .validate()
        .map_err(|err| AppError::from_error(EXIT_IO, &err))?;

    let table = table.slice(args.start, args.end);
    if table.is_empty() {
        log::warn!(
            "no RG steps left after slicing {}..{:?} of {}",
            args.start,
            args.end,
            path.display()
        );
    }

    let errors = Figure::errors(&table);
    let figure = Figure::from_table(&table, args.chi);
    Ok(Outcome {
        figure,
        errors,
        saved: None,
    })
}

/// Logs and stores the relative errors, then shows the figure, on the
/// coordinator.
///
/// # Errors
///
/// Fails if the table cannot be loaded, the errors cannot be written, or
/// the window cannot be opened.
pub fn run(args: &PlotArgs, parallel: ParallelContext) -> Result<Option<Outcome>, AppError> {
    let role = parallel.role();
    if !role.is_coordinator() {
        return Ok(None);
    }

    let mut outcome = prepare(args)?;
    for step in &outcome.errors {
        let show = |error: Option<f64>| {
            error.map_or_else(|| "n/a".to_string(), |e| format!("{:.2}%", e * 100.0))
        };
        log::info!(
            "RG step {}: epsilon error {}, sigma error {}",
            step.rg_step,
            show(step.epsilon),
            show(step.sigma),
        );
    }

    let path = args
        .save_key()
        .save_dir(&args.out_dir)
        .join(SCALING_ERRORS_FILE);
    let entries: Vec<ErrorEntry> = outcome.errors.iter().map(ErrorEntry::from).collect();
    outcome.saved = store::write_json(role, &path, &entries)?.then_some(path);

    if !args.no_window {
        let title = format!(
            "Scaling dimensions: {}-{} chi {}",
            args.scheme, args.scheme_version, args.chi
        );
        PlotApp::new(outcome.figure.clone()).run(&title)?;
    }
    Ok(Some(outcome))
}
