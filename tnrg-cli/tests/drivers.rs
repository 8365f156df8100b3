use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use approx::assert_relative_eq;
use clap::Parser;
use serde_json::Value;
use thiserror::Error;
use tnrg_cli::{
    args::{BisectArgs, FlowArgs, LinearizedArgs, PlotArgs},
    drivers::{bisect, flow, linearized, plot},
    error::{EXIT_BRACKET, EXIT_CONFIG, EXIT_EVALUATOR},
};
use tnrg_core::{
    ParallelContext, Phase, RgEvaluator, ScalingTable,
    evaluator::{FlowReport, FlowRequest, PhaseReport, PhaseRequest, ScalingRequest},
    scaling::{SectorDimensions, StepDimensions},
};

#[derive(Debug, Error)]
#[error("flow diverged at T = {0}")]
struct Diverged(f64);

/// Evaluator with a sharp transition at `tc`, recording every request.
struct Lattice {
    tc: f64,
    fail_above: Option<f64>,
    temperatures: RefCell<Vec<f64>>,
    requests: RefCell<Vec<Value>>,
}

impl Lattice {
    fn new(tc: f64) -> Self {
        Self {
            tc,
            fail_above: None,
            temperatures: RefCell::default(),
            requests: RefCell::default(),
        }
    }

    fn calls(&self) -> usize {
        self.temperatures.borrow().len()
    }
}

fn step(rg_step: usize) -> StepDimensions {
    let drift = 0.01 * rg_step as f64;
    StepDimensions::from_fn(|reflection| {
        let base = reflection.odd_reflections() as f64 + drift;
        SectorDimensions {
            even: (0..10).map(|k| base + 0.5 * k as f64).collect(),
            odd: (0..10).map(|k| base + 0.5 + 0.5 * k as f64).collect(),
        }
    })
}

impl RgEvaluator for Lattice {
    type Error = Diverged;

    fn determine_phase(&self, request: &PhaseRequest<'_>) -> Result<PhaseReport, Diverged> {
        let t = request.temperature;
        self.temperatures.borrow_mut().push(t);
        self.requests
            .borrow_mut()
            .push(serde_json::to_value(request).unwrap());

        if self.fail_above.is_some_and(|limit| t > limit) {
            return Err(Diverged(t));
        }
        let indicator = t - self.tc;
        Ok(PhaseReport {
            phase: Phase::from_indicator(indicator),
            indicator,
        })
    }

    fn generate_flow(&self, request: &FlowRequest<'_>) -> Result<FlowReport, Diverged> {
        self.requests
            .borrow_mut()
            .push(serde_json::to_value(request).unwrap());

        let rg_steps: Vec<usize> = (1..=request.run.pars.rg_steps).collect();
        Ok(FlowReport {
            temperature: self.tc,
            tensor_differences: rg_steps.iter().map(|&n| 0.5_f64.powi(n as i32)).collect(),
            rg_steps,
        })
    }

    fn scaling_dimensions(&self, request: &ScalingRequest<'_>) -> Result<ScalingTable, Diverged> {
        self.requests
            .borrow_mut()
            .push(serde_json::to_value(request).unwrap());

        let rg_steps: Vec<usize> = (1..=4).collect();
        Ok(ScalingTable {
            records: rg_steps.iter().map(|&n| step(n)).collect(),
            rg_steps,
        })
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tnrg-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn bisect_args(out_dir: &Path, extra: &[&str]) -> BisectArgs {
    let out = out_dir.to_string_lossy().into_owned();
    let mut argv = vec!["bisect-tc", "--out-dir", out.as_str()];
    argv.extend_from_slice(extra);
    BisectArgs::try_parse_from(argv).unwrap()
}

#[test]
fn bisection_narrows_onto_tc_and_saves_the_run() {
    let dir = scratch("bisect");
    let lattice = Lattice::new(4.5115);
    let args = bisect_args(&dir, &["--itern", "8"]);

    let outcome = bisect::run(&args, &lattice, ParallelContext::serial()).unwrap();

    assert_eq!(lattice.calls(), 8);
    let interval = outcome.solution.interval;
    assert!(interval.low() <= 4.5115 && 4.5115 <= interval.high());
    assert_relative_eq!(interval.width(), 1.0 / 256.0);

    let path = outcome.saved.expect("the coordinator writes the result");
    assert_eq!(path, dir.join("hotrg3d-base/chi2/critical_temperature.json"));

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["scheme"], "hotrg3d");
    assert_eq!(saved["status"], "completed");
    assert_eq!(saved["pars"]["determPhase"], true);
    assert_eq!(saved["pars"]["rg_n"], 12);
    assert_eq!(saved["records"].as_array().unwrap().len(), 8);
    assert_eq!(saved["records"][0]["midpoint"], 4.5);
    assert_eq!(saved["records"][0]["phase"], "disordered");
    assert_eq!(saved["records"][0]["step"], "raise_low");
    assert_eq!(saved["records"][7]["low"], saved["interval"][0]);
    assert_eq!(saved["records"][7]["high"], saved["interval"][1]);

    let requests = lattice.requests.borrow();
    let first = &requests[0];
    assert_eq!(first["scheme"], "hotrg3d");
    assert_eq!(first["version"], "base");
    assert_eq!(first["temperature"], 4.5);
    assert_eq!(first["parallel"]["enabled"], false);
}

#[test]
fn workers_search_but_do_not_write() {
    let dir = scratch("worker");
    let lattice = Lattice::new(4.2);
    let args = bisect_args(&dir, &["--itern", "3", "--parallel"]);
    let worker = ParallelContext {
        enabled: true,
        rank: 1,
        size: 4,
    };

    let outcome = bisect::run(&args, &lattice, worker).unwrap();

    assert_eq!(lattice.calls(), 3);
    assert!(outcome.saved.is_none());
    assert!(!dir.exists());
    assert_eq!(lattice.requests.borrow()[0]["parallel"]["rank"], 1);
}

#[test]
fn bracket_check_rejects_bracket_without_transition() {
    let dir = scratch("bracket");
    let lattice = Lattice::new(5.5);
    let args = bisect_args(&dir, &["--check-bracket"]);

    let err = bisect::run(&args, &lattice, ParallelContext::serial()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_BRACKET);
    assert_eq!(*lattice.temperatures.borrow(), vec![4.0, 5.0]);
    assert!(!dir.exists());
}

#[test]
fn bracket_check_passes_then_bisects() {
    let dir = scratch("bracket-ok");
    let lattice = Lattice::new(4.3);
    let args = bisect_args(&dir, &["--check-bracket", "--itern", "4"]);

    let outcome = bisect::run(&args, &lattice, ParallelContext::serial()).unwrap();

    assert_eq!(lattice.calls(), 2 + 4);
    assert_eq!(outcome.solution.iters(), 4);
}

#[test]
fn zero_iterations_fail_before_any_flow() {
    let dir = scratch("zero-iterations");
    let lattice = Lattice::new(4.5);
    let args = bisect_args(&dir, &["--itern", "0", "--check-bracket"]);

    let err = bisect::run(&args, &lattice, ParallelContext::serial()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_CONFIG);
    assert!(err.to_string().contains("at least 1"), "{err}");
    assert_eq!(lattice.calls(), 0);
    assert!(!dir.exists());
}

#[test]
fn oversized_budget_stops_at_float_resolution() {
    let dir = scratch("oversized");
    let lattice = Lattice::new(4.5115);
    let args = bisect_args(&dir, &["--itern", "18446744073709551615"]);

    let outcome = bisect::run(&args, &lattice, ParallelContext::serial()).unwrap();

    let interval = outcome.solution.interval;
    assert!(lattice.calls() <= 64);
    assert!(interval.low() < interval.high());
    assert!(interval.low() <= 4.5115 && 4.5115 <= interval.high());

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(outcome.saved.unwrap()).unwrap()).unwrap();
    assert_eq!(saved["status"], "resolution_limit");
    assert_eq!(saved["records"].as_array().unwrap().len(), lattice.calls());
}

#[test]
fn evaluator_failure_stops_the_search() {
    let dir = scratch("diverged");
    let mut lattice = Lattice::new(4.2);
    lattice.fail_above = Some(4.3);
    let args = bisect_args(&dir, &[]);

    let err = bisect::run(&args, &lattice, ParallelContext::serial()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_EVALUATOR);
    assert!(err.to_string().contains("flow diverged at T = 4.5"), "{err}");
    assert_eq!(lattice.calls(), 1);
}

#[test]
fn unsupported_scheme_fails_before_any_flow() {
    let dir = scratch("unsupported");
    let lattice = Lattice::new(4.5);
    let args = bisect_args(&dir, &["--scheme", "efrg", "--ver", "tristage"]);

    let err = bisect::run(&args, &lattice, ParallelContext::serial()).unwrap_err();

    assert_eq!(err.exit_code(), EXIT_CONFIG);
    assert!(err.to_string().contains("tristage"), "{err}");
    assert_eq!(lattice.calls(), 0);
}

#[test]
fn flow_is_displayed_on_the_coordinator_and_saved() {
    let dir = scratch("flow");
    let lattice = Lattice::new(4.5115);
    let out = dir.to_string_lossy().into_owned();
    let args = FlowArgs::try_parse_from([
        "flow-tc",
        "--out-dir",
        out.as_str(),
        "--scheme",
        "blockHOTRG",
        "--chi",
        "4",
        "--rgn",
        "6",
    ])
    .unwrap();

    let outcome = flow::run(&args, &lattice, ParallelContext::serial()).unwrap();

    assert_eq!(outcome.report.rg_steps, vec![1, 2, 3, 4, 5, 6]);
    let requests = lattice.requests.borrow();
    let request = &requests[0];
    assert_eq!(request["plot_rg_max"], 15);
    assert_eq!(request["pars"]["display"], true);
    assert_eq!(request["pars"]["determPhase"], false);
    assert_eq!(request["pars"]["chiM"], 4);

    let path = outcome.saved.unwrap();
    assert_eq!(path, dir.join("blockHOTRG-base/chi4/flow.json"));
    assert!(path.exists());
}

#[test]
fn linearized_dimensions_feed_the_plot() {
    let dir = scratch("scaling");
    let lattice = Lattice::new(4.5115);
    let out = dir.to_string_lossy().into_owned();
    let args = LinearizedArgs::try_parse_from([
        "linearized-rg",
        "--out-dir",
        out.as_str(),
        "--scheme",
        "efrg",
        "--chi",
        "6",
        "--rgend",
        "4",
    ])
    .unwrap();

    let outcome = linearized::run(&args, &lattice, ParallelContext::serial()).unwrap();

    let requests = lattice.requests.borrow();
    let request = &requests[0];
    assert_eq!(request["selection"], "all_sectors");
    assert_eq!(request["rg_start"], 1);
    assert_eq!(request["rg_end"], 4);
    assert_eq!(request["even_count"], 10);
    assert_eq!(request["pars"]["rg_n"], 0);
    assert_eq!(
        outcome.saved.as_deref(),
        Some(
            dir.join("efrg-base/chi6_chis4_chiM2/tensors/scaling_dimensions.json")
                .as_path()
        )
    );

    let plot_args = PlotArgs::try_parse_from([
        "plot-scaling",
        "--out-dir",
        out.as_str(),
        "--scheme",
        "efrg",
        "--chi",
        "6",
        "--startn",
        "1",
        "--endn",
        "3",
        "--no-window",
    ])
    .unwrap();
    let shown = plot::run(&plot_args, ParallelContext::serial())
        .unwrap()
        .expect("the coordinator plots");

    assert_eq!(shown.figure.rg_steps, vec![2, 3]);
    assert_eq!(shown.errors.len(), 2);
    // Even 000 index 1 is 0.5 + drift.
    assert_relative_eq!(
        shown.errors[0].epsilon.unwrap(),
        (1.412_625 - 0.52) / 1.412_625
    );

    let path = shown.saved.expect("the coordinator stores the errors");
    assert_eq!(path, dir.join("efrg-base/chi6_chis4_chiM2/scaling_errors.json"));
    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 2);
    assert_eq!(saved[0]["rg_step"], 2);
    assert_eq!(saved[1]["rg_step"], 3);
    assert!(saved[0]["sigma"].is_f64());
}

#[test]
fn workers_do_not_plot() {
    let dir = scratch("plot-worker");
    let out = dir.to_string_lossy().into_owned();
    let args = PlotArgs::try_parse_from(["plot-scaling", "--out-dir", out.as_str(), "--no-window"])
        .unwrap();
    let worker = ParallelContext {
        enabled: true,
        rank: 2,
        size: 3,
    };

    assert!(plot::run(&args, worker).unwrap().is_none());
    assert!(!dir.exists());
}

#[test]
fn plot_reports_a_missing_table() {
    let dir = scratch("missing");
    let out = dir.to_string_lossy().into_owned();
    let args = PlotArgs::try_parse_from(["plot-scaling", "--out-dir", out.as_str(), "--no-window"])
        .unwrap();

    let err = plot::prepare(&args).unwrap_err();

    assert_eq!(err.exit_code(), tnrg_cli::error::EXIT_IO);
    assert!(err.to_string().contains("scaling_dimensions.json"), "{err}");
}
