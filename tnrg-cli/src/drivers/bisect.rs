use std::path::PathBuf;

use serde::Serialize;
use tnrg_core::{
    ParallelContext, Phase, Purpose, RgConfig, RgEvaluator, SaveKey, TemperatureOracle,
    evaluator::{PhaseReport, Run},
    layout::CRITICAL_FILE,
    store,
};
use tnrg_solve::bisection::{self, Action, Event, SearchInterval, Solution, Status, Step};

use crate::{AppError, args::BisectArgs, banner};

/// One bisection iteration as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationEntry {
    pub iter: usize,
    pub midpoint: f64,
    pub phase: Phase,
    pub indicator: f64,
    pub step: &'static str,
    /// Bracket after the step.
    pub low: f64,
    pub high: f64,
}

/// Contents of the critical-temperature file.
#[derive(Debug, Serialize)]
pub struct CriticalRun<'a> {
    pub scheme: &'static str,
    pub version: &'a str,
    pub pars: &'a RgConfig,
    pub iterations: usize,
    pub status: &'static str,
    pub initial: [f64; 2],
    pub interval: [f64; 2],
    pub estimate: f64,
    pub precision: f64,
    pub records: Vec<IterationEntry>,
}

impl<'a> CriticalRun<'a> {
    #[must_use]
    pub fn new(config: &'a RgConfig, solution: &Solution<PhaseReport>) -> Self {
        let [mut low, mut high] = solution.initial.as_array();
        let records = solution
            .records
            .iter()
            .map(|record| {
                match record.step {
                    Step::RaiseLow => low = record.midpoint,
                    Step::LowerHigh => high = record.midpoint,
                }
                IterationEntry {
                    iter: record.iter,
                    midpoint: record.midpoint,
                    phase: record.phase,
                    indicator: record.output.indicator,
                    step: record.step.as_str(),
                    low,
                    high,
                }
            })
            .collect();

        Self {
            scheme: config.scheme_name(),
            version: &config.version,
            pars: config,
            iterations: solution.iters(),
            status: solution.status.as_str(),
            initial: solution.initial.as_array(),
            interval: solution.interval.as_array(),
            estimate: solution.estimate(),
            precision: solution.precision(),
            records,
        }
    }
}

/// Result of a bisection run.
#[derive(Debug)]
pub struct Outcome {
    pub solution: Solution<PhaseReport>,
    /// Critical-temperature file, if this process wrote one.
    pub saved: Option<PathBuf>,
}

fn log_iteration(event: &Event<'_, PhaseReport>) -> Option<Action> {
    let record = event.record;
    log::info!(
        "iteration {}/{}: T = {:.8} is {} (indicator {:.4e}), {}; bracket [{:.8}, {:.8}]",
        record.iter,
        event.budget,
        record.midpoint,
        record.phase,
        record.output.indicator,
        record.step.as_str().replace('_', " "),
        event.interval.low(),
        event.interval.high(),
    );
    None
}

/// Bisects the temperature bracket and stores the critical temperature.
///
/// # Errors
///
/// Fails on an unsupported configuration, an invalid bracket, an evaluator
/// failure, or when the result cannot be written.
pub fn run<E: RgEvaluator>(
    args: &BisectArgs,
    evaluator: &E,
    parallel: ParallelContext,
) -> Result<Outcome, AppError> {
    let role = parallel.role();
    let config = RgConfig::assemble(&args.options(), Purpose::FindCritical)?;
    let interval = SearchInterval::new(args.t_low, args.t_high)?;
    let settings = bisection::Config {
        iterations: args.iterations,
    };
    settings.validate().map_err(bisection::Error::from)?;

    let mut lines = banner::scheme_lines(config.scheme_name(), &config.version, config.chi);
    lines.push(format!("    Max RG steps is --{}--", config.rg_steps));
    lines.push(format!(
        "    Bisection iteration number is --{}--",
        args.iterations
    ));
    let banner = banner::Banner::start(role, &lines);

    let out_dir = &args.common.out_dir;
    let oracle = TemperatureOracle::new(evaluator, Run::new(&config, out_dir, parallel));

    if args.check_bracket {
        let [low, high] = bisection::check_bracket(&oracle, interval)?;
        log::info!(
            "bracket [{}, {}] straddles the transition (indicators {:.4e}, {:.4e})",
            interval.low(),
            interval.high(),
            low.indicator,
            high.indicator,
        );
    }

    let solution = bisection::solve(&oracle, interval, &settings, log_iteration)?;

    if solution.status == Status::ResolutionLimit {
        log::warn!(
            "stopped after {} of {} iterations: the bracket cannot be split further",
            solution.iters(),
            args.iterations,
        );
    }
    if solution.iters() >= 2
        && let Some(step) = solution.pinned_step()
    {
        let phase = match step {
            Step::RaiseLow => Phase::Disordered,
            Step::LowerHigh => Phase::Ordered,
        };
        log::warn!(
            "every midpoint was {phase}; the critical temperature may lie outside [{}, {}]",
            interval.low(),
            interval.high(),
        );
    }
    log::info!(
        "critical temperature {:.10} +/- {:.2e}",
        solution.estimate(),
        solution.precision() / 2.0,
    );

    let path = SaveKey::from_config(&config)
        .save_dir(out_dir)
        .join(CRITICAL_FILE);
    let saved = store::write_json(role, &path, &CriticalRun::new(&config, &solution))?
        .then_some(path);

    banner.finish();
    Ok(Outcome { solution, saved })
}
