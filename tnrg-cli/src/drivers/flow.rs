use std::path::PathBuf;

use tnrg_core::{
    ParallelContext, Purpose, RgConfig, RgEvaluator, SaveKey,
    evaluator::{FlowReport, FlowRequest, Run},
    layout::FLOW_FILE,
    store,
};

use crate::{AppError, args::FlowArgs, banner};

/// Result of a flow run.
#[derive(Debug)]
pub struct Outcome {
    pub report: FlowReport,
    pub saved: Option<PathBuf>,
}

/// Regenerates the RG flow at the stored critical temperature.
///
/// # Errors
///
/// Fails on an unsupported configuration, an evaluator failure, or when the
/// flow summary cannot be written.
pub fn run<E: RgEvaluator>(
    args: &FlowArgs,
    evaluator: &E,
    parallel: ParallelContext,
) -> Result<Outcome, AppError> {
    let role = parallel.role();
    let purpose = Purpose::Flow {
        display: role.is_coordinator(),
    };
    let config = RgConfig::assemble(&args.options(), purpose)?;

    let mut lines = banner::scheme_lines(config.scheme_name(), &config.version, config.chi);
    lines.push(format!("    RG steps is --{}--", config.rg_steps));
    let banner = banner::Banner::start(role, &lines);

    let out_dir = &args.common.out_dir;
    let request = FlowRequest {
        run: Run::new(&config, out_dir, parallel),
        plot_rg_max: args.plot_rg_max,
    };
    let report = evaluator
        .generate_flow(&request)
        .map_err(|err| AppError::evaluator(&err))?;

    log::info!(
        "flow at T = {:.10} over {} RG steps",
        report.temperature,
        report.rg_steps.len()
    );
    if let Some(last) = report.tensor_differences.last() {
        log::info!("last tensor difference {last:.4e}");
    }

    let path = SaveKey::from_config(&config)
        .save_dir(out_dir)
        .join(FLOW_FILE);
    let saved = store::write_json(role, &path, &report)?.then_some(path);

    banner.finish();
    Ok(Outcome { report, saved })
}
