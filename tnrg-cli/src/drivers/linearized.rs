use std::path::PathBuf;

use tnrg_core::{
    ParallelContext, Purpose, RgConfig, RgEvaluator, SaveKey, ScalingTable, SpinSector,
    evaluator::{Run, ScalingRequest, SectorSelection},
    layout::{SCALING_FILE, tensors_dir},
    store,
};

use crate::{
    AppError,
    args::{LinearizedArgs, SectorChoice},
    banner,
};

/// Result of a linearization run.
#[derive(Debug)]
pub struct Outcome {
    pub selection: SectorSelection,
    pub table: ScalingTable,
    pub saved: Option<PathBuf>,
}

/// Maps the sector flags to a selection.
///
/// `both` extracts every sector over `[rg_start, rg_end]`; a single spin
/// sector extracts one reflection sector at `rg_start`.
#[must_use]
pub fn selection(args: &LinearizedArgs) -> SectorSelection {
    match args.sector_choice {
        SectorChoice::Both => SectorSelection::all(args.rg_start, args.rg_end),
        SectorChoice::Even => {
            SectorSelection::single(args.rg_start, SpinSector::Even, args.refl_choice)
        }
        SectorChoice::Odd => {
            SectorSelection::single(args.rg_start, SpinSector::Odd, args.refl_choice)
        }
    }
}

/// File name for the scaling dimensions of `selection`.
#[must_use]
pub fn file_name(selection: &SectorSelection) -> String {
    match selection {
        SectorSelection::AllSectors { .. } => SCALING_FILE.to_string(),
        SectorSelection::SingleSector {
            rg_step,
            spin,
            reflection,
            ..
        } => format!("scaling_dimensions_{spin}{reflection}_rg{rg_step}.json"),
    }
}

/// Linearizes the RG map and stores the scaling dimensions.
///
/// # Errors
///
/// Fails on an unsupported configuration, an evaluator failure, or when the
/// table cannot be written.
pub fn run<E: RgEvaluator>(
    args: &LinearizedArgs,
    evaluator: &E,
    parallel: ParallelContext,
) -> Result<Outcome, AppError> {
    let role = parallel.role();
    let config = RgConfig::assemble(&args.options(), Purpose::Linearize)?;
    let selection = selection(args);

    let banner = banner::Banner::start(
        role,
        &banner::scheme_lines(config.scheme_name(), &config.version, config.chi),
    );

    let out_dir = &args.common.out_dir;
    let request = ScalingRequest {
        run: Run::new(&config, out_dir, parallel),
        selection,
    };
    let table = evaluator
        .scaling_dimensions(&request)
        .map_err(|err| AppError::evaluator(&err))?;
    log::info!("scaling dimensions for {} RG steps", table.len());

    let path = tensors_dir(&SaveKey::from_config(&config).save_dir(out_dir))
        .join(file_name(&selection));
    let saved = store::write_json(role, &path, &table)?.then_some(path);

    banner.finish();
    Ok(Outcome {
        selection,
        table,
        saved,
    })
}
