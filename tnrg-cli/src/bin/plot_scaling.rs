use std::process::ExitCode;

use clap::Parser;
use tnrg_cli::{args::PlotArgs, drivers::plot, logging};
use tnrg_core::ParallelContext;

fn main() -> ExitCode {
    let args = PlotArgs::parse();
    let parallel = ParallelContext::detect(args.parallel);
    logging::init(&parallel);

    tnrg_cli::exit_code(plot::run(&args, parallel))
}
