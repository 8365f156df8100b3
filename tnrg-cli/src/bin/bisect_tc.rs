use std::process::ExitCode;

use clap::Parser;
use tnrg_cli::{args::BisectArgs, backend::CommandEvaluator, drivers::bisect, logging};
use tnrg_core::ParallelContext;

fn main() -> ExitCode {
    let args = BisectArgs::parse();
    let parallel = ParallelContext::detect(args.common.parallel);
    logging::init(&parallel);

    let evaluator = CommandEvaluator::from_flag_or_env(args.common.backend.clone());
    tnrg_cli::exit_code(bisect::run(&args, &evaluator, parallel))
}
