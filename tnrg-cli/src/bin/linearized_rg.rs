use std::process::ExitCode;

use clap::Parser;
use tnrg_cli::{args::LinearizedArgs, backend::CommandEvaluator, drivers::linearized, logging};
use tnrg_core::ParallelContext;

fn main() -> ExitCode {
    let args = LinearizedArgs::parse();
    let parallel = ParallelContext::detect(args.common.parallel);
    logging::init(&parallel);

    let evaluator = CommandEvaluator::from_flag_or_env(args.common.backend.clone());
    tnrg_cli::exit_code(linearized::run(&args, &evaluator, parallel))
}
