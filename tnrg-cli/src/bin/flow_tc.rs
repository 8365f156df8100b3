use std::process::ExitCode;

use clap::Parser;
use tnrg_cli::{args::FlowArgs, backend::CommandEvaluator, drivers::flow, logging};
use tnrg_core::ParallelContext;

fn main() -> ExitCode {
    let args = FlowArgs::parse();
    let parallel = ParallelContext::detect(args.common.parallel);
    logging::init(&parallel);

    let evaluator = CommandEvaluator::from_flag_or_env(args.common.backend.clone());
    tnrg_cli::exit_code(flow::run(&args, &evaluator, parallel))
}
