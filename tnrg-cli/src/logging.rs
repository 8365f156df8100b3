use env_logger::Env;
use tnrg_core::ParallelContext;

/// Installs the logger on the coordinator; workers stay silent.
///
/// The default level is `info`. `RUST_LOG` overrides it. Problems found
/// while reading the parallel context are reported once the logger is up.
pub fn init(parallel: &ParallelContext) {
    if !parallel.role().is_coordinator() {
        return;
    }

    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .try_init();

    if parallel.lacks_launcher() {
        log::warn!("parallel execution requested but no launcher rank was found; running as rank 0");
    }
}
