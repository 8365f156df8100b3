//! Process roles for multi-process runs.
//!
//! Under a parallel launcher every process runs the same driver. Only the
//! coordinator prints and writes files; workers take part in the evaluator's
//! own parallel computation and otherwise stay silent.

use serde::Serialize;

/// Environment variables that carry the process rank, by launcher.
const RANK_VARS: [&str; 4] = ["OMPI_COMM_WORLD_RANK", "PMI_RANK", "PMIX_RANK", "SLURM_PROCID"];

/// Environment variables that carry the number of processes, by launcher.
const SIZE_VARS: [&str; 4] = ["OMPI_COMM_WORLD_SIZE", "PMI_SIZE", "PMIX_SIZE", "SLURM_NTASKS"];

/// Parallel execution context handed through to the RG evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParallelContext {
    pub enabled: bool,
    pub rank: usize,
    pub size: usize,
}

impl ParallelContext {
    /// Context of a single-process run.
    #[must_use]
    pub fn serial() -> Self {
        Self {
            enabled: false,
            rank: 0,
            size: 1,
        }
    }

    /// Reads the context from the process environment.
    ///
    /// When `parallel` is false the run is serial regardless of the
    /// environment.
    #[must_use]
    pub fn detect(parallel: bool) -> Self {
        Self::from_lookup(parallel, |key| std::env::var(key).ok())
    }

    /// Reads the context through `lookup`, which maps variable names to values.
    pub fn from_lookup(parallel: bool, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if !parallel {
            return Self::serial();
        }

        let read = |vars: &[&str]| {
            vars.iter()
                .find_map(|key| lookup(key).and_then(|value| value.trim().parse::<usize>().ok()))
        };

        let rank = read(&RANK_VARS).unwrap_or(0);
        let size = read(&SIZE_VARS).unwrap_or(1).max(rank + 1);

        Self {
            enabled: true,
            rank,
            size,
        }
    }

    /// Whether parallel execution was requested but no launcher reported
    /// more than one process, so the run is effectively serial.
    #[must_use]
    pub fn lacks_launcher(&self) -> bool {
        self.enabled && self.size == 1
    }

    /// Returns this process's role.
    #[must_use]
    pub fn role(&self) -> Role {
        if self.rank == 0 {
            Role::Coordinator
        } else {
            Role::Worker { rank: self.rank }
        }
    }
}

/// Whether a process owns console output and result files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Rank zero: prints banners and writes results.
    Coordinator,
    /// Any other rank.
    Worker { rank: usize },
}

impl Role {
    #[must_use]
    pub fn is_coordinator(self) -> bool {
        matches!(self, Role::Coordinator)
    }
}
