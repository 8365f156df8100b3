//! Driver entry points.
//!
//! Each driver takes its parsed arguments, an [`RgEvaluator`] and the
//! process's [`ParallelContext`], so the binaries stay thin and tests can
//! swap in an in-memory evaluator.
//!
//! [`RgEvaluator`]: tnrg_core::RgEvaluator
//! [`ParallelContext`]: tnrg_core::ParallelContext

pub mod bisect;
pub mod flow;
pub mod linearized;
pub mod plot;
