pub mod config;
pub mod evaluator;
pub mod layout;
pub mod phase;
pub mod role;
pub mod scaling;
pub mod store;

pub use config::{ConfigError, Options, Purpose, RgConfig, SchemeParams};
pub use evaluator::{RgEvaluator, TemperatureOracle};
pub use layout::SaveKey;
pub use phase::{Phase, PhaseOracle};
pub use role::{ParallelContext, Role};
pub use scaling::{ReflectionSector, ScalingTable, SpinSector, StepDimensions};
