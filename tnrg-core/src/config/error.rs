use thiserror::Error;

/// Errors raised while assembling an [`RgConfig`](super::RgConfig).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported configuration: scheme `{scheme}` with version `{version}`")]
    Unsupported { scheme: String, version: String },

    #[error("bond dimension `{name}` must be positive")]
    ZeroBondDimension { name: &'static str },
}
