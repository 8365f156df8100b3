//! Parameter assembly for the RG evaluator.
//!
//! Drivers collect a flat set of [`Options`] from the command line and turn
//! them into one immutable [`RgConfig`] with [`RgConfig::assemble`]. The
//! scheme-specific parameters live in [`SchemeParams`], one variant per
//! supported scheme/version pair, so a parameter group can only reach a
//! scheme that understands it.

mod error;
mod options;
mod scheme;

pub use error::ConfigError;
pub use options::Options;
pub use scheme::{BlockDims, CubeFilter, LoopFilter, SchemeParams};

use std::path::PathBuf;

use serde::{Serialize, Serializer, ser::SerializeMap};

/// Coarse-graining truncation epsilon used by every driver.
pub const CG_EPS: f64 = 1e-8;

/// What the assembled configuration will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// Bisection runs: the evaluator decides the phase of the flow.
    FindCritical,
    /// RG flow at the critical temperature, optionally displayed.
    Flow { display: bool },
    /// Linearization of a stored flow; no further coarse-graining steps.
    Linearize,
}

/// Immutable configuration passed to the RG evaluator.
///
/// Serializes to the flat parameter mapping the RG library consumes
/// (`isZ2`, `rg_n`, `chi`, `chiM`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct RgConfig {
    pub is_z2: bool,
    pub rg_steps: usize,
    pub chi: usize,
    pub cg_eps: f64,
    pub display: bool,
    pub data_dir: Option<PathBuf>,
    pub determine_phase: bool,
    pub version: String,
    pub scheme: SchemeParams,
}

impl RgConfig {
    /// Builds the configuration for `purpose` from flat options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unsupported`] for an unknown scheme or an
    /// `efrg` version other than `base`/`bistage`, and
    /// [`ConfigError::ZeroBondDimension`] if a bond dimension in use is zero.
    pub fn assemble(options: &Options, purpose: Purpose) -> Result<Self, ConfigError> {
        let scheme = SchemeParams::from_options(options)?;
        if options.chi == 0 {
            return Err(ConfigError::ZeroBondDimension { name: "chi" });
        }
        scheme.check_dims()?;

        let (rg_steps, display, determine_phase) = match purpose {
            Purpose::FindCritical => (options.rg_steps, false, true),
            Purpose::Flow { display } => (options.rg_steps, display, false),
            Purpose::Linearize => (0, false, false),
        };

        Ok(Self {
            is_z2: true,
            rg_steps,
            chi: options.chi,
            cg_eps: CG_EPS,
            display,
            data_dir: None,
            determine_phase,
            version: options.version.clone(),
            scheme,
        })
    }

    /// Returns the scheme name as understood by the RG library.
    #[must_use]
    pub fn scheme_name(&self) -> &'static str {
        self.scheme.name()
    }
}

impl Serialize for RgConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("isZ2", &self.is_z2)?;
        map.serialize_entry("rg_n", &self.rg_steps)?;
        map.serialize_entry("chi", &self.chi)?;
        map.serialize_entry("cg_eps", &self.cg_eps)?;
        map.serialize_entry("display", &self.display)?;
        map.serialize_entry("dataDir", &self.data_dir)?;
        map.serialize_entry("determPhase", &self.determine_phase)?;
        self.scheme.serialize_entries(&mut map)?;
        map.end()
    }
}
