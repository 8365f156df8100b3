//! Output directory layout.
//!
//! Every result of a run lands under a directory derived from the scheme,
//! version, and the bond dimensions that distinguish one run from another.
//! The plotting driver rebuilds the same key from its own flags to find the
//! files written by the extraction driver.

use std::path::{Path, PathBuf};

use crate::config::{RgConfig, SchemeParams};

/// File holding the bisection run.
pub const CRITICAL_FILE: &str = "critical_temperature.json";

/// File holding the RG flow summary at the critical temperature.
pub const FLOW_FILE: &str = "flow.json";

/// File holding scaling dimensions for all sectors.
pub const SCALING_FILE: &str = "scaling_dimensions.json";

/// Relative errors of the plotted scaling dimensions, inside the run directory.
pub const SCALING_ERRORS_FILE: &str = "scaling_errors.json";

/// Identifies a run's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveKey {
    pub scheme: String,
    pub version: String,
    pub chi: usize,
    pub chis: usize,
    pub chi_m: usize,
    pub chi_ms: usize,
}

impl SaveKey {
    /// Builds the key for an assembled configuration.
    #[must_use]
    pub fn from_config(config: &RgConfig) -> Self {
        let (chis, chi_m, chi_ms) = match &config.scheme {
            SchemeParams::EfrgBase { block, cube } => (cube.chis, block.chi_m, 0),
            SchemeParams::EfrgBistage {
                block,
                cube,
                loop_filter,
            } => (cube.chis, block.chi_m, loop_filter.chi_ms),
            SchemeParams::Hotrg3d | SchemeParams::BlockHotrg(_) => (0, 0, 0),
        };

        Self {
            scheme: config.scheme_name().to_string(),
            version: config.version.clone(),
            chi: config.chi,
            chis,
            chi_m,
            chi_ms,
        }
    }

    /// Returns the run directory under `out_dir`.
    ///
    /// The leaf name always carries `chi`; `efrg` adds `chis` and `chiM`,
    /// and its `bistage` version adds `chiMs`.
    #[must_use]
    pub fn save_dir(&self, out_dir: &Path) -> PathBuf {
        let mut leaf = format!("chi{}", self.chi);
        if self.scheme == "efrg" {
            leaf.push_str(&format!("_chis{}_chiM{}", self.chis, self.chi_m));
            if self.version == "bistage" {
                leaf.push_str(&format!("_chiMs{}", self.chi_ms));
            }
        }

        out_dir
            .join(format!("{}-{}", self.scheme, self.version))
            .join(leaf)
    }
}

/// Directory for tensor-derived data inside a run directory.
#[must_use]
pub fn tensors_dir(save_dir: &Path) -> PathBuf {
    save_dir.join("tensors")
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{Options, Purpose};

    fn key(scheme: &str, version: &str) -> SaveKey {
        SaveKey {
            scheme: scheme.into(),
            version: version.into(),
            chi: 6,
            chis: 4,
            chi_m: 12,
            chi_ms: 5,
        }
    }

    #[test]
    fn hotrg_dir_only_has_chi() {
        let dir = key("hotrg3d", "base").save_dir(Path::new("out"));
        assert_eq!(dir, Path::new("out/hotrg3d-base/chi6"));
    }

    #[test]
    fn efrg_dirs_name_filter_dims() {
        let base = key("efrg", "base").save_dir(Path::new("."));
        assert_eq!(base, Path::new("./efrg-base/chi6_chis4_chiM12"));

        let bistage = key("efrg", "bistage").save_dir(Path::new("."));
        assert_eq!(bistage, Path::new("./efrg-bistage/chi6_chis4_chiM12_chiMs5"));
    }

    #[test]
    fn key_from_config_matches_manual_key() {
        let options = Options {
            scheme: "efrg".into(),
            version: "bistage".into(),
            chi: 6,
            chis: 4,
            chi_m: 12,
            chi_ms: 5,
            ..Options::default()
        };
        let config = RgConfig::assemble(&options, Purpose::Linearize).unwrap();

        assert_eq!(SaveKey::from_config(&config), key("efrg", "bistage"));
    }

    #[test]
    fn tensors_live_under_save_dir() {
        assert_eq!(
            tensors_dir(Path::new("out/efrg-base")),
            Path::new("out/efrg-base/tensors")
        );
    }
}
