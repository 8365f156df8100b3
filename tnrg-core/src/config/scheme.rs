use serde::ser::SerializeMap;

use super::{ConfigError, Options};

/// Bond dimensions of the block-tensor coarse-graining step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDims {
    pub chi_m: usize,
    pub chi_i: usize,
    pub chi_ii: usize,
}

/// Cube entanglement-filtering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubeFilter {
    pub chis: usize,
    pub chienv: usize,
    pub epsilon: f64,
    pub enabled: bool,
}

/// Loop entanglement-filtering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopFilter {
    pub chi_ms: usize,
    pub chi_menv: usize,
    pub epsilon_m: f64,
    pub enabled: bool,
}

/// Scheme-specific parameters, one variant per supported scheme/version.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemeParams {
    /// Higher-order TRG in 3D. The version string is not consulted.
    Hotrg3d,
    /// Block-tensor HOTRG with every inner dimension equal to `chi`.
    /// The version string is not consulted.
    BlockHotrg(BlockDims),
    /// Entanglement-filtering RG with cube filtering only.
    EfrgBase { block: BlockDims, cube: CubeFilter },
    /// Entanglement-filtering RG with both cube and loop filtering.
    EfrgBistage {
        block: BlockDims,
        cube: CubeFilter,
        loop_filter: LoopFilter,
    },
}

impl SchemeParams {
    /// Selects the variant for the options' scheme and version.
    pub(super) fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let block = BlockDims {
            chi_m: options.chi_m,
            chi_i: options.chi_i,
            chi_ii: options.chi_ii,
        };
        let cube = CubeFilter {
            chis: options.chis,
            chienv: options.chienv,
            epsilon: options.epsilon,
            enabled: !options.cube_off,
        };

        match (options.scheme.as_str(), options.version.as_str()) {
            ("hotrg3d", _) => Ok(Self::Hotrg3d),
            ("blockHOTRG", _) => Ok(Self::BlockHotrg(BlockDims {
                chi_m: options.chi,
                chi_i: options.chi,
                chi_ii: options.chi,
            })),
            ("efrg", "base") => Ok(Self::EfrgBase {
                block,
                cube: CubeFilter {
                    enabled: true,
                    ..cube
                },
            }),
            ("efrg", "bistage") => Ok(Self::EfrgBistage {
                block,
                cube,
                loop_filter: LoopFilter {
                    chi_ms: options.chi_ms,
                    chi_menv: options.chi_menv,
                    epsilon_m: options.epsilon_m,
                    enabled: !options.loop_off,
                },
            }),
            (scheme, version) => Err(ConfigError::Unsupported {
                scheme: scheme.to_string(),
                version: version.to_string(),
            }),
        }
    }

    /// Returns the scheme name as understood by the RG library.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hotrg3d => "hotrg3d",
            Self::BlockHotrg(_) => "blockHOTRG",
            Self::EfrgBase { .. } | Self::EfrgBistage { .. } => "efrg",
        }
    }

    /// Returns the block dimensions, if the scheme has a block step.
    #[must_use]
    pub fn block(&self) -> Option<&BlockDims> {
        match self {
            Self::Hotrg3d => None,
            Self::BlockHotrg(block)
            | Self::EfrgBase { block, .. }
            | Self::EfrgBistage { block, .. } => Some(block),
        }
    }

    /// Returns the cube filter, if the scheme filters cubes.
    #[must_use]
    pub fn cube(&self) -> Option<&CubeFilter> {
        match self {
            Self::EfrgBase { cube, .. } | Self::EfrgBistage { cube, .. } => Some(cube),
            _ => None,
        }
    }

    /// Returns the loop filter, if the scheme filters loops.
    #[must_use]
    pub fn loop_filter(&self) -> Option<&LoopFilter> {
        match self {
            Self::EfrgBistage { loop_filter, .. } => Some(loop_filter),
            _ => None,
        }
    }

    pub(super) fn check_dims(&self) -> Result<(), ConfigError> {
        let mut dims: Vec<(&'static str, usize)> = Vec::new();
        if let Some(block) = self.block() {
            dims.extend([
                ("chiM", block.chi_m),
                ("chiI", block.chi_i),
                ("chiII", block.chi_ii),
            ]);
        }
        if let Some(cube) = self.cube() {
            dims.extend([("chis", cube.chis), ("chienv", cube.chienv)]);
        }
        if let Some(loop_filter) = self.loop_filter() {
            dims.extend([("chiMs", loop_filter.chi_ms), ("chiMenv", loop_filter.chi_menv)]);
        }

        match dims.into_iter().find(|&(_, value)| value == 0) {
            Some((name, _)) => Err(ConfigError::ZeroBondDimension { name }),
            None => Ok(()),
        }
    }

    /// Writes the scheme's keys into a flat parameter map.
    pub(super) fn serialize_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        if let Some(block) = self.block() {
            map.serialize_entry("chiM", &block.chi_m)?;
            map.serialize_entry("chiI", &block.chi_i)?;
            map.serialize_entry("chiII", &block.chi_ii)?;
        }
        if let Some(cube) = self.cube() {
            map.serialize_entry("chis", &cube.chis)?;
            map.serialize_entry("chienv", &cube.chienv)?;
            map.serialize_entry("epsilon", &cube.epsilon)?;
        }
        if let Self::EfrgBistage {
            cube, loop_filter, ..
        } = self
        {
            map.serialize_entry("chiMs", &loop_filter.chi_ms)?;
            map.serialize_entry("chiMenv", &loop_filter.chi_menv)?;
            map.serialize_entry("epsilonM", &loop_filter.epsilon_m)?;
            map.serialize_entry("cubeFilter", &cube.enabled)?;
            map.serialize_entry("loopFilter", &loop_filter.enabled)?;
        }
        Ok(())
    }
}
