//! Command-line arguments of the four drivers.
//!
//! Parsing stays here; the drivers only see the assembled [`Options`].

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use tnrg_core::{Options, ReflectionSector, SaveKey};

/// Flags shared by the drivers that call the RG evaluator.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// TNRG scheme.
    #[arg(long, default_value = "hotrg3d")]
    pub scheme: String,

    /// TNRG scheme version.
    #[arg(long = "ver", default_value = "base")]
    pub scheme_version: String,

    /// Bond dimension.
    #[arg(long, default_value_t = 2)]
    pub chi: usize,

    /// Output directory for RG flows, Tc and scaling dimensions.
    #[arg(long, default_value = "./")]
    pub out_dir: PathBuf,

    /// Run under a parallel launcher; only rank 0 prints and writes.
    #[arg(long)]
    pub parallel: bool,

    /// RG backend program (defaults to `$TNRG_BACKEND`, then `tnrg-backend`).
    #[arg(long)]
    pub backend: Option<PathBuf>,
}

/// Block-tensor and entanglement-filtering dimensions.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Intermediate bond dimension.
    #[arg(long, default_value_t = 2)]
    pub chi_m: usize,

    /// First inner bond dimension.
    #[arg(long, default_value_t = 2)]
    pub chi_i: usize,

    /// Second inner bond dimension.
    #[arg(long, default_value_t = 2)]
    pub chi_ii: usize,

    /// Cube-filtering bond dimension.
    #[arg(long, default_value_t = 4)]
    pub chis: usize,

    /// Initial SVD truncation of the cube environment.
    #[arg(long, default_value_t = 16)]
    pub chienv: usize,

    /// Initial SVD threshold of the cube environment.
    #[arg(long, default_value_t = 1e-6)]
    pub epsilon: f64,

    /// Loop-filtering bond dimension.
    #[arg(long, default_value_t = 4)]
    pub chi_ms: usize,

    /// Initial SVD truncation of the loop environment.
    #[arg(long, default_value_t = 16)]
    pub chi_menv: usize,

    /// Initial SVD threshold of the loop environment.
    #[arg(long, default_value_t = 1e-6)]
    pub epsilon_m: f64,

    /// Turn off loop filtering.
    #[arg(long)]
    pub loop_off: bool,

    /// Turn off cube filtering.
    #[arg(long)]
    pub cube_off: bool,
}

fn options(common: &CommonArgs, filter: &FilterArgs, rg_steps: usize) -> Options {
    Options {
        scheme: common.scheme.clone(),
        version: common.scheme_version.clone(),
        chi: common.chi,
        rg_steps,
        chi_m: filter.chi_m,
        chi_i: filter.chi_i,
        chi_ii: filter.chi_ii,
        chis: filter.chis,
        chienv: filter.chienv,
        epsilon: filter.epsilon,
        cube_off: filter.cube_off,
        chi_ms: filter.chi_ms,
        chi_menv: filter.chi_menv,
        epsilon_m: filter.epsilon_m,
        loop_off: filter.loop_off,
    }
}

/// Find the critical temperature of the 3D Ising model by bisection.
#[derive(Debug, Clone, Parser)]
#[command(name = "bisect-tc", version)]
pub struct BisectArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Maximal number of RG steps per flow.
    #[arg(long = "rgn", default_value_t = 12)]
    pub rg_steps: usize,

    /// Number of bisection iterations.
    #[arg(long = "itern", default_value_t = 6)]
    pub iterations: usize,

    /// Lower end of the temperature bracket.
    #[arg(long = "tlow", default_value_t = 4.0)]
    pub t_low: f64,

    /// Upper end of the temperature bracket.
    #[arg(long = "thi", default_value_t = 5.0)]
    pub t_high: f64,

    /// Evaluate both bracket ends first and stop unless they straddle Tc.
    #[arg(long)]
    pub check_bracket: bool,
}

impl BisectArgs {
    #[must_use]
    pub fn options(&self) -> Options {
        options(&self.common, &self.filter, self.rg_steps)
    }
}

/// Generate the RG flow at Tc.
#[derive(Debug, Clone, Parser)]
#[command(name = "flow-tc", version)]
pub struct FlowArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Maximal number of RG steps.
    #[arg(long = "rgn", default_value_t = 15)]
    pub rg_steps: usize,

    /// Last RG step shown in the flow figures.
    #[arg(long, default_value_t = 15)]
    pub plot_rg_max: usize,
}

impl FlowArgs {
    #[must_use]
    pub fn options(&self) -> Options {
        options(&self.common, &self.filter, self.rg_steps)
    }
}

/// Spin-flip sectors to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectorChoice {
    Both,
    Even,
    Odd,
}

/// Extract scaling dimensions from the linearized RG map.
#[derive(Debug, Clone, Parser)]
#[command(name = "linearized-rg", version)]
pub struct LinearizedArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Cube-filtering bond dimension.
    #[arg(long, default_value_t = 4)]
    pub chis: usize,

    /// Intermediate bond dimension.
    #[arg(long, default_value_t = 2)]
    pub chi_m: usize,

    /// Loop-filtering bond dimension.
    #[arg(long, default_value_t = 4)]
    pub chi_ms: usize,

    /// First RG step to linearize.
    #[arg(long = "rgstart", default_value_t = 1)]
    pub rg_start: usize,

    /// Last RG step to linearize.
    #[arg(long = "rgend", default_value_t = 8)]
    pub rg_end: usize,

    /// Spin-flip sector; anything but `both` extracts a single sector at `--rgstart`.
    #[arg(long, value_enum, default_value_t = SectorChoice::Both)]
    pub sector_choice: SectorChoice,

    /// Reflection sector used with a single spin-flip sector.
    #[arg(long, default_value = "000")]
    pub refl_choice: ReflectionSector,
}

impl LinearizedArgs {
    #[must_use]
    pub fn options(&self) -> Options {
        Options {
            scheme: self.common.scheme.clone(),
            version: self.common.scheme_version.clone(),
            chi: self.common.chi,
            chis: self.chis,
            chi_m: self.chi_m,
            chi_ms: self.chi_ms,
            ..Options::default()
        }
    }
}

/// Plot scaling dimensions against their best-known values.
#[derive(Debug, Clone, Parser)]
#[command(name = "plot-scaling", version)]
pub struct PlotArgs {
    /// TNRG scheme.
    #[arg(long, default_value = "blockHOTRG")]
    pub scheme: String,

    /// TNRG scheme version.
    #[arg(long = "ver", default_value = "base")]
    pub scheme_version: String,

    /// Bond dimension.
    #[arg(long, default_value_t = 2)]
    pub chi: usize,

    /// Cube-filtering bond dimension.
    #[arg(long, default_value_t = 4)]
    pub chis: usize,

    /// Intermediate bond dimension.
    #[arg(long, default_value_t = 2)]
    pub chi_m: usize,

    /// Loop-filtering bond dimension.
    #[arg(long, default_value_t = 4)]
    pub chi_ms: usize,

    /// Index of the first stored RG step to plot.
    #[arg(long = "startn", default_value_t = 0)]
    pub start: usize,

    /// Index one past the last stored RG step to plot.
    #[arg(long = "endn")]
    pub end: Option<usize>,

    /// Directory the scaling dimensions were saved under.
    #[arg(long, default_value = "./")]
    pub out_dir: PathBuf,

    /// Run under a parallel launcher; only rank 0 plots.
    #[arg(long)]
    pub parallel: bool,

    /// Log the relative errors without opening a window.
    #[arg(long)]
    pub no_window: bool,
}

impl PlotArgs {
    #[must_use]
    pub fn save_key(&self) -> SaveKey {
        SaveKey {
            scheme: self.scheme.clone(),
            version: self.scheme_version.clone(),
            chi: self.chi,
            chis: self.chis,
            chi_m: self.chi_m,
            chi_ms: self.chi_ms,
        }
    }
}
