//! Interface to the external RG evaluator.
//!
//! The evaluator owns all tensor work: running the coarse-graining flow,
//! deciding the phase of the flow's fixed point, and linearizing the RG map.
//! Drivers only describe what to run through the request types below and
//! persist what comes back.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    config::RgConfig,
    phase::{Phase, PhaseOracle},
    role::ParallelContext,
    scaling::{ReflectionSector, ScalingTable, SpinSector},
};

/// Number of scaling dimensions per spin sector when all sectors are extracted.
pub const ALL_SECTORS_COUNT: usize = 10;

/// Run-wide context shared by every request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Run<'a> {
    pub scheme: &'static str,
    pub version: &'a str,
    pub pars: &'a RgConfig,
    pub out_dir: &'a Path,
    pub parallel: ParallelContext,
}

impl<'a> Run<'a> {
    #[must_use]
    pub fn new(config: &'a RgConfig, out_dir: &'a Path, parallel: ParallelContext) -> Self {
        Self {
            scheme: config.scheme_name(),
            version: &config.version,
            pars: config,
            out_dir,
            parallel,
        }
    }
}

/// Run the RG flow at one temperature and report its phase.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PhaseRequest<'a> {
    #[serde(flatten)]
    pub run: Run<'a>,
    pub temperature: f64,
}

/// Phase decision for one temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    pub phase: Phase,
    /// Raw signed diagnostic behind the decision.
    pub indicator: f64,
}

/// Regenerate the RG flow at the stored critical temperature.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FlowRequest<'a> {
    #[serde(flatten)]
    pub run: Run<'a>,
    /// Last RG step included in the evaluator's own flow figures.
    pub plot_rg_max: usize,
}

/// Summary of an RG flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowReport {
    pub temperature: f64,
    pub rg_steps: Vec<usize>,
    /// Norm of the difference between consecutive normalized tensors.
    pub tensor_differences: Vec<f64>,
}

/// Which sectors to extract scaling dimensions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "selection", rename_all = "snake_case")]
pub enum SectorSelection {
    /// Every sector over a range of RG steps.
    AllSectors {
        rg_start: usize,
        rg_end: usize,
        even_count: usize,
        odd_count: usize,
    },
    /// One spin/reflection sector at one RG step.
    SingleSector {
        rg_step: usize,
        spin: SpinSector,
        reflection: ReflectionSector,
        count: usize,
    },
}

impl SectorSelection {
    /// All sectors with the default count per spin sector.
    #[must_use]
    pub fn all(rg_start: usize, rg_end: usize) -> Self {
        Self::AllSectors {
            rg_start,
            rg_end,
            even_count: ALL_SECTORS_COUNT,
            odd_count: ALL_SECTORS_COUNT,
        }
    }

    /// One sector with its usual count.
    #[must_use]
    pub fn single(rg_step: usize, spin: SpinSector, reflection: ReflectionSector) -> Self {
        Self::SingleSector {
            rg_step,
            spin,
            reflection,
            count: crate::scaling::sector_count(spin, reflection),
        }
    }
}

/// Linearize the RG map and extract scaling dimensions.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScalingRequest<'a> {
    #[serde(flatten)]
    pub run: Run<'a>,
    #[serde(flatten)]
    pub selection: SectorSelection,
}

/// The external RG library, as seen by the drivers.
///
/// Calls are synchronous and may run for a long time. Implementations do
/// not retry; a failed flow is reported through `Error`.
pub trait RgEvaluator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the flow at `request.temperature` and decides its phase.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow fails, for example on truncation
    /// instability.
    fn determine_phase(&self, request: &PhaseRequest<'_>) -> Result<PhaseReport, Self::Error>;

    /// Regenerates and stores the flow at the critical temperature.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow fails or no critical temperature is stored.
    fn generate_flow(&self, request: &FlowRequest<'_>) -> Result<FlowReport, Self::Error>;

    /// Linearizes the stored flow and extracts scaling dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is missing or the linearization fails.
    fn scaling_dimensions(
        &self,
        request: &ScalingRequest<'_>,
    ) -> Result<ScalingTable, Self::Error>;
}

impl<E: RgEvaluator + ?Sized> RgEvaluator for &E {
    type Error = E::Error;

    fn determine_phase(&self, request: &PhaseRequest<'_>) -> Result<PhaseReport, Self::Error> {
        (**self).determine_phase(request)
    }

    fn generate_flow(&self, request: &FlowRequest<'_>) -> Result<FlowReport, Self::Error> {
        (**self).generate_flow(request)
    }

    fn scaling_dimensions(
        &self,
        request: &ScalingRequest<'_>,
    ) -> Result<ScalingTable, Self::Error> {
        (**self).scaling_dimensions(request)
    }
}

/// Adapts an [`RgEvaluator`] into a [`PhaseOracle`] over temperature.
///
/// The configuration should be assembled for
/// [`Purpose::FindCritical`](crate::config::Purpose::FindCritical) so the
/// evaluator actually decides the phase.
pub struct TemperatureOracle<'a, E> {
    evaluator: &'a E,
    run: Run<'a>,
}

impl<'a, E: RgEvaluator> TemperatureOracle<'a, E> {
    #[must_use]
    pub fn new(evaluator: &'a E, run: Run<'a>) -> Self {
        if !run.pars.determine_phase {
            log::warn!("phase oracle built from a configuration that does not determine the phase");
        }
        Self { evaluator, run }
    }
}

impl<E: RgEvaluator> PhaseOracle for TemperatureOracle<'_, E> {
    type Output = PhaseReport;
    type Error = E::Error;

    fn evaluate(&self, temperature: f64) -> Result<Self::Output, Self::Error> {
        let request = PhaseRequest {
            run: self.run,
            temperature,
        };
        self.evaluator.determine_phase(&request)
    }

    fn classify(&self, output: &Self::Output) -> Phase {
        output.phase
    }
}
