use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase decision reported by an oracle for one temperature.
///
/// Searches treat an `Ordered` temperature as lying above the critical point and a
/// `Disordered` temperature as lying below it. Oracles label their fixed points in
/// that convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ordered,
    Disordered,
}

impl Phase {
    /// Classifies a signed indicator, positive values meaning ordered.
    ///
    /// Zero counts as disordered.
    #[must_use]
    pub fn from_indicator(value: f64) -> Self {
        if value > 0.0 {
            Phase::Ordered
        } else {
            Phase::Disordered
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Ordered => "ordered",
            Phase::Disordered => "disordered",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A callable that reports the phase of the model at a given temperature.
///
/// Oracles are expected to be deterministic: the same temperature always
/// produces the same output, so repeated searches give identical brackets.
/// The oracle alone decides what "ordered" means; searches only consume the
/// [`Phase`] returned by [`PhaseOracle::classify`].
pub trait PhaseOracle {
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Runs the oracle at `temperature`.
    ///
    /// # Errors
    ///
    /// Each oracle defines its own `Error` type for failures such as
    /// non-convergence of the underlying RG flow.
    fn evaluate(&self, temperature: f64) -> Result<Self::Output, Self::Error>;

    /// Reduces an oracle output to a phase decision.
    fn classify(&self, output: &Self::Output) -> Phase;
}
