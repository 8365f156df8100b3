//! Scaling dimensions extracted from the linearized RG map.
//!
//! Operators are labelled by their spin-flip parity and by their parity
//! under the three lattice reflections. The reflection sector `100`, for
//! example, is odd under the x-reflection and even under the other two.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Spin-flip parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinSector {
    Even,
    Odd,
}

impl SpinSector {
    pub const ALL: [SpinSector; 2] = [SpinSector::Even, SpinSector::Odd];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SpinSector::Even => "even",
            SpinSector::Odd => "odd",
        }
    }
}

/// Lattice-reflection parity, as a string of three bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReflectionSector {
    #[serde(rename = "000")]
    R000,
    #[serde(rename = "100")]
    R100,
    #[serde(rename = "010")]
    R010,
    #[serde(rename = "001")]
    R001,
    #[serde(rename = "110")]
    R110,
    #[serde(rename = "101")]
    R101,
    #[serde(rename = "011")]
    R011,
}

impl ReflectionSector {
    /// All sectors in storage order.
    pub const ALL: [ReflectionSector; 7] = [
        ReflectionSector::R000,
        ReflectionSector::R100,
        ReflectionSector::R010,
        ReflectionSector::R001,
        ReflectionSector::R110,
        ReflectionSector::R101,
        ReflectionSector::R011,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReflectionSector::R000 => "000",
            ReflectionSector::R100 => "100",
            ReflectionSector::R010 => "010",
            ReflectionSector::R001 => "001",
            ReflectionSector::R110 => "110",
            ReflectionSector::R101 => "101",
            ReflectionSector::R011 => "011",
        }
    }

    /// Number of reflections the sector is odd under.
    #[must_use]
    pub fn odd_reflections(self) -> usize {
        self.as_str().bytes().filter(|&b| b == b'1').count()
    }

    fn index(self) -> usize {
        match self {
            ReflectionSector::R000 => 0,
            ReflectionSector::R100 => 1,
            ReflectionSector::R010 => 2,
            ReflectionSector::R001 => 3,
            ReflectionSector::R110 => 4,
            ReflectionSector::R101 => 5,
            ReflectionSector::R011 => 6,
        }
    }
}

impl fmt::Display for ReflectionSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SpinSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized sector label.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown sector `{0}`")]
pub struct UnknownSector(pub String);

impl FromStr for SpinSector {
    type Err = UnknownSector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "even" => Ok(SpinSector::Even),
            "odd" => Ok(SpinSector::Odd),
            _ => Err(UnknownSector(s.to_string())),
        }
    }
}

impl FromStr for ReflectionSector {
    type Err = UnknownSector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReflectionSector::ALL
            .into_iter()
            .find(|sector| sector.as_str() == s)
            .ok_or_else(|| UnknownSector(s.to_string()))
    }
}

/// Number of scaling dimensions extracted when a single sector is requested.
///
/// The trivial sector keeps the most operators; sectors odd under more
/// reflections keep fewer.
#[must_use]
pub fn sector_count(spin: SpinSector, reflection: ReflectionSector) -> usize {
    match (spin, reflection.odd_reflections()) {
        (SpinSector::Even, 0) => 7,
        (SpinSector::Odd, 0) => 5,
        (SpinSector::Even, 1) => 3,
        (SpinSector::Odd, 1) => 4,
        _ => 2,
    }
}

/// Scaling dimensions of one reflection sector, split by spin-flip parity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorDimensions {
    pub even: Vec<f64>,
    pub odd: Vec<f64>,
}

impl SectorDimensions {
    #[must_use]
    pub fn spin(&self, spin: SpinSector) -> &[f64] {
        match spin {
            SpinSector::Even => &self.even,
            SpinSector::Odd => &self.odd,
        }
    }
}

/// Scaling dimensions at one RG step, for every reflection sector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDimensions {
    sectors: [SectorDimensions; 7],
}

impl StepDimensions {
    /// Builds a step from a lookup over all sectors.
    pub fn from_fn(mut f: impl FnMut(ReflectionSector) -> SectorDimensions) -> Self {
        Self {
            sectors: ReflectionSector::ALL.map(&mut f),
        }
    }

    #[must_use]
    pub fn sector(&self, reflection: ReflectionSector) -> &SectorDimensions {
        &self.sectors[reflection.index()]
    }

    /// Dimensions in one spin/reflection sector, in ascending order as stored.
    #[must_use]
    pub fn get(&self, reflection: ReflectionSector, spin: SpinSector) -> &[f64] {
        self.sector(reflection).spin(spin)
    }
}

/// Errors in a scaling-dimension table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table has {steps} RG steps but {records} records")]
    LengthMismatch { steps: usize, records: usize },
}

/// Scaling dimensions over a range of RG steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalingTable {
    pub rg_steps: Vec<usize>,
    pub records: Vec<StepDimensions>,
}

impl ScalingTable {
    /// Checks that every RG step has exactly one record.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::LengthMismatch`] if the lengths differ.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.rg_steps.len() == self.records.len() {
            Ok(())
        } else {
            Err(TableError::LengthMismatch {
                steps: self.rg_steps.len(),
                records: self.records.len(),
            })
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rg_steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rg_steps.is_empty()
    }

    /// Returns the entries with positions in `start..end`.
    ///
    /// Positions index the stored entries, not RG step numbers. A missing
    /// `end` means "through the last entry", and out-of-range bounds are
    /// clamped.
    #[must_use]
    pub fn slice(&self, start: usize, end: Option<usize>) -> Self {
        let len = self.len().min(self.records.len());
        let end = end.unwrap_or(len).min(len);
        let start = start.min(end);

        Self {
            rg_steps: self.rg_steps[start..end].to_vec(),
            records: self.records[start..end].to_vec(),
        }
    }

    /// Iterates over `(rg_step, dimensions)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &StepDimensions)> {
        self.rg_steps.iter().copied().zip(self.records.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(offset: f64) -> StepDimensions {
        StepDimensions::from_fn(|reflection| SectorDimensions {
            even: vec![offset + reflection.odd_reflections() as f64],
            odd: vec![offset + 0.5],
        })
    }

    fn table() -> ScalingTable {
        ScalingTable {
            rg_steps: vec![1, 2, 3, 4],
            records: vec![step(0.0), step(10.0), step(20.0), step(30.0)],
        }
    }

    #[test]
    fn parses_sector_labels() {
        assert_eq!("110".parse::<ReflectionSector>(), Ok(ReflectionSector::R110));
        assert_eq!("odd".parse::<SpinSector>(), Ok(SpinSector::Odd));
        assert!("111".parse::<ReflectionSector>().is_err());
        assert!("both".parse::<SpinSector>().is_err());
    }

    #[test]
    fn sector_counts_follow_reflection_parity() {
        use ReflectionSector::*;
        use SpinSector::*;

        assert_eq!(sector_count(Even, R000), 7);
        assert_eq!(sector_count(Odd, R000), 5);
        for reflection in [R100, R010, R001] {
            assert_eq!(sector_count(Even, reflection), 3);
            assert_eq!(sector_count(Odd, reflection), 4);
        }
        for reflection in [R110, R101, R011] {
            assert_eq!(sector_count(Even, reflection), 2);
            assert_eq!(sector_count(Odd, reflection), 2);
        }
    }

    #[test]
    fn step_lookup_by_sector() {
        let step = step(1.0);
        assert_eq!(step.get(ReflectionSector::R011, SpinSector::Even), &[3.0]);
        assert_eq!(step.get(ReflectionSector::R000, SpinSector::Odd), &[1.5]);
    }

    #[test]
    fn slice_behaves_like_python_slicing() {
        let table = table();

        let middle = table.slice(1, Some(3));
        assert_eq!(middle.rg_steps, vec![2, 3]);
        assert_eq!(middle.records[0], step(10.0));

        assert_eq!(table.slice(2, None).rg_steps, vec![3, 4]);
        assert_eq!(table.slice(0, Some(99)).len(), 4);
        assert!(table.slice(5, None).is_empty());
        assert!(table.slice(3, Some(1)).is_empty());
    }

    #[test]
    fn validate_catches_mismatch() {
        let mut table = table();
        assert!(table.validate().is_ok());

        table.rg_steps.push(5);
        assert_eq!(
            table.validate(),
            Err(TableError::LengthMismatch {
                steps: 5,
                records: 4
            })
        );
    }

    #[test]
    fn sectors_serialize_by_label() {
        let json = serde_json::to_string(&ReflectionSector::R101).unwrap();
        assert_eq!(json, "\"101\"");
    }
}
