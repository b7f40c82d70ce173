//! Core domain records shared by ingestion, storage, and interpolation.
//!
//! Everything here is a plain serializable value type. Records are produced
//! by the parsers in [`crate::ingest`], persisted through the
//! [`crate::storage::StorageGateway`], and consumed by the interpolation
//! engine in [`crate::interpolation`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single drilled borehole.
///
/// The numeric id is derived from the trailing digit run of the well's name
/// token (see [`crate::ingest::well_id::derive_well_id`]); the name is the
/// token itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellRecord {
    pub id: u64,
    pub name: String,
    /// First measured depth of the logged interval, if the header carried one.
    pub start_measured_depth: Option<f64>,
    /// Last measured depth of the logged interval, if the header carried one.
    pub end_measured_depth: Option<f64>,
}

impl WellRecord {
    /// Minimal record for a well that is only known by name so far.
    ///
    /// Used when a trajectory or thickness file references a well that has
    /// not been ingested from a well file yet.
    pub fn stub(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            start_measured_depth: None,
            end_measured_depth: None,
        }
    }
}

/// Binary type flag attached to a curve sample.
///
/// The source format encodes the flag as a free-form token: only tokens that
/// parse to exactly 0.0 or 1.0 are meaningful, everything else (other
/// numbers, non-numeric junk, missing) collapses to [`SampleType::Unspecified`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleType {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl SampleType {
    /// Normalize a raw column token into a type flag.
    pub fn from_token(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(v) if v == 0.0 => Self::Zero,
            Ok(v) if v == 1.0 => Self::One,
            _ => Self::Unspecified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Unspecified => "",
        }
    }
}

/// One depth-indexed log measurement belonging to a well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    /// Assigned by the storage backend when the sample is persisted;
    /// 0 until then.
    pub id: u64,
    pub well_id: u64,
    /// Distance along the borehole path from the reference point.
    pub measured_depth: f64,
    pub sample_type: SampleType,
}

/// One surveyed position of the borehole path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub well_id: u64,
    pub lat: f64,
    pub lon: f64,
    /// True vertical depth at this survey station.
    pub absolute_depth: f64,
    pub measured_depth: f64,
}

/// Which of the two thickness table variants a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThicknessKind {
    Formation,
    Effective,
}

impl ThicknessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formation => "formation",
            Self::Effective => "effective",
        }
    }
}

impl fmt::Display for ThicknessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThicknessKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "formation" => Ok(Self::Formation),
            "effective" => Ok(Self::Effective),
            other => Err(format!(
                "unknown thickness kind '{other}' (expected 'formation' or 'effective')"
            )),
        }
    }
}

/// One row of a formation / effective-formation thickness table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThicknessRecord {
    pub well_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub absolute_depth: f64,
    /// None when the value column could not be parsed; the row is still kept.
    pub thickness: Option<f64>,
}

/// Interpolated coordinates for one curve sample.
///
/// Derived data: recomputed (and replaced per well) every time the
/// interpolation engine runs, never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedPoint {
    pub curve_sample_id: u64,
    pub lat: f64,
    pub lon: f64,
    pub absolute_depth: f64,
}

/// Read-side join of a curve sample with its interpolated coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveWithCoords {
    pub curve_sample_id: u64,
    pub well_id: u64,
    pub sample_type: SampleType,
    pub measured_depth: f64,
    pub lat: f64,
    pub lon: f64,
    pub absolute_depth: f64,
}

// ============================================================================
// Operation summaries
// ============================================================================

/// Result of ingesting one well file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellFileSummary {
    pub well_id: u64,
    pub well_name: String,
    pub curves_saved: usize,
    /// Data lines dropped by the tolerant line-level parse policy.
    pub lines_skipped: usize,
}

/// Result of ingesting one welltrack trajectory file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelltrackSummary {
    pub wells_processed: usize,
    pub rows_saved: usize,
    pub lines_skipped: usize,
}

/// Result of ingesting one thickness table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThicknessSummary {
    pub kind: ThicknessKind,
    pub rows_saved: usize,
    pub wells_touched: usize,
    pub lines_skipped: usize,
}

/// A well that could not be interpolated, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolationFailure {
    pub well_id: u64,
    pub reason: String,
}

/// Result of a batch interpolation run across all wells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterpolationSummary {
    pub wells_processed: usize,
    pub points_saved: usize,
    pub failures: Vec<InterpolationFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_type_normalization() {
        assert_eq!(SampleType::from_token("0"), SampleType::Zero);
        assert_eq!(SampleType::from_token("0.0"), SampleType::Zero);
        assert_eq!(SampleType::from_token("1"), SampleType::One);
        assert_eq!(SampleType::from_token("1.000"), SampleType::One);
        assert_eq!(SampleType::from_token("2"), SampleType::Unspecified);
        assert_eq!(SampleType::from_token("0.5"), SampleType::Unspecified);
        assert_eq!(SampleType::from_token("abc"), SampleType::Unspecified);
        assert_eq!(SampleType::from_token(""), SampleType::Unspecified);
    }

    #[test]
    fn test_sample_type_serializes_as_flag_string() {
        assert_eq!(serde_json::to_string(&SampleType::Zero).unwrap(), "\"0\"");
        assert_eq!(serde_json::to_string(&SampleType::One).unwrap(), "\"1\"");
        assert_eq!(
            serde_json::to_string(&SampleType::Unspecified).unwrap(),
            "\"\""
        );
    }

    #[test]
    fn test_thickness_kind_from_str() {
        assert_eq!("formation".parse::<ThicknessKind>().unwrap(), ThicknessKind::Formation);
        assert_eq!("Effective".parse::<ThicknessKind>().unwrap(), ThicknessKind::Effective);
        assert!("porosity".parse::<ThicknessKind>().is_err());
    }

    #[test]
    fn test_well_record_serde_roundtrip() {
        let well = WellRecord {
            id: 42,
            name: "NAME42".to_string(),
            start_measured_depth: Some(100.0),
            end_measured_depth: None,
        };
        let json = serde_json::to_vec(&well).unwrap();
        let decoded: WellRecord = serde_json::from_slice(&json).unwrap();
        assert_eq!(decoded, well);
    }
}
