//! Storage Gateway
//!
//! The gateway is the only shared mutable resource in the system: parsers
//! hand it fully-built record sets, the interpolation engine pulls curves
//! and trajectories back out of it. Implementations own transaction
//! scoping — callers never manage connections or locks.
//!
//! Two backends:
//! - [`SledStore`]: durable sled-backed store (named trees, big-endian
//!   u64 well keys, JSON values)
//! - [`MemoryStore`]: in-memory store for tests and minimal deployments

mod memory;
mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

use crate::types::{
    CurveSample, InterpolatedPoint, ThicknessKind, ThicknessRecord, TrajectoryPoint, WellRecord,
};

/// Storage errors. Any persistence failure aborts the current well's unit
/// of work; already-committed wells are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Trait for pluggable persistence backends.
///
/// Implementations must be thread-safe (`Send + Sync`) and must make every
/// replace-style operation atomic: a reader never observes a half-replaced
/// set of curves, trajectory points, or interpolated points for a well.
pub trait StorageGateway: Send + Sync {
    /// Insert or overwrite a well record. On conflict the name and
    /// measured-depth range are overwritten.
    fn upsert_well(&self, well: &WellRecord) -> Result<WellRecord, StorageError>;

    fn well_exists(&self, well_id: u64) -> Result<bool, StorageError>;

    /// All known wells, ordered by id.
    fn get_wells(&self) -> Result<Vec<WellRecord>, StorageError>;

    fn get_well(&self, well_id: u64) -> Result<Option<WellRecord>, StorageError>;

    /// Upsert the well and replace its curve samples in one transaction.
    ///
    /// This is the well-file unit of work: if either write fails, neither
    /// is visible. Sample ids are assigned by the backend. Returns the
    /// number of samples stored.
    fn store_well_file(
        &self,
        well: &WellRecord,
        samples: Vec<CurveSample>,
    ) -> Result<usize, StorageError>;

    /// Replace the full curve sample set for a well. Assigns sample ids.
    fn replace_curves(
        &self,
        well_id: u64,
        samples: Vec<CurveSample>,
    ) -> Result<usize, StorageError>;

    fn get_curves(&self, well_id: u64) -> Result<Vec<CurveSample>, StorageError>;

    /// Replace the full trajectory point set for a well.
    fn replace_trajectory(
        &self,
        well_id: u64,
        points: Vec<TrajectoryPoint>,
    ) -> Result<usize, StorageError>;

    fn get_trajectory(&self, well_id: u64) -> Result<Vec<TrajectoryPoint>, StorageError>;

    /// Append thickness rows. Unlike curves and trajectories this is
    /// append-only: re-ingestion adds rows without deleting prior ones.
    fn append_thickness(
        &self,
        kind: ThicknessKind,
        records: Vec<ThicknessRecord>,
    ) -> Result<usize, StorageError>;

    fn get_thickness(
        &self,
        kind: ThicknessKind,
        well_id: u64,
    ) -> Result<Vec<ThicknessRecord>, StorageError>;

    /// Replace the interpolated points for a well with the latest run's
    /// output, discarding any previous run.
    fn replace_interpolated(
        &self,
        well_id: u64,
        points: Vec<InterpolatedPoint>,
    ) -> Result<usize, StorageError>;

    fn get_interpolated(&self, well_id: u64) -> Result<Vec<InterpolatedPoint>, StorageError>;

    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;
}

/// Create the well if it is not stored yet; never overwrites an existing
/// record.
///
/// Trajectory and thickness files reference wells by name token only, so
/// a stub record (name, no depth range) is created lazily on first sight.
pub fn ensure_well(
    store: &dyn StorageGateway,
    well_id: u64,
    name: &str,
) -> Result<(), StorageError> {
    if !store.well_exists(well_id)? {
        tracing::debug!(well_id, name, "creating stub well record");
        store.upsert_well(&WellRecord::stub(well_id, name))?;
    }
    Ok(())
}
