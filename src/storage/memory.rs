//! In-memory storage gateway for tests and minimal deployments.
//!
//! Thread-safe via `RwLock`. Not durable — data is lost on drop.

use super::{StorageError, StorageGateway};
use crate::types::{
    CurveSample, InterpolatedPoint, ThicknessKind, ThicknessRecord, TrajectoryPoint, WellRecord,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    wells: BTreeMap<u64, WellRecord>,
    curves: HashMap<u64, Vec<CurveSample>>,
    trajectory: HashMap<u64, Vec<TrajectoryPoint>>,
    thickness: HashMap<(ThicknessKind, u64), Vec<ThicknessRecord>>,
    interpolated: HashMap<u64, Vec<InterpolatedPoint>>,
}

/// In-memory storage gateway.
pub struct MemoryStore {
    inner: RwLock<Inner>,
    next_sample_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            next_sample_id: AtomicU64::new(1),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner
            .read()
            .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner
            .write()
            .map_err(|e| StorageError::Database(e.to_string()))
    }

    fn assign_sample_ids(&self, well_id: u64, samples: &mut [CurveSample]) {
        for sample in samples.iter_mut() {
            sample.id = self.next_sample_id.fetch_add(1, Ordering::Relaxed);
            sample.well_id = well_id;
        }
    }
}

impl StorageGateway for MemoryStore {
    fn upsert_well(&self, well: &WellRecord) -> Result<WellRecord, StorageError> {
        self.write()?.wells.insert(well.id, well.clone());
        Ok(well.clone())
    }

    fn well_exists(&self, well_id: u64) -> Result<bool, StorageError> {
        Ok(self.read()?.wells.contains_key(&well_id))
    }

    fn get_wells(&self) -> Result<Vec<WellRecord>, StorageError> {
        Ok(self.read()?.wells.values().cloned().collect())
    }

    fn get_well(&self, well_id: u64) -> Result<Option<WellRecord>, StorageError> {
        Ok(self.read()?.wells.get(&well_id).cloned())
    }

    fn store_well_file(
        &self,
        well: &WellRecord,
        mut samples: Vec<CurveSample>,
    ) -> Result<usize, StorageError> {
        self.assign_sample_ids(well.id, &mut samples);
        let count = samples.len();
        // One lock scope = one atomic unit of work.
        let mut inner = self.write()?;
        inner.wells.insert(well.id, well.clone());
        inner.curves.insert(well.id, samples);
        Ok(count)
    }

    fn replace_curves(
        &self,
        well_id: u64,
        mut samples: Vec<CurveSample>,
    ) -> Result<usize, StorageError> {
        self.assign_sample_ids(well_id, &mut samples);
        let count = samples.len();
        self.write()?.curves.insert(well_id, samples);
        Ok(count)
    }

    fn get_curves(&self, well_id: u64) -> Result<Vec<CurveSample>, StorageError> {
        Ok(self.read()?.curves.get(&well_id).cloned().unwrap_or_default())
    }

    fn replace_trajectory(
        &self,
        well_id: u64,
        points: Vec<TrajectoryPoint>,
    ) -> Result<usize, StorageError> {
        let count = points.len();
        self.write()?.trajectory.insert(well_id, points);
        Ok(count)
    }

    fn get_trajectory(&self, well_id: u64) -> Result<Vec<TrajectoryPoint>, StorageError> {
        Ok(self
            .read()?
            .trajectory
            .get(&well_id)
            .cloned()
            .unwrap_or_default())
    }

    fn append_thickness(
        &self,
        kind: ThicknessKind,
        records: Vec<ThicknessRecord>,
    ) -> Result<usize, StorageError> {
        let count = records.len();
        let mut inner = self.write()?;
        for record in records {
            inner
                .thickness
                .entry((kind, record.well_id))
                .or_default()
                .push(record);
        }
        Ok(count)
    }

    fn get_thickness(
        &self,
        kind: ThicknessKind,
        well_id: u64,
    ) -> Result<Vec<ThicknessRecord>, StorageError> {
        Ok(self
            .read()?
            .thickness
            .get(&(kind, well_id))
            .cloned()
            .unwrap_or_default())
    }

    fn replace_interpolated(
        &self,
        well_id: u64,
        points: Vec<InterpolatedPoint>,
    ) -> Result<usize, StorageError> {
        let count = points.len();
        self.write()?.interpolated.insert(well_id, points);
        Ok(count)
    }

    fn get_interpolated(&self, well_id: u64) -> Result<Vec<InterpolatedPoint>, StorageError> {
        Ok(self
            .read()?
            .interpolated
            .get(&well_id)
            .cloned()
            .unwrap_or_default())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
