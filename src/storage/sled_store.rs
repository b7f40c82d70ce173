//! Sled-backed storage gateway
//!
//! Layout: one named tree per record family, keyed by the well id as
//! big-endian u64 bytes (sorts numerically), values JSON-encoded. Each
//! per-well record set (curves, trajectory, thickness, interpolated) is
//! stored as a single value under its well key, so replace-then-insert is
//! one atomic overwrite and readers never see a half-replaced set. The
//! well-file unit of work (upsert well + replace curves) runs in a
//! multi-tree sled transaction.

use super::{StorageError, StorageGateway};
use crate::types::{
    CurveSample, InterpolatedPoint, ThicknessKind, ThicknessRecord, TrajectoryPoint, WellRecord,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::transaction::TransactionError;
use sled::Transactional;
use std::path::Path;
use std::sync::Arc;

/// Durable storage gateway on top of sled.
#[derive(Clone)]
pub struct SledStore {
    db: Arc<sled::Db>,
    wells: sled::Tree,
    curves: sled::Tree,
    trajectory: sled::Tree,
    thickness_formation: sled::Tree,
    thickness_effective: sled::Tree,
    interpolated: sled::Tree,
}

impl SledStore {
    /// Open or create the database at the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;

        let store = Self {
            wells: db.open_tree("wells")?,
            curves: db.open_tree("curves")?,
            trajectory: db.open_tree("trajectory")?,
            thickness_formation: db.open_tree("thickness_formation")?,
            thickness_effective: db.open_tree("thickness_effective")?,
            interpolated: db.open_tree("interpolated")?,
            db: Arc::new(db),
        };

        tracing::info!(path = %path_ref.display(), "storage opened");
        Ok(store)
    }

    /// Flush all dirty buffers to disk.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    fn thickness_tree(&self, kind: ThicknessKind) -> &sled::Tree {
        match kind {
            ThicknessKind::Formation => &self.thickness_formation,
            ThicknessKind::Effective => &self.thickness_effective,
        }
    }

    /// Give every sample a fresh backend-assigned id and pin its well id.
    fn assign_sample_ids(
        &self,
        well_id: u64,
        samples: &mut [CurveSample],
    ) -> Result<(), StorageError> {
        for sample in samples.iter_mut() {
            sample.id = self.db.generate_id()?;
            sample.well_id = well_id;
        }
        Ok(())
    }
}

fn read_set<T: DeserializeOwned>(tree: &sled::Tree, well_id: u64) -> Result<Vec<T>, StorageError> {
    match tree.get(well_id.to_be_bytes())? {
        Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        None => Ok(Vec::new()),
    }
}

fn write_set<T: Serialize>(
    tree: &sled::Tree,
    well_id: u64,
    rows: &[T],
) -> Result<(), StorageError> {
    tree.insert(well_id.to_be_bytes(), serde_json::to_vec(rows)?)?;
    Ok(())
}

impl StorageGateway for SledStore {
    fn upsert_well(&self, well: &WellRecord) -> Result<WellRecord, StorageError> {
        self.wells
            .insert(well.id.to_be_bytes(), serde_json::to_vec(well)?)?;
        Ok(well.clone())
    }

    fn well_exists(&self, well_id: u64) -> Result<bool, StorageError> {
        Ok(self.wells.contains_key(well_id.to_be_bytes())?)
    }

    fn get_wells(&self) -> Result<Vec<WellRecord>, StorageError> {
        let mut wells = Vec::new();
        // Big-endian keys iterate in id order.
        for item in self.wells.iter() {
            let (_key, value) = item?;
            wells.push(serde_json::from_slice(&value)?);
        }
        Ok(wells)
    }

    fn get_well(&self, well_id: u64) -> Result<Option<WellRecord>, StorageError> {
        match self.wells.get(well_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn store_well_file(
        &self,
        well: &WellRecord,
        mut samples: Vec<CurveSample>,
    ) -> Result<usize, StorageError> {
        self.assign_sample_ids(well.id, &mut samples)?;
        let key = well.id.to_be_bytes();
        let well_bytes = serde_json::to_vec(well)?;
        let curve_bytes = serde_json::to_vec(&samples)?;

        let result: Result<(), TransactionError<()>> = (&self.wells, &self.curves)
            .transaction(|(wells, curves)| {
                wells.insert(&key, well_bytes.as_slice())?;
                curves.insert(&key, curve_bytes.as_slice())?;
                Ok(())
            });
        result.map_err(|err| match err {
            TransactionError::Abort(()) => {
                StorageError::Database("well-file transaction aborted".to_string())
            }
            TransactionError::Storage(err) => err.into(),
        })?;

        Ok(samples.len())
    }

    fn replace_curves(
        &self,
        well_id: u64,
        mut samples: Vec<CurveSample>,
    ) -> Result<usize, StorageError> {
        self.assign_sample_ids(well_id, &mut samples)?;
        write_set(&self.curves, well_id, &samples)?;
        Ok(samples.len())
    }

    fn get_curves(&self, well_id: u64) -> Result<Vec<CurveSample>, StorageError> {
        read_set(&self.curves, well_id)
    }

    fn replace_trajectory(
        &self,
        well_id: u64,
        points: Vec<TrajectoryPoint>,
    ) -> Result<usize, StorageError> {
        write_set(&self.trajectory, well_id, &points)?;
        Ok(points.len())
    }

    fn get_trajectory(&self, well_id: u64) -> Result<Vec<TrajectoryPoint>, StorageError> {
        read_set(&self.trajectory, well_id)
    }

    fn append_thickness(
        &self,
        kind: ThicknessKind,
        records: Vec<ThicknessRecord>,
    ) -> Result<usize, StorageError> {
        let tree = self.thickness_tree(kind);
        let count = records.len();

        // Rows may span several wells; extend each well's stored set in turn.
        let mut remaining = records;
        while !remaining.is_empty() {
            let well_id = remaining[0].well_id;
            let (batch, rest): (Vec<_>, Vec<_>) =
                remaining.into_iter().partition(|r| r.well_id == well_id);
            let mut stored: Vec<ThicknessRecord> = read_set(tree, well_id)?;
            stored.extend(batch);
            write_set(tree, well_id, &stored)?;
            remaining = rest;
        }

        Ok(count)
    }

    fn get_thickness(
        &self,
        kind: ThicknessKind,
        well_id: u64,
    ) -> Result<Vec<ThicknessRecord>, StorageError> {
        read_set(self.thickness_tree(kind), well_id)
    }

    fn replace_interpolated(
        &self,
        well_id: u64,
        points: Vec<InterpolatedPoint>,
    ) -> Result<usize, StorageError> {
        write_set(&self.interpolated, well_id, &points)?;
        Ok(points.len())
    }

    fn get_interpolated(&self, well_id: u64) -> Result<Vec<InterpolatedPoint>, StorageError> {
        read_set(&self.interpolated, well_id)
    }

    fn backend_name(&self) -> &'static str {
        "sled"
    }
}
