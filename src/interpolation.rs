//! Trajectory interpolation engine.
//!
//! For every curve sample of a well, the engine locates the two trajectory
//! points bracketing the sample's measured depth — nearest at-or-below and
//! nearest at-or-above — and linearly interpolates latitude, longitude,
//! and absolute depth between them. Trajectory points are sorted once per
//! well and the brackets found by binary search.
//!
//! Rules:
//! - A sample without both brackets (above the shallowest or below the
//!   deepest survey point) yields no interpolated point; this is
//!   per-sample, never fatal to the well.
//! - A degenerate interval (both brackets at the same measured depth,
//!   including the exact-hit case) returns the lower bracket's coordinates
//!   unchanged, with no division.
//! - Each run replaces the well's previous interpolation output.

use crate::storage::{StorageError, StorageGateway};
use crate::types::{
    CurveSample, CurveWithCoords, InterpolatedPoint, InterpolationFailure, InterpolationSummary,
    TrajectoryPoint,
};
use std::collections::HashMap;

/// A well cannot be interpolated. Missing inputs are recorded per well in
/// batch mode; storage failures abort only the affected well.
#[derive(Debug, thiserror::Error)]
pub enum InterpolationError {
    #[error("well {well_id} has no curve samples")]
    MissingCurves { well_id: u64 },
    #[error("well {well_id} has no trajectory points")]
    MissingTrajectory { well_id: u64 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Interpolate one well's curve samples along its trajectory and replace
/// its stored interpolation output. Returns the number of points written.
pub fn interpolate_well(
    store: &dyn StorageGateway,
    well_id: u64,
) -> Result<usize, InterpolationError> {
    let mut samples = store.get_curves(well_id)?;
    if samples.is_empty() {
        return Err(InterpolationError::MissingCurves { well_id });
    }
    let mut track = store.get_trajectory(well_id)?;
    if track.is_empty() {
        return Err(InterpolationError::MissingTrajectory { well_id });
    }

    track.sort_by(|a, b| a.measured_depth.total_cmp(&b.measured_depth));
    samples.sort_by(|a, b| a.measured_depth.total_cmp(&b.measured_depth));

    let points: Vec<InterpolatedPoint> = samples
        .iter()
        .filter_map(|sample| {
            bracket(&track, sample.measured_depth)
                .map(|(p1, p2)| interpolate_sample(sample, p1, p2))
        })
        .collect();

    let saved = store.replace_interpolated(well_id, points)?;
    tracing::info!(
        well_id,
        samples = samples.len(),
        points = saved,
        "well interpolated"
    );
    Ok(saved)
}

/// Interpolate every known well. Per-well failures are collected in the
/// summary and do not abort the remaining wells.
pub fn interpolate_all(store: &dyn StorageGateway) -> Result<InterpolationSummary, StorageError> {
    let wells = store.get_wells()?;
    let mut summary = InterpolationSummary::default();

    for well in &wells {
        match interpolate_well(store, well.id) {
            Ok(saved) => {
                summary.wells_processed += 1;
                summary.points_saved += saved;
            }
            Err(err) => {
                tracing::warn!(well_id = well.id, error = %err, "interpolation failed for well");
                summary.failures.push(InterpolationFailure {
                    well_id: well.id,
                    reason: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        wells = summary.wells_processed,
        points = summary.points_saved,
        failed = summary.failures.len(),
        "interpolation run finished"
    );
    Ok(summary)
}

/// Join a well's curve samples with their interpolated coordinates.
/// Samples without an interpolated point (bracket failures) are omitted.
pub fn curves_with_coords(
    store: &dyn StorageGateway,
    well_id: u64,
) -> Result<Vec<CurveWithCoords>, StorageError> {
    let samples = store.get_curves(well_id)?;
    let interpolated = store.get_interpolated(well_id)?;
    let by_sample: HashMap<u64, &InterpolatedPoint> = interpolated
        .iter()
        .map(|point| (point.curve_sample_id, point))
        .collect();

    Ok(samples
        .iter()
        .filter_map(|sample| {
            by_sample.get(&sample.id).map(|point| CurveWithCoords {
                curve_sample_id: sample.id,
                well_id: sample.well_id,
                sample_type: sample.sample_type,
                measured_depth: sample.measured_depth,
                lat: point.lat,
                lon: point.lon,
                absolute_depth: point.absolute_depth,
            })
        })
        .collect())
}

/// Locate the bracketing pair for a depth in a track sorted by measured
/// depth: the point with the greatest measured depth at-or-below, and the
/// point with the smallest measured depth at-or-above.
fn bracket(track: &[TrajectoryPoint], depth: f64) -> Option<(&TrajectoryPoint, &TrajectoryPoint)> {
    let below = track.partition_point(|p| p.measured_depth <= depth);
    let above = track.partition_point(|p| p.measured_depth < depth);
    let p1 = track.get(below.checked_sub(1)?)?;
    let p2 = track.get(above)?;
    Some((p1, p2))
}

fn interpolate_sample(
    sample: &CurveSample,
    p1: &TrajectoryPoint,
    p2: &TrajectoryPoint,
) -> InterpolatedPoint {
    // Degenerate interval: both brackets at the same station.
    if p1.measured_depth == p2.measured_depth {
        return InterpolatedPoint {
            curve_sample_id: sample.id,
            lat: p1.lat,
            lon: p1.lon,
            absolute_depth: p1.absolute_depth,
        };
    }

    let t = (sample.measured_depth - p1.measured_depth) / (p2.measured_depth - p1.measured_depth);
    InterpolatedPoint {
        curve_sample_id: sample.id,
        lat: lerp(p1.lat, p2.lat, t),
        lon: lerp(p1.lon, p2.lon, t),
        absolute_depth: lerp(p1.absolute_depth, p2.absolute_depth, t),
    }
}

fn lerp(v1: f64, v2: f64, t: f64) -> f64 {
    v1 + (v2 - v1) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::{SampleType, WellRecord};

    fn make_point(well_id: u64, md: f64, lat: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            well_id,
            lat,
            lon: lat * 2.0,
            absolute_depth: md - 5.0,
            measured_depth: md,
        }
    }

    fn make_sample(depth: f64) -> CurveSample {
        CurveSample {
            id: 0,
            well_id: 0,
            measured_depth: depth,
            sample_type: SampleType::Unspecified,
        }
    }

    /// Store with one well, its trajectory, and curve samples at the given
    /// depths.
    fn seed_well(store: &MemoryStore, well_id: u64, track: Vec<TrajectoryPoint>, depths: &[f64]) {
        store
            .upsert_well(&WellRecord::stub(well_id, &format!("WELL_{well_id}")))
            .unwrap();
        store.replace_trajectory(well_id, track).unwrap();
        store
            .replace_curves(well_id, depths.iter().map(|d| make_sample(*d)).collect())
            .unwrap();
    }

    #[test]
    fn test_midpoint_interpolation() {
        let store = MemoryStore::new();
        seed_well(
            &store,
            1,
            vec![make_point(1, 100.0, 10.0), make_point(1, 200.0, 20.0)],
            &[150.0],
        );

        let saved = interpolate_well(&store, 1).unwrap();
        assert_eq!(saved, 1);

        let points = store.get_interpolated(1).unwrap();
        assert_eq!(points[0].lat, 15.0);
        assert_eq!(points[0].lon, 30.0);
        assert_eq!(points[0].absolute_depth, 145.0);
    }

    #[test]
    fn test_exact_station_hit_returns_station() {
        let store = MemoryStore::new();
        seed_well(
            &store,
            1,
            vec![make_point(1, 100.0, 10.0), make_point(1, 200.0, 20.0)],
            &[100.0],
        );

        interpolate_well(&store, 1).unwrap();
        let points = store.get_interpolated(1).unwrap();
        assert_eq!(points[0].lat, 10.0);
        assert_eq!(points[0].absolute_depth, 95.0);
    }

    #[test]
    fn test_degenerate_interval_uses_lower_bracket() {
        // A single station at 150: both brackets resolve to it.
        let store = MemoryStore::new();
        seed_well(&store, 1, vec![make_point(1, 150.0, 12.0)], &[150.0]);

        interpolate_well(&store, 1).unwrap();
        let points = store.get_interpolated(1).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].lat, 12.0);
    }

    #[test]
    fn test_unbracketed_samples_yield_no_points() {
        let store = MemoryStore::new();
        seed_well(
            &store,
            1,
            vec![make_point(1, 100.0, 10.0), make_point(1, 200.0, 20.0)],
            &[50.0, 150.0, 250.0],
        );

        let saved = interpolate_well(&store, 1).unwrap();
        // 50 has no lower bracket, 250 no upper; only 150 interpolates.
        assert_eq!(saved, 1);
        assert_eq!(store.get_interpolated(1).unwrap()[0].lat, 15.0);
    }

    #[test]
    fn test_unsorted_trajectory_is_sorted_before_bracketing() {
        let store = MemoryStore::new();
        seed_well(
            &store,
            1,
            vec![
                make_point(1, 200.0, 20.0),
                make_point(1, 100.0, 10.0),
                make_point(1, 300.0, 30.0),
            ],
            &[250.0],
        );

        interpolate_well(&store, 1).unwrap();
        assert_eq!(store.get_interpolated(1).unwrap()[0].lat, 25.0);
    }

    #[test]
    fn test_missing_inputs_are_typed_errors() {
        let store = MemoryStore::new();
        store.upsert_well(&WellRecord::stub(1, "WELL_1")).unwrap();

        assert!(matches!(
            interpolate_well(&store, 1),
            Err(InterpolationError::MissingCurves { well_id: 1 })
        ));

        store.replace_curves(1, vec![make_sample(10.0)]).unwrap();
        assert!(matches!(
            interpolate_well(&store, 1),
            Err(InterpolationError::MissingTrajectory { well_id: 1 })
        ));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let store = MemoryStore::new();
        // Well 1 has curves but no trajectory; well 2 has both.
        store.upsert_well(&WellRecord::stub(1, "WELL_1")).unwrap();
        store.replace_curves(1, vec![make_sample(10.0)]).unwrap();
        seed_well(
            &store,
            2,
            vec![make_point(2, 100.0, 10.0), make_point(2, 200.0, 20.0)],
            &[150.0],
        );

        let summary = interpolate_all(&store).unwrap();
        assert_eq!(summary.wells_processed, 1);
        assert_eq!(summary.points_saved, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].well_id, 1);
        assert!(summary.failures[0].reason.contains("trajectory"));
    }

    #[test]
    fn test_rerun_does_not_accumulate_points() {
        let store = MemoryStore::new();
        seed_well(
            &store,
            1,
            vec![make_point(1, 100.0, 10.0), make_point(1, 200.0, 20.0)],
            &[150.0, 160.0],
        );

        interpolate_well(&store, 1).unwrap();
        interpolate_well(&store, 1).unwrap();
        assert_eq!(store.get_interpolated(1).unwrap().len(), 2);
    }

    #[test]
    fn test_curves_with_coords_joins_on_sample_id() {
        let store = MemoryStore::new();
        seed_well(
            &store,
            1,
            vec![make_point(1, 100.0, 10.0), make_point(1, 200.0, 20.0)],
            &[50.0, 150.0],
        );

        interpolate_well(&store, 1).unwrap();
        let joined = curves_with_coords(&store, 1).unwrap();
        // The unbracketed sample at 50 is omitted.
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].measured_depth, 150.0);
        assert_eq!(joined[0].lat, 15.0);
        assert_eq!(joined[0].well_id, 1);
    }
}
