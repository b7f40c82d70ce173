//! Geotrack: well-log ingestion and trajectory interpolation.
//!
//! The crate turns line-oriented well-log text formats into structured
//! records and derives geospatial coordinates for depth-indexed log
//! samples by interpolating along each well's 3-D trajectory.
//!
//! ## Architecture
//!
//! - **Ingestion** ([`ingest`]): tolerant parsers for LAS-like well files,
//!   welltrack trajectory files, and tabular thickness formats. Parsing is
//!   pure; the `ingest_*` functions persist through the gateway.
//! - **Interpolation Engine** ([`interpolation`]): per-well bracket search
//!   over the sorted trajectory plus linear interpolation of latitude,
//!   longitude, and absolute depth.
//! - **Storage Gateway** ([`storage`]): pluggable persistence behind one
//!   trait, with a durable sled backend and an in-memory backend.

pub mod config;
pub mod ingest;
pub mod interpolation;
pub mod storage;
pub mod types;

// Re-export the configuration
pub use config::Config;

// Re-export ingestion entry points
pub use ingest::{
    derive_well_id, ingest_thickness, ingest_well_file, ingest_well_file_batch, ingest_welltrack,
    IngestError, ValidationError,
};

// Re-export the interpolation engine
pub use interpolation::{
    curves_with_coords, interpolate_all, interpolate_well, InterpolationError,
};

// Re-export storage
pub use storage::{ensure_well, MemoryStore, SledStore, StorageError, StorageGateway};

// Re-export commonly used record types
pub use types::{
    CurveSample, CurveWithCoords, InterpolatedPoint, InterpolationFailure, InterpolationSummary,
    SampleType, ThicknessKind, ThicknessRecord, ThicknessSummary, TrajectoryPoint,
    WellFileSummary, WellRecord, WelltrackSummary,
};
