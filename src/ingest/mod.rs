//! File-format ingestion
//!
//! Line-oriented parsers for the three well-log text formats, plus the
//! ingest functions that hand their output to the storage gateway:
//!
//! - [`well_file`]: LAS-like well files (header block + depth-indexed
//!   curve samples) under a block-mode state machine
//! - [`welltrack`]: trajectory files, one block of survey points per well
//! - [`thickness`]: tabular formation / effective-formation thickness
//!
//! Parsing is pure and in-memory; only the `ingest_*` functions touch
//! storage. Malformed data lines are dropped and counted, never fatal —
//! the only hard parse failure is a well file whose header yields no
//! resolvable well identity.

pub mod lines;
pub mod thickness;
pub mod well_file;
pub mod well_id;
pub mod welltrack;

pub use thickness::ingest_thickness;
pub use well_file::{ingest_well_file, ingest_well_file_batch, ValidationError};
pub use well_id::derive_well_id;
pub use welltrack::ingest_welltrack;

use crate::storage::StorageError;

/// Errors that abort the ingestion of a whole file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
