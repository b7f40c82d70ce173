//! Welltrack trajectory file parser.
//!
//! A welltrack file holds one block of survey points per well:
//!
//! ```text
//! welltrack  'WELL_7'
//!   56.01 41.02 0.0 0.0
//!   56.02 41.03 120.0 121.5
//!   56.03 41.04 240.0 250.0 ;
//! welltrack  'WELL_8'
//!   ...
//! ```
//!
//! The header carries the well name token (quotes optional); the well id
//! comes from its trailing digits. A header token with no digits drops the
//! whole block silently. Data rows are lat, lon, absolute depth, measured
//! depth; a single trailing `;` terminator is tolerated; rows with fewer
//! than four columns or non-numeric values are skipped.

use crate::ingest::lines::data_lines;
use crate::ingest::well_id::derive_well_id;
use crate::ingest::IngestError;
use crate::storage::{ensure_well, StorageGateway};
use crate::types::{TrajectoryPoint, WelltrackSummary};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// One well's block: the header name token and its survey points in file
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackBlock {
    pub well_name: String,
    pub points: Vec<TrajectoryPoint>,
}

/// Pure parse result of one welltrack file, keyed by well id. Repeated
/// headers for the same well merge into one block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedWelltrack {
    pub blocks: BTreeMap<u64, TrackBlock>,
    pub lines_skipped: usize,
}

fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^welltrack\s+'?([A-Za-z0-9_]+)'?").expect("static regex")
    })
}

/// Parse a welltrack file into per-well point sets.
pub fn parse_welltrack(text: &str) -> ParsedWelltrack {
    let mut parsed = ParsedWelltrack::default();
    let mut current_well: Option<u64> = None;

    for line in data_lines(text) {
        if let Some(caps) = header_re().captures(line) {
            let token = &caps[1];
            match derive_well_id(token) {
                Some(well_id) => {
                    let block = parsed.blocks.entry(well_id).or_default();
                    if block.well_name.is_empty() {
                        block.well_name = token.to_string();
                    }
                    current_well = Some(well_id);
                }
                None => {
                    tracing::warn!(token, "welltrack header has no trailing digits, block dropped");
                    current_well = None;
                }
            }
            continue;
        }

        // Rows before the first resolvable header belong to no well.
        let Some(well_id) = current_well else {
            continue;
        };

        let line = line.strip_suffix(';').map_or(line, str::trim_end);
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            parsed.lines_skipped += 1;
            continue;
        }
        let (Ok(lat), Ok(lon), Ok(absolute_depth), Ok(measured_depth)) = (
            parts[0].parse::<f64>(),
            parts[1].parse::<f64>(),
            parts[2].parse::<f64>(),
            parts[3].parse::<f64>(),
        ) else {
            parsed.lines_skipped += 1;
            continue;
        };

        if let Some(block) = parsed.blocks.get_mut(&well_id) {
            block.points.push(TrajectoryPoint {
                well_id,
                lat,
                lon,
                absolute_depth,
                measured_depth,
            });
        }
    }

    parsed
}

/// Parse a welltrack file and persist it: per well, create a stub record
/// if the well is unknown, then replace its full trajectory point set so
/// the new file supersedes prior data.
pub fn ingest_welltrack(
    store: &dyn StorageGateway,
    text: &str,
) -> Result<WelltrackSummary, IngestError> {
    let parsed = parse_welltrack(text);
    let wells_processed = parsed.blocks.len();
    let mut rows_saved = 0usize;

    for (well_id, block) in parsed.blocks {
        ensure_well(store, well_id, &block.well_name)?;
        rows_saved += store.replace_trajectory(well_id, block.points)?;
    }

    tracing::info!(
        wells = wells_processed,
        rows = rows_saved,
        skipped = parsed.lines_skipped,
        "welltrack ingested"
    );

    Ok(WelltrackSummary {
        wells_processed,
        rows_saved,
        lines_skipped: parsed.lines_skipped,
    })
}
