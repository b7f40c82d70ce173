//! Tabular thickness parser, shared by the formation and
//! effective-formation variants.
//!
//! Columns: lat, lon, absolute depth, well name token, thickness. Rows
//! whose first token is a declared-type marker (`String` / `Float` header
//! rows) are skipped, as are rows with fewer than five columns, bad
//! coordinate values, or a well token without trailing digits. An
//! unparsable thickness column stores null but keeps the row.
//!
//! Unlike curves and trajectories, thickness ingestion is append-only:
//! re-sending a file adds rows without deleting prior ones.

use crate::ingest::lines::data_lines;
use crate::ingest::well_id::derive_well_id;
use crate::ingest::IngestError;
use crate::storage::{ensure_well, StorageGateway};
use crate::types::{ThicknessKind, ThicknessRecord, ThicknessSummary};
use std::collections::BTreeSet;

/// Declared-type markers opening a column-description row.
const TYPE_MARKERS: [&str; 2] = ["string", "float"];

/// One parsed row with the raw well token kept for lazy well creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ThicknessRow {
    pub well_token: String,
    pub record: ThicknessRecord,
}

/// Pure parse result of one thickness table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedThickness {
    pub rows: Vec<ThicknessRow>,
    pub lines_skipped: usize,
}

/// Parse a thickness table into rows, independent of kind.
pub fn parse_thickness(text: &str) -> ParsedThickness {
    let mut parsed = ParsedThickness::default();

    for line in data_lines(text) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            continue;
        };
        if TYPE_MARKERS.iter().any(|m| first.eq_ignore_ascii_case(m)) {
            continue;
        }
        if parts.len() < 5 {
            parsed.lines_skipped += 1;
            continue;
        }
        let (Ok(lat), Ok(lon), Ok(absolute_depth)) = (
            parts[0].parse::<f64>(),
            parts[1].parse::<f64>(),
            parts[2].parse::<f64>(),
        ) else {
            parsed.lines_skipped += 1;
            continue;
        };
        let well_token = parts[3];
        let Some(well_id) = derive_well_id(well_token) else {
            parsed.lines_skipped += 1;
            continue;
        };
        // Null thickness keeps the row.
        let thickness = parts[4].parse::<f64>().ok();

        parsed.rows.push(ThicknessRow {
            well_token: well_token.to_string(),
            record: ThicknessRecord {
                well_id,
                lat,
                lon,
                absolute_depth,
                thickness,
            },
        });
    }

    parsed
}

/// Parse a thickness table and append its rows to storage, creating stub
/// wells for unknown identifiers.
pub fn ingest_thickness(
    store: &dyn StorageGateway,
    kind: ThicknessKind,
    text: &str,
) -> Result<ThicknessSummary, IngestError> {
    let parsed = parse_thickness(text);

    let mut wells_seen: BTreeSet<u64> = BTreeSet::new();
    for row in &parsed.rows {
        if wells_seen.insert(row.record.well_id) {
            ensure_well(store, row.record.well_id, &row.well_token)?;
        }
    }

    let records: Vec<ThicknessRecord> = parsed.rows.into_iter().map(|row| row.record).collect();
    let rows_saved = store.append_thickness(kind, records)?;

    tracing::info!(
        kind = %kind,
        rows = rows_saved,
        wells = wells_seen.len(),
        skipped = parsed.lines_skipped,
        "thickness table ingested"
    );

    Ok(ThicknessSummary {
        kind,
        rows_saved,
        wells_touched: wells_seen.len(),
        lines_skipped: parsed.lines_skipped,
    })
}
