//! LAS-like well file parser.
//!
//! A well file is line-oriented with `~`-prefixed headers switching the
//! parse mode: `~Well` carries the well identity and measured-depth range,
//! `~Ascii` carries the depth-indexed curve samples, `~Curve` is reserved
//! for column metadata and currently yields nothing. Any other `~` header
//! (e.g. `~Version`) leaves data mode entirely, and `#` lines are comments
//! in every mode.
//!
//! Malformed data lines are skipped and counted; the only fatal condition
//! is a header block that never yields both a well id and a well name.

use crate::ingest::lines::data_lines;
use crate::ingest::well_id::derive_well_id;
use crate::ingest::IngestError;
use crate::storage::StorageGateway;
use crate::types::{CurveSample, SampleType, WellFileSummary, WellRecord};
use regex::Regex;
use std::sync::OnceLock;

/// Header block never yielded a resolvable well identity. Fatal to this
/// file's parse; other files in a batch are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("well header block has no WELL name token")]
    MissingWellName,
    #[error("well name '{name}' has no trailing digits to derive a well id from")]
    MissingWellId { name: String },
}

/// Block mode of the well-file state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Well,
    Curve,
    Ascii,
}

impl Block {
    /// Mode switch for a `~` header line (the `~` already stripped).
    fn from_header(header: &str) -> Self {
        if has_prefix(header, "well") {
            Self::Well
        } else if has_prefix(header, "curve") {
            Self::Curve
        } else if has_prefix(header, "ascii") {
            Self::Ascii
        } else {
            Self::None
        }
    }
}

/// Pure parse result of one well file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWellFile {
    pub well: WellRecord,
    pub samples: Vec<CurveSample>,
    pub lines_skipped: usize,
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("static regex"))
}

fn name_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Za-z0-9_]+").expect("static regex"))
}

fn has_prefix(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// The rest of the line after a known header key, or `None` if the line
/// does not start with that key. The key must end there: `WELLBORE` is
/// not a `WELL` line.
fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = has_prefix(line, key).then(|| &line[key.len()..])?;
    match rest.chars().next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

/// First signed-decimal value after the key, skipping unit mnemonics.
fn first_number(rest: &str) -> Option<f64> {
    number_re().find(rest)?.as_str().parse().ok()
}

/// First alphanumeric/underscore token after the key.
fn first_name_token(rest: &str) -> Option<&str> {
    name_token_re().find(rest).map(|m| m.as_str())
}

/// Parse a well file into one well record and its curve samples.
pub fn parse_well_file(text: &str) -> Result<ParsedWellFile, ValidationError> {
    let mut block = Block::None;
    let mut name: Option<String> = None;
    let mut well_id: Option<u64> = None;
    let mut start_md: Option<f64> = None;
    let mut end_md: Option<f64> = None;
    let mut samples: Vec<CurveSample> = Vec::new();
    let mut lines_skipped = 0usize;

    for line in data_lines(text) {
        if let Some(header) = line.strip_prefix('~') {
            block = Block::from_header(header);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        match block {
            Block::Well => {
                if let Some(rest) = strip_key(line, "STRT") {
                    if let Some(value) = first_number(rest) {
                        start_md = Some(value);
                    }
                } else if let Some(rest) = strip_key(line, "STOP") {
                    if let Some(value) = first_number(rest) {
                        end_md = Some(value);
                    }
                } else if let Some(rest) = strip_key(line, "WELL") {
                    if let Some(token) = first_name_token(rest) {
                        name = Some(token.to_string());
                        well_id = derive_well_id(token);
                    }
                }
            }
            Block::Ascii => {
                let mut parts = line.split_whitespace();
                let (Some(depth_token), Some(type_token)) = (parts.next(), parts.next()) else {
                    lines_skipped += 1;
                    continue;
                };
                let Ok(measured_depth) = depth_token.parse::<f64>() else {
                    lines_skipped += 1;
                    continue;
                };
                samples.push(CurveSample {
                    id: 0,
                    well_id: 0,
                    measured_depth,
                    sample_type: SampleType::from_token(type_token),
                });
            }
            // ~Curve column metadata is not consumed yet; lines outside any
            // known block carry nothing.
            Block::Curve | Block::None => {}
        }
    }

    let name = name.ok_or(ValidationError::MissingWellName)?;
    let id = well_id.ok_or(ValidationError::MissingWellId { name: name.clone() })?;
    for sample in &mut samples {
        sample.well_id = id;
    }

    Ok(ParsedWellFile {
        well: WellRecord {
            id,
            name,
            start_measured_depth: start_md,
            end_measured_depth: end_md,
        },
        samples,
        lines_skipped,
    })
}

/// Parse a well file and persist it: upsert the well (overwriting name and
/// depth range on conflict) and replace its full curve sample set, as one
/// storage transaction.
pub fn ingest_well_file(
    store: &dyn StorageGateway,
    text: &str,
) -> Result<WellFileSummary, IngestError> {
    let parsed = parse_well_file(text)?;
    let well_id = parsed.well.id;
    let well_name = parsed.well.name.clone();
    let curves_saved = store.store_well_file(&parsed.well, parsed.samples)?;

    tracing::info!(
        well_id,
        well = %well_name,
        curves = curves_saved,
        skipped = parsed.lines_skipped,
        "well file ingested"
    );

    Ok(WellFileSummary {
        well_id,
        well_name,
        curves_saved,
        lines_skipped: parsed.lines_skipped,
    })
}

/// Ingest several well files sequentially. A failure in one file lands in
/// that file's result slot and does not abort the remaining files.
pub fn ingest_well_file_batch(
    store: &dyn StorageGateway,
    texts: &[&str],
) -> Vec<Result<WellFileSummary, IngestError>> {
    texts
        .iter()
        .map(|text| {
            let result = ingest_well_file(store, text);
            if let Err(err) = &result {
                tracing::warn!(error = %err, "well file rejected");
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageGateway};

    const WELL_FILE: &str = "\
~Version
 VERS.   2.0 : CWLS log ASCII Standard
~Well
# depth range of the logged interval
 STRT.M  100.0 :
 STOP.M  200.0 :
 WELL.   NAME42 : WELL
~Curve
 DEPT.M  : measured depth
~Ascii
 150.0 1 extra-token
 160.0 2
 170.0 0
 abc 1
 180.0
";

    #[test]
    fn test_header_block_yields_well_record() {
        let parsed = parse_well_file(WELL_FILE).unwrap();
        assert_eq!(parsed.well.id, 42);
        assert_eq!(parsed.well.name, "NAME42");
        assert_eq!(parsed.well.start_measured_depth, Some(100.0));
        assert_eq!(parsed.well.end_measured_depth, Some(200.0));
    }

    #[test]
    fn test_header_keys_without_unit_mnemonic() {
        let text = "~Well\nSTRT 100.0\nSTOP 200.0\nWELL NAME42\n";
        let parsed = parse_well_file(text).unwrap();
        assert_eq!(parsed.well.id, 42);
        assert_eq!(parsed.well.name, "NAME42");
        assert_eq!(parsed.well.start_measured_depth, Some(100.0));
        assert_eq!(parsed.well.end_measured_depth, Some(200.0));
    }

    #[test]
    fn test_header_keys_are_case_insensitive() {
        let text = "~well\nstrt.m -50.5\nstop.m 10.0\nwell. well_7\n";
        let parsed = parse_well_file(text).unwrap();
        assert_eq!(parsed.well.id, 7);
        assert_eq!(parsed.well.name, "well_7");
        assert_eq!(parsed.well.start_measured_depth, Some(-50.5));
    }

    #[test]
    fn test_ascii_rows_and_type_normalization() {
        let parsed = parse_well_file(WELL_FILE).unwrap();
        // "abc 1" fails the depth column, "180.0" has one token.
        assert_eq!(parsed.lines_skipped, 2);

        let depths: Vec<f64> = parsed.samples.iter().map(|s| s.measured_depth).collect();
        assert_eq!(depths, vec![150.0, 160.0, 170.0]);

        let types: Vec<SampleType> = parsed.samples.iter().map(|s| s.sample_type).collect();
        assert_eq!(
            types,
            vec![SampleType::One, SampleType::Unspecified, SampleType::Zero]
        );
        assert!(parsed.samples.iter().all(|s| s.well_id == 42));
    }

    #[test]
    fn test_longer_mnemonics_do_not_match_header_keys() {
        // WELLBORE is its own mnemonic, not a WELL line.
        let text = "~Well\nWELLBORE. X12 :\nWELL NAME42\n~Ascii\n150.0 1\n";
        let parsed = parse_well_file(text).unwrap();
        assert_eq!(parsed.well.name, "NAME42");
        assert_eq!(parsed.well.id, 42);
    }

    #[test]
    fn test_unknown_tilde_header_leaves_data_mode() {
        // The ~Other header resets the mode, so the row after it is not a
        // curve sample.
        let text = "~Well\nWELL NAME1\n~Ascii\n100.0 1\n~Other\n200.0 1\n";
        let parsed = parse_well_file(text).unwrap();
        assert_eq!(parsed.samples.len(), 1);
        assert_eq!(parsed.samples[0].measured_depth, 100.0);
    }

    #[test]
    fn test_comment_lines_are_ignored_in_every_mode() {
        let text = "~Well\n# WELL COMMENT9\nWELL NAME1\n~Ascii\n# 999.0 1\n100.0 0\n";
        let parsed = parse_well_file(text).unwrap();
        assert_eq!(parsed.well.name, "NAME1");
        assert_eq!(parsed.samples.len(), 1);
        assert_eq!(parsed.lines_skipped, 0);
    }

    #[test]
    fn test_missing_well_name_is_fatal() {
        let text = "~Well\nSTRT 100.0\n~Ascii\n150.0 1\n";
        assert_eq!(
            parse_well_file(text).unwrap_err(),
            ValidationError::MissingWellName
        );
    }

    #[test]
    fn test_name_without_digits_is_fatal() {
        let text = "~Well\nWELL. WELL\n~Ascii\n150.0 1\n";
        assert_eq!(
            parse_well_file(text).unwrap_err(),
            ValidationError::MissingWellId {
                name: "WELL".to_string()
            }
        );
    }

    #[test]
    fn test_ingest_replaces_prior_curves_and_overwrites_well() {
        let store = MemoryStore::new();
        let summary = ingest_well_file(&store, WELL_FILE).unwrap();
        assert_eq!(summary.well_id, 42);
        assert_eq!(summary.curves_saved, 3);

        // Same well id, new name and range, fewer samples.
        let updated = "~Well\nSTRT 110.0\nSTOP 190.0\nWELL OTHER42\n~Ascii\n155.0 1\n";
        let summary = ingest_well_file(&store, updated).unwrap();
        assert_eq!(summary.curves_saved, 1);

        let well = store.get_well(42).unwrap().unwrap();
        assert_eq!(well.name, "OTHER42");
        assert_eq!(well.start_measured_depth, Some(110.0));
        assert_eq!(store.get_curves(42).unwrap().len(), 1);
    }

    #[test]
    fn test_batch_continues_past_invalid_file() {
        let store = MemoryStore::new();
        let bad = "~Well\nWELL. WELL\n";
        let good = "~Well\nWELL NAME7\n~Ascii\n10.0 1\n";

        let results = ingest_well_file_batch(&store, &[bad, good]);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().well_id, 7);
        assert!(store.well_exists(7).unwrap());
    }
}
