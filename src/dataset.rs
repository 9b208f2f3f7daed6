//! Classifier datasets built from a filed archive, and offline evaluation.
//!
//! Each archived transcript sits under a `YYYY/MM/DD` directory naming the
//! date it was filed with; that date is the ground truth its candidates are
//! labeled against.

use std::path::{Path, PathBuf};

use archive_types::{DatasetRecord, Label};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::classifier::{Features, classify};
use crate::error::{Error, Result};
use crate::resolver::DateResolver;
use crate::summary::{CandidateSet, SummaryMode, summarize};

/// Which slot the filed date falls on, checked from `max` down.
pub fn ground_truth(actual: NaiveDate, candidates: &CandidateSet) -> Label {
    let CandidateSet::Anchored { min, mid, max } = candidates else {
        return Label::None;
    };
    if actual == max.date {
        Label::Max
    } else if actual == mid.date {
        Label::Mid
    } else if actual == min.date {
        Label::Min
    } else {
        Label::None
    }
}

/// Build one dataset row from a transcript and the path it is filed under.
///
/// Returns `None` when the path carries no date to label against.
pub fn create_record(
    resolver: &DateResolver,
    path: &str,
    text: &str,
    mode: SummaryMode,
) -> Option<DatasetRecord> {
    let Some(actual) = resolver.parser().parse(path) else {
        tracing::warn!(path, "no date found in archive path, skipping");
        return None;
    };
    let evidence = resolver.parser().collect_evidence(text);
    let candidates = summarize(&evidence, Some(actual));
    let label = ground_truth(actual, &candidates);
    Some(candidates.record(path, label, mode))
}

/// Build rows for every transcript in `files`, in the given order.
pub fn create_dataset(
    resolver: &DateResolver,
    files: &[PathBuf],
    mode: SummaryMode,
) -> Result<Vec<DatasetRecord>> {
    let records: Vec<Option<DatasetRecord>> = files
        .par_iter()
        .map(|path| {
            let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
            let text = String::from_utf8_lossy(&bytes);
            Ok(create_record(
                resolver,
                &path.to_string_lossy(),
                &text,
                mode,
            ))
        })
        .collect::<Result<_>>()?;

    let records: Vec<DatasetRecord> = records.into_iter().flatten().collect();
    tracing::info!(records = records.len(), files = files.len(), "created dataset");
    Ok(records)
}

/// Load a dataset previously written as JSON.
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRecord>> {
    let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&json).map_err(|source| Error::Dataset {
        path: path.to_path_buf(),
        source,
    })
}

/// Offset-mode feature vector stored in a record.
pub fn record_features(record: &DatasetRecord) -> Result<Features> {
    let offset = |a: archive_types::Anchor| {
        a.offset()
            .map(|n| n as f64)
            .ok_or_else(|| Error::DateModeRecord(record.path.clone()))
    };
    Ok(Features {
        min_offset: offset(record.min)?,
        min_freq: record.min_freq as f64,
        mid_offset: offset(record.mid)?,
        mid_freq: record.mid_freq as f64,
        max_offset: offset(record.max)?,
        max_freq: record.max_freq as f64,
    })
}

/// A record the classifier labels differently from its ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub path: String,
    pub expected: Label,
    pub actual: Label,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub total: usize,
    pub correct: usize,
    pub mismatches: Vec<Mismatch>,
}

impl Evaluation {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Run the classifier over offset-mode records and compare with their labels.
pub fn evaluate(records: &[DatasetRecord]) -> Result<Evaluation> {
    let mut eval = Evaluation::default();
    for record in records {
        let actual = classify(&record_features(record)?);
        eval.total += 1;
        if actual == record.label {
            eval.correct += 1;
        } else {
            eval.mismatches.push(Mismatch {
                path: record.path.clone(),
                expected: record.label,
                actual,
            });
        }
    }
    Ok(eval)
}
