use archive_types::Label;
use chrono::NaiveDate;
use serde::Serialize;

use crate::classifier::{Features, classify};
use crate::evidence::EvidenceTable;
use crate::parser::{DateParser, ParserConfig};
use crate::summary::{CandidateSet, summarize};

/// A document as handed over by the caller. Nothing here touches the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    /// Path or file name; a date in it is the preferred reference.
    pub path: Option<&'a str>,
    /// Recognized text.
    pub text: &'a str,
    /// File modification date, the fallback reference.
    pub modified: Option<NaiveDate>,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str) -> Self {
        Document {
            path: None,
            text,
            modified: None,
        }
    }

    pub fn with_path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_modified(mut self, modified: NaiveDate) -> Self {
        self.modified = Some(modified);
        self
    }
}

/// Every intermediate step of one resolution, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub reference: Option<NaiveDate>,
    pub evidence: EvidenceTable,
    pub candidates: CandidateSet,
    pub features: Features,
    pub label: Label,
    pub date: Option<NaiveDate>,
}

/// Answers "what date does this document represent".
///
/// Holds no per-document state, so one resolver can serve many threads.
pub struct DateResolver {
    parser: DateParser,
}

impl DateResolver {
    pub fn new(config: ParserConfig) -> Self {
        DateResolver {
            parser: DateParser::new(config),
        }
    }

    pub fn parser(&self) -> &DateParser {
        &self.parser
    }

    /// Date parsed from the path, else the modification date.
    pub fn reference_date(&self, doc: &Document) -> Option<NaiveDate> {
        doc.path
            .and_then(|p| self.parser.parse(p))
            .or(doc.modified)
    }

    pub fn resolve(&self, doc: &Document) -> Resolution {
        let reference = self.reference_date(doc);
        let evidence = self.parser.collect_evidence(doc.text);
        let candidates = summarize(&evidence, reference);
        let features = candidates.features();
        let label = classify(&features);
        let date = candidates.slot(label).map(|c| c.date);

        tracing::debug!(
            path = doc.path.unwrap_or("-"),
            ?reference,
            %label,
            ?date,
            "resolved document date"
        );

        Resolution {
            reference,
            evidence,
            candidates,
            features,
            label,
            date,
        }
    }

    /// The document's authoritative date, or `None` when no candidate
    /// qualifies and the caller should fall back on its own policy.
    pub fn determine_date(&self, doc: &Document) -> Option<NaiveDate> {
        self.resolve(doc).date
    }
}
