use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::parser::{DateParser, ParserConfig};

/// Every date a document mentions, with the lines that mention it.
///
/// Keys are unique and sorted ascending; each bucket keeps its lines in the
/// order they appeared and is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EvidenceTable {
    buckets: BTreeMap<NaiveDate, Vec<String>>,
}

impl EvidenceTable {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Distinct dates, ascending.
    pub fn dates(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + ExactSizeIterator + '_ {
        self.buckets.keys().copied()
    }

    /// Number of lines that mention `date`.
    pub fn frequency(&self, date: NaiveDate) -> usize {
        self.buckets.get(&date).map_or(0, Vec::len)
    }

    pub fn lines(&self, date: NaiveDate) -> &[String] {
        self.buckets.get(&date).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[String])> + '_ {
        self.buckets.iter().map(|(d, lines)| (*d, lines.as_slice()))
    }
}

impl DateParser {
    /// Parse every line of `text` and group the lines by the date they name.
    ///
    /// Lines without a date are dropped; identical lines are kept as
    /// separate mentions.
    pub fn collect_evidence(&self, text: &str) -> EvidenceTable {
        let mut buckets: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        for line in text.lines() {
            if let Some(date) = self.parse(line) {
                buckets.entry(date).or_default().push(line.to_string());
            }
        }
        tracing::debug!(dates = buckets.len(), "collected date evidence");
        EvidenceTable { buckets }
    }
}

/// One-shot evidence collection with a freshly built parser.
pub fn collect_evidence(text: &str, today: NaiveDate) -> EvidenceTable {
    DateParser::new(ParserConfig::new(today)).collect_evidence(text)
}
