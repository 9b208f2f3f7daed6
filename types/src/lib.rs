use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Offset reported for every slot when a document mentions no date at all.
pub const NO_DATE_OFFSET: i64 = -1_000_000;

// ── Label ────────────────────────────────────────────────────────────────

/// Which candidate slot (if any) holds the document's authoritative date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Label {
    Min,
    Mid,
    Max,
    None,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::Min, Label::Mid, Label::Max, Label::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Min => "MIN",
            Label::Mid => "MID",
            Label::Max => "MAX",
            Label::None => "NONE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown label {0:?}, expected one of MIN, MID, MAX, NONE")]
pub struct UnknownLabel(pub String);

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl TryFrom<String> for Label {
    type Error = UnknownLabel;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Label> for String {
    fn from(l: Label) -> Self {
        l.as_str().to_string()
    }
}

// ── Dataset record ───────────────────────────────────────────────────────

/// One summarized slot value, as written to a dataset file.
///
/// Offset-mode records carry day offsets from the reference date; date-mode
/// records carry the literal candidate date (`null` when nothing was found).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Anchor {
    Offset(i64),
    Date(Option<NaiveDate>),
}

impl Anchor {
    pub fn offset(&self) -> Option<i64> {
        match self {
            Anchor::Offset(n) => Some(*n),
            Anchor::Date(_) => None,
        }
    }
}

/// A feature vector plus its label, one per archived document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub path: String,
    pub min: Anchor,
    pub min_freq: usize,
    pub mid: Anchor,
    pub mid_freq: usize,
    pub max: Anchor,
    pub max_freq: usize,
    pub label: Label,
}
