//! Decides which anchor date, if any, is a document's own date.
//!
//! The rules are a decision tree fitted offline against an archive of
//! filed documents, flattened into an ordered table. The cutoffs are the
//! fitted values and must not be rounded.

use archive_types::Label;
use serde::Serialize;

/// Classifier input: offsets and frequencies of the min/mid/max anchors.
///
/// Frequencies are part of the trained feature vector but no rule reads them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Features {
    pub min_offset: f64,
    pub min_freq: f64,
    pub mid_offset: f64,
    pub mid_freq: f64,
    pub max_offset: f64,
    pub max_freq: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feature {
    MinOffset,
    MidOffset,
    MaxOffset,
}

impl Feature {
    fn value(self, f: &Features) -> f64 {
        match self {
            Feature::MinOffset => f.min_offset,
            Feature::MidOffset => f.mid_offset,
            Feature::MaxOffset => f.max_offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Split {
    AtMost(f64),
    Above(f64),
}

struct Rule {
    feature: Feature,
    split: Split,
    label: Label,
}

impl Rule {
    fn matches(&self, f: &Features) -> bool {
        let v = self.feature.value(f);
        match self.split {
            Split::AtMost(t) => v <= t,
            Split::Above(t) => v > t,
        }
    }
}

/// First matching rule wins; [`FALLBACK`] otherwise.
const RULES: &[Rule] = &[
    Rule { feature: Feature::MaxOffset, split: Split::AtMost(-0.5), label: Label::None },
    Rule { feature: Feature::MaxOffset, split: Split::AtMost(0.5), label: Label::Max },
    Rule { feature: Feature::MinOffset, split: Split::Above(0.5), label: Label::None },
    Rule { feature: Feature::MinOffset, split: Split::Above(-0.5), label: Label::Min },
    Rule { feature: Feature::MidOffset, split: Split::Above(1.0), label: Label::None },
    Rule { feature: Feature::MidOffset, split: Split::AtMost(-4.5), label: Label::None },
];

const FALLBACK: Label = Label::Mid;

/// Label the authoritative anchor for a feature vector.
pub fn classify(features: &Features) -> Label {
    RULES
        .iter()
        .find(|rule| rule.matches(features))
        .map_or(FALLBACK, |rule| rule.label)
}
