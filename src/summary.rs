//! Reduction of an evidence table to three anchor dates.

use archive_types::{Anchor, DatasetRecord, Label, NO_DATE_OFFSET};
use chrono::NaiveDate;
use serde::Serialize;

use crate::classifier::Features;
use crate::evidence::EvidenceTable;

/// One anchor date with its statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub date: NaiveDate,
    /// Lines mentioning `date`.
    pub frequency: usize,
    /// `date - reference` in whole days.
    pub offset_days: i64,
}

/// Output view of a [`CandidateSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    /// Literal dates, `null` for missing evidence.
    Dates,
    /// Day offsets from the reference date, [`NO_DATE_OFFSET`] for missing evidence.
    Offsets,
}

/// Earliest, second-latest and latest date of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CandidateSet {
    /// The document mentions no date.
    Empty,
    Anchored {
        min: Candidate,
        mid: Candidate,
        max: Candidate,
    },
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        matches!(self, CandidateSet::Empty)
    }

    /// The candidate a label points at; `NONE` and empty sets point nowhere.
    pub fn slot(&self, label: Label) -> Option<Candidate> {
        let CandidateSet::Anchored { min, mid, max } = self else {
            return None;
        };
        match label {
            Label::Min => Some(*min),
            Label::Mid => Some(*mid),
            Label::Max => Some(*max),
            Label::None => None,
        }
    }

    /// `[min, mid, max]` rendered in the requested mode.
    pub fn anchors(&self, mode: SummaryMode) -> [Anchor; 3] {
        match (self, mode) {
            (CandidateSet::Empty, SummaryMode::Dates) => [Anchor::Date(None); 3],
            (CandidateSet::Empty, SummaryMode::Offsets) => [Anchor::Offset(NO_DATE_OFFSET); 3],
            (CandidateSet::Anchored { min, mid, max }, SummaryMode::Dates) => {
                [min, mid, max].map(|c| Anchor::Date(Some(c.date)))
            }
            (CandidateSet::Anchored { min, mid, max }, SummaryMode::Offsets) => {
                [min, mid, max].map(|c| Anchor::Offset(c.offset_days))
            }
        }
    }

    /// `[min, mid, max]` frequencies, zero for an empty set.
    pub fn frequencies(&self) -> [usize; 3] {
        match self {
            CandidateSet::Empty => [0; 3],
            CandidateSet::Anchored { min, mid, max } => {
                [min.frequency, mid.frequency, max.frequency]
            }
        }
    }

    /// Offset-mode feature vector for the classifier.
    pub fn features(&self) -> Features {
        let offsets = self
            .anchors(SummaryMode::Offsets)
            .map(|a| a.offset().unwrap_or(NO_DATE_OFFSET) as f64);
        let freqs = self.frequencies().map(|f| f as f64);
        Features {
            min_offset: offsets[0],
            min_freq: freqs[0],
            mid_offset: offsets[1],
            mid_freq: freqs[1],
            max_offset: offsets[2],
            max_freq: freqs[2],
        }
    }

    /// Dataset row for this set.
    pub fn record(&self, path: impl Into<String>, label: Label, mode: SummaryMode) -> DatasetRecord {
        let [min, mid, max] = self.anchors(mode);
        let [min_freq, mid_freq, max_freq] = self.frequencies();
        DatasetRecord {
            path: path.into(),
            min,
            min_freq,
            mid,
            mid_freq,
            max,
            max_freq,
            label,
        }
    }
}

/// Pick the min, mid and max anchors of `evidence`.
///
/// `mid` is the second-latest date when there are three or more, otherwise
/// it equals `max`. Offsets are measured from `reference`; without one, each
/// candidate is its own reference.
pub fn summarize(evidence: &EvidenceTable, reference: Option<NaiveDate>) -> CandidateSet {
    let dates: Vec<NaiveDate> = evidence.dates().collect();
    let (Some(&min), Some(&max)) = (dates.first(), dates.last()) else {
        return CandidateSet::Empty;
    };
    let mid = if dates.len() > 2 { dates[dates.len() - 2] } else { max };

    let candidate = |date: NaiveDate| Candidate {
        date,
        frequency: evidence.frequency(date),
        offset_days: reference.map_or(0, |r| (date - r).num_days()),
    };

    CandidateSet::Anchored {
        min: candidate(min),
        mid: candidate(mid),
        max: candidate(max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::collect_evidence;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn evidence(text: &str) -> EvidenceTable {
        collect_evidence(text, ymd(2026, 10, 19))
    }

    const FOUR_DATES: &str = "\
01.01.2016
05.01.2016
05.01.2016
10.01.2016
20.01.2016
20.01.2016
20.01.2016
";

    #[test]
    fn test_mid_is_second_latest() {
        let set = summarize(&evidence(FOUR_DATES), Some(ymd(2016, 1, 10)));
        let CandidateSet::Anchored { min, mid, max } = set else {
            panic!("expected anchors");
        };
        assert_eq!((min.date, min.frequency, min.offset_days), (ymd(2016, 1, 1), 1, -9));
        assert_eq!((mid.date, mid.frequency, mid.offset_days), (ymd(2016, 1, 10), 1, 0));
        assert_eq!((max.date, max.frequency, max.offset_days), (ymd(2016, 1, 20), 3, 10));
    }

    #[test]
    fn test_two_dates_mid_equals_max() {
        let set = summarize(&evidence("01.01.2016\n20.01.2016\n"), None);
        let CandidateSet::Anchored { min, mid, max } = set else {
            panic!("expected anchors");
        };
        assert_eq!(min.date, ymd(2016, 1, 1));
        assert_eq!(mid, max);
        // no reference: every candidate measured against itself
        assert_eq!([min.offset_days, mid.offset_days, max.offset_days], [0, 0, 0]);
    }

    #[test]
    fn test_single_date_fills_all_slots() {
        let set = summarize(&evidence("Dato 13.01.2016"), Some(ymd(2016, 1, 14)));
        assert_eq!(set.anchors(SummaryMode::Offsets), [Anchor::Offset(-1); 3]);
        assert_eq!(set.frequencies(), [1, 1, 1]);
    }

    #[test]
    fn test_empty_sentinel() {
        let set = summarize(&evidence("ingenting"), Some(ymd(2016, 1, 14)));
        assert!(set.is_empty());
        assert_eq!(set.anchors(SummaryMode::Dates), [Anchor::Date(None); 3]);
        assert_eq!(
            set.anchors(SummaryMode::Offsets),
            [Anchor::Offset(NO_DATE_OFFSET); 3]
        );
        assert_eq!(set.frequencies(), [0; 3]);
        let f = set.features();
        assert_eq!(
            [f.min_offset, f.mid_offset, f.max_offset],
            [NO_DATE_OFFSET as f64; 3]
        );
        assert_eq!(set.slot(Label::Max), None);
    }

    #[test]
    fn test_slot_lookup() {
        let set = summarize(&evidence(FOUR_DATES), Some(ymd(2016, 1, 10)));
        assert_eq!(set.slot(Label::Min).map(|c| c.date), Some(ymd(2016, 1, 1)));
        assert_eq!(set.slot(Label::Mid).map(|c| c.date), Some(ymd(2016, 1, 10)));
        assert_eq!(set.slot(Label::Max).map(|c| c.date), Some(ymd(2016, 1, 20)));
        assert_eq!(set.slot(Label::None), None);
    }

    #[test]
    fn test_record_modes() {
        let set = summarize(&evidence(FOUR_DATES), Some(ymd(2016, 1, 10)));

        let dates = set.record("a/result.txt", Label::Mid, SummaryMode::Dates);
        assert_eq!(dates.min, Anchor::Date(Some(ymd(2016, 1, 1))));
        assert_eq!(dates.max, Anchor::Date(Some(ymd(2016, 1, 20))));
        assert_eq!(dates.max_freq, 3);

        let offsets = set.record("a/result.txt", Label::Mid, SummaryMode::Offsets);
        assert_eq!(
            [offsets.min, offsets.mid, offsets.max],
            [Anchor::Offset(-9), Anchor::Offset(0), Anchor::Offset(10)]
        );
        assert_eq!(offsets.label, Label::Mid);
        assert_eq!(offsets.path, "a/result.txt");
    }
}
