//! Calendar-date recognition in noisy OCR lines and path strings.
//!
//! Three pattern families are tried in a fixed order. Within a family only
//! the rightmost structural match is considered; if it does not survive
//! validation the next family gets its chance.

use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};

/// Years up to and including this one are treated as noise.
pub const EARLIEST_YEAR: i32 = 1970;

// ── Regex patterns ─────────────────────────────────────────────────
//
// Real data examples:
//   ISO:        2012-01-28, 2012/01/28, 20120128
//   Day-first:  30/01/2016, 13.01.2016, 13012016
//   No year:    30/01, 13.01
//
// The separator (one of _ - . : / or space) is optional, but both
// separators of a date must be the same character or both absent. The
// regex crate has no back-references, so `sep1 == sep2` is checked after
// the match.

const RE_ISO: &str =
    r"^(?P<year>[0-9]{4})(?P<sep1>[_\-.:/ ]?)(?P<month>[0-9]{2})(?P<sep2>[_\-.:/ ]?)(?P<day>[0-9]{2})";

const RE_DAY_FIRST: &str =
    r"^(?P<day>[0-9]{2})(?P<sep1>[_\-.:/ ]?)(?P<month>[0-9]{2})(?P<sep2>[_\-.:/ ]?)(?P<year>[0-9]{4})";

const RE_NO_YEAR: &str = r"^(?P<day>[0-9]{2})(?P<sep1>[_\-.:/ ]?)(?P<month>[0-9]{2})";

/// Which pattern family recognized a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFamily {
    /// `YYYY sep MM sep DD`
    Iso,
    /// `DD sep MM sep YYYY`
    DayFirst,
    /// `DD sep MM`, year taken from the reference clock
    NoYear,
}

/// Settings the parser is constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Reference "today": later dates are rejected, and the no-year family
    /// borrows its year.
    pub today: NaiveDate,
}

impl ParserConfig {
    pub fn new(today: NaiveDate) -> Self {
        ParserConfig { today }
    }
}

/// Numeric fields of a structural match, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawDate {
    year: Option<i32>,
    month: u32,
    day: u32,
}

struct Pattern {
    family: DateFamily,
    regex: Regex,
}

impl Pattern {
    fn new(family: DateFamily) -> Self {
        let source = match family {
            DateFamily::Iso => RE_ISO,
            DateFamily::DayFirst => RE_DAY_FIRST,
            DateFamily::NoYear => RE_NO_YEAR,
        };
        Pattern {
            family,
            regex: Regex::new(source).expect("date pattern is valid"),
        }
    }

    /// Find the match starting furthest to the right.
    ///
    /// Equivalent to a greedy `^.*(...).*$` scan: the last viable
    /// occurrence in the string wins, not the first.
    fn rightmost(&self, text: &str) -> Option<RawDate> {
        let bytes = text.as_bytes();
        (0..bytes.len())
            .rev()
            // an ASCII digit byte is always a char boundary
            .filter(|&start| bytes[start].is_ascii_digit())
            .filter(|&start| {
                self.family != DateFamily::NoYear
                    || start == 0
                    || !bytes[start - 1].is_ascii_digit()
            })
            .find_map(|start| {
                let caps = self.regex.captures(&text[start..])?;
                self.extract(&caps)
            })
    }

    fn extract(&self, caps: &Captures) -> Option<RawDate> {
        let sep1 = caps.name("sep1").map_or("", |m| m.as_str());
        let sep2 = caps.name("sep2").map_or(sep1, |m| m.as_str());
        if sep1 != sep2 {
            return None;
        }

        let number = |name: &str| caps.name(name)?.as_str().parse::<u32>().ok();
        let year = match self.family {
            DateFamily::NoYear => None,
            DateFamily::Iso | DateFamily::DayFirst => {
                Some(caps.name("year")?.as_str().parse::<i32>().ok()?)
            }
        };

        Some(RawDate {
            year,
            month: number("month")?,
            day: number("day")?,
        })
    }
}

/// Recognizes at most one calendar date in a string.
pub struct DateParser {
    today: NaiveDate,
    patterns: [Pattern; 3],
}

impl DateParser {
    pub fn new(config: ParserConfig) -> Self {
        DateParser {
            today: config.today,
            patterns: [
                Pattern::new(DateFamily::Iso),
                Pattern::new(DateFamily::DayFirst),
                Pattern::new(DateFamily::NoYear),
            ],
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Parse the date mentioned in `text`, if any.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        self.parse_with_family(text).map(|(date, _)| date)
    }

    /// Like [`DateParser::parse`], also reporting which family matched.
    pub fn parse_with_family(&self, text: &str) -> Option<(NaiveDate, DateFamily)> {
        self.patterns.iter().find_map(|pattern| {
            let raw = pattern.rightmost(text)?;
            let date = self.validate(raw);
            if date.is_none() {
                tracing::trace!(
                    family = ?pattern.family,
                    year = ?raw.year,
                    month = raw.month,
                    day = raw.day,
                    "rejected implausible date"
                );
            }
            date.map(|d| (d, pattern.family))
        })
    }

    /// Build a civil date and check it lies in `(EARLIEST_YEAR, today]`.
    fn validate(&self, raw: RawDate) -> Option<NaiveDate> {
        let year = raw.year.unwrap_or_else(|| self.today.year());
        let date = NaiveDate::from_ymd_opt(year, raw.month, raw.day)?;
        (year > EARLIEST_YEAR && date <= self.today).then_some(date)
    }
}

/// One-shot parse with a freshly built parser.
pub fn parse_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    DateParser::new(ParserConfig::new(today)).parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parser() -> DateParser {
        DateParser::new(ParserConfig::new(today()))
    }

    // ── Format coverage ──────────────────────────────────────────────

    #[test]
    fn test_parse_dates() {
        let p = parser();
        for text in ["2026-01-30", "30/01/2026", "30/01"] {
            assert_eq!(p.parse(text), Some(ymd(2026, 1, 30)), "{text}");
        }
    }

    #[test]
    fn test_families_reported() {
        let p = parser();
        assert_eq!(
            p.parse_with_family("2016_01_13"),
            Some((ymd(2016, 1, 13), DateFamily::Iso))
        );
        assert_eq!(
            p.parse_with_family("13.01.2016"),
            Some((ymd(2016, 1, 13), DateFamily::DayFirst))
        );
        assert_eq!(
            p.parse_with_family("13:01"),
            Some((ymd(2026, 1, 13), DateFamily::NoYear))
        );
    }

    #[test]
    fn test_space_separator() {
        assert_eq!(parser().parse("Dato 30 01 2016"), Some(ymd(2016, 1, 30)));
    }

    #[test]
    fn test_parse_difficult_dates() {
        // ISO reading (1301-20-16) is rejected, day-first succeeds
        assert_eq!(
            parser().parse("hjghkjd 13012016 fshdfhkds"),
            Some(ymd(2016, 1, 13))
        );
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(
            parser().parse("Forfallsdato: 13.01.2016 – Ærlig talt"),
            Some(ymd(2016, 1, 13))
        );
    }

    // ── Validation ───────────────────────────────────────────────────

    #[test]
    fn test_parse_non_date() {
        // used to come out as <year>-04-23
        assert_eq!(parser().parse("ART. NR 30011832 22304"), None);
    }

    #[test]
    fn test_rejects_epoch_and_earlier() {
        assert_eq!(parser().parse("1970-06-15"), None);
        assert_eq!(parser().parse("1971-06-15"), Some(ymd(1971, 6, 15)));
    }

    #[test]
    fn test_rejects_future() {
        assert_eq!(parser().parse("2026-12-24"), None);
        assert_eq!(parser().parse("2026-10-19"), Some(today()));
    }

    #[test]
    fn test_rejects_impossible_day() {
        assert_eq!(parser().parse("2015-02-30"), None);
    }

    #[test]
    fn test_none_for_plain_text() {
        assert_eq!(parser().parse(""), None);
        assert_eq!(parser().parse("Faktura nr. 7"), None);
    }

    // ── Family fallthrough ───────────────────────────────────────────

    #[test]
    fn test_invalid_iso_falls_through_to_day_first() {
        assert_eq!(
            parser().parse_with_family("Ref 2099-13-45 dated 30.01.2015"),
            Some((ymd(2015, 1, 30), DateFamily::DayFirst))
        );
    }

    #[test]
    fn test_mismatched_separators_do_not_match() {
        // neither 2015-01-30 nor day-first; no-year reads 01.30 and rejects it
        assert_eq!(parser().parse("2015-01.30"), None);
    }

    #[test]
    fn test_no_year_not_preceded_by_digit() {
        assert_eq!(parser().parse("ref 123/04"), None);
        assert_eq!(parser().parse("ref 23/04"), Some(ymd(2026, 4, 23)));
    }

    // ── Rightmost match ──────────────────────────────────────────────

    #[test]
    fn test_rightmost_match_wins() {
        assert_eq!(
            parser().parse("2015-03-04 og 2016-05-06"),
            Some(ymd(2016, 5, 6))
        );
        assert_eq!(
            parser().parse("04.03.2015 og 06.05.2016"),
            Some(ymd(2016, 5, 6))
        );
    }

    #[test]
    fn test_parse_path_as_date() {
        let path = "/home/jostein/DocumentArchive/2012/01/28/hp photosmart 5510 5515 all in one printer ink/result.txt";
        assert_eq!(parser().parse(path), Some(ymd(2012, 1, 28)));
    }

    #[test]
    fn test_parse_date_helper() {
        assert_eq!(parse_date("30/01", ymd(2016, 6, 1)), Some(ymd(2016, 1, 30)));
        // no-year dates borrow the reference year and may then be in the future
        assert_eq!(parse_date("30/12", ymd(2016, 6, 1)), None);
    }
}
