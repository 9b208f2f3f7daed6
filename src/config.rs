use chrono::{Local, NaiveDate};

use crate::parser::ParserConfig;
use crate::scanner::RESULT_FILE;
use crate::summary::SummaryMode;

/// Run-wide settings assembled by the binary from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub today: NaiveDate,
    /// File name of the OCR transcripts in an archive.
    pub result_file: String,
    pub mode: SummaryMode,
}

impl Settings {
    /// Settings for `today`, or the local calendar date when not given.
    pub fn new(today: Option<NaiveDate>) -> Self {
        Settings {
            today: today.unwrap_or_else(|| Local::now().date_naive()),
            result_file: RESULT_FILE.to_string(),
            mode: SummaryMode::Offsets,
        }
    }

    pub fn with_result_file(mut self, name: impl Into<String>) -> Self {
        self.result_file = name.into();
        self
    }

    pub fn with_mode(mut self, mode: SummaryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new(self.today)
    }
}
