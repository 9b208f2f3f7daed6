//! Dating of scanned, OCR'd documents.
//!
//! Finds every calendar date a document mentions, reduces them to three
//! anchor dates and applies a fitted decision table to pick the one that
//! is the document's own date, if any.

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evidence;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod summary;

pub use archive_types::{Anchor, DatasetRecord, Label, NO_DATE_OFFSET};
pub use classifier::{Features, classify};
pub use error::{Error, Result};
pub use evidence::{EvidenceTable, collect_evidence};
pub use parser::{DateFamily, DateParser, ParserConfig, parse_date};
pub use resolver::{DateResolver, Document, Resolution};
pub use summary::{Candidate, CandidateSet, SummaryMode, summarize};
