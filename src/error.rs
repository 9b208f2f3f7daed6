use std::path::PathBuf;

/// Failures of the I/O shell around the date engine.
///
/// Not finding a date is never an error; it is an empty `Option`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset {}: {source}", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode JSON output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("record {0} holds literal dates; evaluation needs an offset-mode dataset")]
    DateModeRecord(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
