use clickpath_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A required field is blank. `line` is the 1-based input line,
    /// counting any header and skipped rows.
    #[error("line {line}: missing required field `{field}`")]
    Malformed { line: u64, field: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),
}
