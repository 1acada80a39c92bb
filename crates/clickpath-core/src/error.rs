use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A row reached the store without one of its categorical fields.
    /// `row` is the zero-based position in the input sequence.
    #[error("malformed input at row {row}: missing required field `{field}`")]
    MalformedInput { row: usize, field: &'static str },

    /// A filter constraint set was supplied but left empty, which is
    /// ambiguous between "match nothing" and "no restriction".
    #[error("invalid filter: `{dimension}` constraint is present but empty")]
    InvalidFilter { dimension: &'static str },
}
