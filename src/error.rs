// error.rs - error types for CFG reconstruction
//
// Fatal conditions each get their own variant so callers can match on them;
// the one non-fatal sentinel (`NotTaken`, an unresolved indirect transfer)
// is modeled separately in `trace::Lookup`, not as an `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("main function not found in assembly")]
    MainNotFound,

    #[error("address {0:?} not found in assembly")]
    AddressNotFound(String),

    #[error("boundary reconciliation mismatch: {starts} starts vs {ends} ends")]
    BoundaryMismatch { starts: usize, ends: usize },

    #[error("malformed trace line following match at trace line {0}")]
    MalformedTraceLine(usize),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
