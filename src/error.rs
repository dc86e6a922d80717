//! Error Types
//!
//! Fatal errors abort the whole compilation run; everything recoverable
//! (unresolvable characters, unknown redaction markers, malformed records)
//! defaults in place and is surfaced through snapshot counters instead.

use thiserror::Error;

/// Errors that can abort a compilation run.
#[derive(Error, Debug)]
pub enum FolioError {
    /// No chapter sources were provided. The chapter corpus is a required
    /// input; there is nothing to paginate without it.
    #[error("No chapter sources provided - the chapter corpus is a required input")]
    MissingChapters,

    /// No annotation records were provided. The annotation collection is a
    /// required input even when every record ends up embedded in body text.
    #[error("No annotation records provided - the annotation collection is a required input")]
    MissingAnnotations,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FolioError>;
