//! Compiler error types
//!
//! All of these are per-entry failures: the batch parsers count them and
//! keep going, so one bad line never aborts a configuration load.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("exception filters (@@) are not supported")]
    ExceptionFilter,

    #[error("unsupported filter option '{0}'")]
    UnsupportedOption(String),

    #[error("'first-party' and 'third-party' are mutually exclusive")]
    ConflictingParty,

    #[error("'{0}' cannot be combined with an explicit domain list")]
    PartyWithDomains(&'static str),

    #[error("invalid pattern: {0}")]
    BadPattern(#[from] regex::Error),
}
