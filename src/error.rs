//! Error kinds for decoding, field arithmetic, ingestion and recovery.
//!
//! Errors fall into two scopes:
//!
//! - **entry** — a single share record is unusable ([`Error::InvalidBase`],
//!   [`Error::InvalidDigit`], [`Error::MalformedEntry`]).
//!   The record is dropped and the batch continues.
//! - **batch** — everything else. The batch is abandoned; other batches are
//!   unaffected.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid base {0}: must be between 2 and 36")]
    InvalidBase(u64),

    #[error("invalid digit {digit:?} for base {base}")]
    InvalidDigit { digit: char, base: u32 },

    #[error("division by zero: no inverse for 0 in the field")]
    DivisionByZero,

    #[error("missing quorum: no \"{0}.k\" field")]
    MissingQuorum(String),

    #[error("invalid quorum: {0}")]
    InvalidQuorum(String),

    #[error("insufficient shares: need {needed}, have {available}")]
    InsufficientShares { needed: usize, available: usize },

    #[error("cannot read {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source: {0}")]
    MalformedSource(#[from] serde_json::Error),

    #[error("malformed entry {label:?}: {reason}")]
    MalformedEntry { label: String, reason: String },

    #[error("invalid modulus {0}: must be prime")]
    InvalidModulus(u64),
}

impl Error {
    pub(crate) fn malformed(label: &str, reason: impl Into<String>) -> Self {
        Error::MalformedEntry {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
