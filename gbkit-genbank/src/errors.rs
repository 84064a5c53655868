use std::io;
use thiserror::Error;

/// Error type for GenBank parsing. Line numbers are 1-based and count every
/// line fed to the parser.
#[derive(Error, Debug)]
pub enum GenbankError {
    #[error("line {line}: {section} may only occur once per record")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: {section} is present but has no value")]
    EmptySection { line: usize, section: String },

    #[error("line {line}: invalid {section}: {reason}")]
    InvalidSection {
        line: usize,
        section: String,
        reason: String,
    },

    #[error("line {line}: unknown keyword {keyword:?}")]
    UnknownKeyword { line: usize, keyword: String },

    #[error("line {line}: {reason}")]
    UnexpectedLine { line: usize, reason: String },

    #[error("line {line}: invalid feature table entry: {reason}")]
    InvalidFeature { line: usize, reason: String },

    #[error("Input ended without a record terminator (//)")]
    MissingTerminator,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl GenbankError {
    pub(crate) fn invalid(line: usize, section: &str, reason: impl Into<String>) -> GenbankError {
        GenbankError::InvalidSection {
            line,
            section: section.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for GenBank parsing.
pub type Result<T> = std::result::Result<T, GenbankError>;
