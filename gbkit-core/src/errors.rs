use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("Sub-sequence {start}..{stop} is out of range for a sequence of length {length}")]
    OutOfRange {
        start: usize,
        stop: usize,
        length: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location point position must be positive")]
    ZeroPosition,

    #[error("Between location point requires stop == start + 1, got {start}^{stop}")]
    InvalidBetween { start: u64, stop: u64 },

    #[error("Bounded location point requires start < stop, got {start}.{stop}")]
    InvalidBounded { start: u64, stop: u64 },

    #[error("Invalid location point: {0:?}")]
    InvalidPoint(String),

    #[error("Malformed location {location:?}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("Complement location accepts exactly one child: {0:?}")]
    ComplementArity(String),

    #[error("{0}(...) locations are not yet implemented")]
    NotImplemented(String),

    #[error("Location bound {bound} exceeds sequence length {length}")]
    BoundExceedsLength { bound: u64, length: u64 },

    #[error("Location {lower}..{upper} wraps through the origin of a non-circular sequence")]
    WrapsLinearSequence { lower: u64, upper: u64 },

    #[error("Transcription from an external accession is not supported: {0}")]
    ExternalAccession(String),

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

pub type Result<T> = std::result::Result<T, LocationError>;
