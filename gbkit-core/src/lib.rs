//! Core types for gbkit: cleaned sequences with content-addressed identifiers,
//! and the GenBank location algebra.
//!
//! ```rust
//! use gbkit_core::{parse_location, Bounded, Sequence};
//!
//! let seq = Sequence::new("ABCDEFGHIJ");
//! let location = parse_location("join(1..2,complement(5..6))").unwrap();
//!
//! assert_eq!(location.lower_bound(), 1);
//! assert_eq!(location.upper_bound(), 6);
//! assert_eq!(location.length(false, seq.len() as u64).unwrap(), 4);
//! assert_eq!(location.transcript_from(&seq).unwrap().as_str(), "ABFE");
//! ```
pub mod errors;
pub mod location_parser;
pub mod models;
pub mod traits;
pub mod utils;

// re-expose core types
pub use errors::{LocationError, SequenceError};
pub use location_parser::{parse_location, parse_point};
pub use models::{Fuzziness, Location, LocationPoint, Sequence, SimpleLocation};
pub use traits::{Bounded, Strand};
