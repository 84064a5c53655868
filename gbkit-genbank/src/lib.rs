//! # GenBank flat-file parsing
//!
//! Turns GenBank text into [GenbankRecord] values: the header sections, the
//! reference list, the feature table with its qualifiers and the raw sequence.
//! Feature locations are kept as text here; see `gbkit_core::parse_location`.
//!
//! ```rust
//! use gbkit_genbank::parse_str;
//!
//! let text = "\
//! LOCUS       X_1                       10 bp    DNA     linear   BCT 01-JAN-2020
//! FEATURES             Location/Qualifiers
//!      gene            1..5
//!                      /locus_tag=\"X_1\"
//! ORIGIN
//!         1 acgtacgtac
//! //
//! ";
//! let records = parse_str(text).unwrap();
//! assert_eq!(records[0].locus.as_ref().unwrap().bp, 10);
//! assert_eq!(records[0].features[0].first_text("locus_tag").as_deref(), Some("X_1"));
//! ```
pub mod errors;
pub mod models;
pub mod parser;
pub mod reader;

pub use errors::{GenbankError, Result};
pub use models::{
    Accession, Feature, GenbankRecord, Locus, QualifierValue, Qualifiers, Reference, Segment,
    Source,
};
pub use parser::GenbankStreamParser;
pub use reader::{GenbankReader, parse_str};
