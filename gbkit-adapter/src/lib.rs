//! # GenBank to gene model adapter
//!
//! Maps a parsed [gbkit_genbank::GenbankRecord] onto one component, its genes
//! (each with at most one cognate feature), cross references, the remaining
//! features and the pools of derived sequences.
//!
//! ```rust
//! use gbkit_adapter::{AdapterConfig, GenbankAdapter};
//! use gbkit_genbank::parse_str;
//!
//! let text = "\
//! LOCUS       X_1                       20 bp    DNA     linear   BCT 01-JAN-2020
//! ACCESSION   X_1
//! VERSION     X_1.1
//! FEATURES             Location/Qualifiers
//!      gene            5..10
//!                      /locus_tag=\"X_1\"
//! ORIGIN
//!         1 acgtacgtac acgtacgtac
//! //
//! ";
//! let record = parse_str(text).unwrap().remove(0);
//!
//! let mut adapter = GenbankAdapter::new(AdapterConfig::default());
//! let adapted = adapter.format_ref_seq(&record).unwrap();
//! assert_eq!(adapted.component.id, 1);
//! assert_eq!(adapted.genes[0].locus.as_deref(), Some("X_1"));
//! ```
pub mod adapter;
pub mod config;
pub mod errors;
pub mod models;
pub mod sorting;
pub mod validate;

pub use adapter::GenbankAdapter;
pub use config::AdapterConfig;
pub use errors::{AdapterError, ConfigError, Result};
pub use models::{AdaptedRecord, Component, ComponentFeature, DerivedSequence, Gene, Xref};
