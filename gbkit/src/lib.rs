//! # gbkit
//!
//! GenBank flat files in, a normalized gene model out. Each layer lives in its
//! own crate and is re-exported here behind a feature of the same name:
//!
//! - `core`: sequences, location points and the location algebra
//! - `genbank`: the record model and the streaming flat-file parser
//! - `adapter`: component, gene and cross-reference extraction
#[cfg(feature = "core")]
#[doc(inline)]
pub use gbkit_core as core;

#[cfg(feature = "genbank")]
#[doc(inline)]
pub use gbkit_genbank as genbank;

#[cfg(feature = "adapter")]
#[doc(inline)]
pub use gbkit_adapter as adapter;
