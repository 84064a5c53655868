use serde::{Deserialize, Serialize};

use gbkit_core::{Sequence, Strand};
use gbkit_genbank::Qualifiers;

///
/// One chromosome, plasmid or contig: the record-level view of a GenBank entry.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Component {
    pub id: u64,
    pub name: String,
    pub accession: String,
    pub version: u32,
    pub secondary_accessions: Vec<String>,
    pub definition: Option<String>,
    pub comment: Option<String>,
    pub molecule_type: String,
    pub division: String,
    pub date: String,
    /// `None` when the LOCUS topology is neither `circular` nor `linear`.
    pub is_circular: Option<bool>,
    pub length: u64,
    pub dseq_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Gene {
    pub id: u64,
    pub component_id: u64,
    /// Sequence id of the gene transcript, when transcribed.
    pub dseq_id: Option<String>,
    /// Sequence id of the CDS translation, when present.
    pub aseq_id: Option<String>,
    pub accession: Option<String>,
    pub version: Option<u32>,
    pub locus: Option<String>,
    pub old_locus: Option<String>,
    pub location: String,
    pub strand: Strand,
    pub start: u64,
    pub stop: u64,
    pub length: u64,
    pub names: Vec<String>,
    pub pseudo: bool,
    pub notes: Option<String>,
    pub product: Option<String>,
    pub codon_start: Option<i64>,
    pub translation_table: Option<i64>,
    /// Gene qualifiers not mapped onto a field above.
    pub qualifiers: Qualifiers,
    pub cognate_key: Option<String>,
    pub cognate_location: Option<String>,
    /// Qualifiers of a non-CDS cognate feature.
    pub cognate_qualifiers: Qualifiers,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Xref {
    pub id: u64,
    pub gene_id: u64,
    pub database: String,
    pub database_id: String,
}

/// A feature that is neither a gene nor a gene's cognate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ComponentFeature {
    pub id: u64,
    pub component_id: u64,
    /// Set only when the feature sits at exactly the preceding gene's location.
    pub gene_id: Option<u64>,
    pub key: String,
    pub location: String,
    pub strand: Strand,
    pub start: u64,
    pub stop: u64,
    pub length: u64,
    pub qualifiers: Qualifiers,
}

/// A content-addressed sequence discovered while adapting a record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DerivedSequence {
    pub id: String,
    pub length: usize,
    pub sequence: String,
}

impl From<&Sequence> for DerivedSequence {
    fn from(seq: &Sequence) -> Self {
        DerivedSequence {
            id: seq.seq_id(),
            length: seq.len(),
            sequence: seq.as_str().to_string(),
        }
    }
}

///
/// Everything produced from one GenBank record.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedRecord {
    pub component: Component,
    pub component_seq: DerivedSequence,
    pub genes: Vec<Gene>,
    pub xrefs: Vec<Xref>,
    pub component_features: Vec<ComponentFeature>,
    pub gene_seqs: Vec<DerivedSequence>,
    pub protein_seqs: Vec<DerivedSequence>,
}
