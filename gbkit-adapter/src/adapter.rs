use fxhash::FxHashSet;
use log::debug;

use gbkit_core::{Bounded, Sequence};
use gbkit_genbank::{Feature, GenbankRecord, Qualifiers};

use crate::config::AdapterConfig;
use crate::errors::{AdapterError, Result};
use crate::models::{AdaptedRecord, Component, ComponentFeature, DerivedSequence, Gene, Xref};
use crate::sorting::{LocatedFeature, sort_features};
use crate::validate::{ValidRecord, validate};

const CDS_KEY: &str = "CDS";

/// Gene qualifiers that map onto [Gene] fields or cross references.
const GENE_FIELDS: &[&str] = &[
    "locus_tag",
    "old_locus_tag",
    "gene",
    "gene_synonym",
    "pseudo",
    "note",
    "db_xref",
];

/// CDS qualifiers that map onto [Gene] fields or cross references.
const CDS_FIELDS: &[&str] = &[
    "locus_tag",
    "gene",
    "pseudo",
    "db_xref",
    "product",
    "codon_start",
    "transl_table",
    "protein_id",
    "translation",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counters {
    component: u64,
    gene: u64,
    xref: u64,
    feature: u64,
}

impl Counters {
    fn next(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }
}

///
/// Converts parsed GenBank records into [AdaptedRecord]s.
///
/// Identifier counters live on the adapter and keep increasing across calls,
/// so one adapter should be used for a whole import run. A record that fails
/// consumes no identifiers.
///
#[derive(Debug, Default)]
pub struct GenbankAdapter {
    config: AdapterConfig,
    counters: Counters,
}

/// Per-record state of one adapter call.
struct RecordContext<'a> {
    config: &'a AdapterConfig,
    counters: Counters,
    sequence: Sequence,
    is_circular: bool,
    component_id: u64,
    seen_xrefs: FxHashSet<(String, String)>,
    gene_seq_ids: FxHashSet<String>,
    protein_seq_ids: FxHashSet<String>,
    genes: Vec<Gene>,
    xrefs: Vec<Xref>,
    features: Vec<ComponentFeature>,
    gene_seqs: Vec<DerivedSequence>,
    protein_seqs: Vec<DerivedSequence>,
}

impl GenbankAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        GenbankAdapter {
            config,
            counters: Counters::default(),
        }
    }

    ///
    /// Adapt one record.
    ///
    /// The record is validated first; on any error the adapter's counters are
    /// left as they were.
    pub fn format_ref_seq(&mut self, record: &GenbankRecord) -> Result<AdaptedRecord> {
        let valid = validate(record)?;

        let is_circular = match valid.locus.topology.as_str() {
            "circular" => Some(true),
            "linear" => Some(false),
            _ => None,
        };
        let sequence = Sequence::with_topology(valid.origin, is_circular.unwrap_or(false));
        if sequence.len() as u64 != valid.locus.bp {
            debug!(
                "{}: LOCUS length {} differs from sequence length {}",
                valid.locus.name,
                valid.locus.bp,
                sequence.len()
            );
        }

        let mut context = RecordContext {
            config: &self.config,
            counters: self.counters,
            is_circular: sequence.is_circular(),
            sequence,
            component_id: 0,
            seen_xrefs: FxHashSet::default(),
            gene_seq_ids: FxHashSet::default(),
            protein_seq_ids: FxHashSet::default(),
            genes: vec![],
            xrefs: vec![],
            features: vec![],
            gene_seqs: vec![],
            protein_seqs: vec![],
        };

        let component = context.component(&valid, is_circular);
        context.walk_features(&record.features)?;

        debug!(
            "Adapted {}: {} genes, {} xrefs, {} other features",
            component.accession,
            context.genes.len(),
            context.xrefs.len(),
            context.features.len()
        );

        // commit
        self.counters = context.counters;
        Ok(AdaptedRecord {
            component_seq: DerivedSequence::from(&context.sequence),
            component,
            genes: context.genes,
            xrefs: context.xrefs,
            component_features: context.features,
            gene_seqs: context.gene_seqs,
            protein_seqs: context.protein_seqs,
        })
    }
}

impl RecordContext<'_> {
    fn seq_length(&self) -> u64 {
        self.sequence.len() as u64
    }

    fn component(&mut self, valid: &ValidRecord, is_circular: Option<bool>) -> Component {
        self.component_id = Counters::next(&mut self.counters.component);
        let record = valid.record;

        Component {
            id: self.component_id,
            name: valid.locus.name.clone(),
            accession: valid.accession.primary.clone(),
            version: valid.version,
            secondary_accessions: valid.accession.secondary.clone(),
            definition: record.definition.clone(),
            comment: record.comment.clone(),
            molecule_type: valid.locus.molecule_type.clone(),
            division: valid.locus.division_code.clone(),
            date: valid.locus.date.clone(),
            is_circular,
            length: self.seq_length(),
            dseq_id: self.sequence.seq_id(),
        }
    }

    fn walk_features(&mut self, features: &[Feature]) -> Result<()> {
        let mut located = features
            .iter()
            .map(|f| LocatedFeature::new(f, self.is_circular, self.seq_length()))
            .collect::<Result<Vec<_>>>()?;
        sort_features(&mut located);

        // (gene id, raw location, locus tag) of the latest gene
        let mut previous: Option<(u64, String, Option<String>)> = None;

        let mut i = 0;
        while i < located.len() {
            let current = &located[i];

            if !current.is_gene() {
                let gene_id = previous
                    .as_ref()
                    .filter(|(_, location, _)| location == current.raw_location())
                    .map(|(id, _, _)| *id);
                self.push_feature(current, gene_id);
                i += 1;
                continue;
            }

            let next = located.get(i + 1);
            if let Some(next) = next {
                if next.is_gene() && next.raw_location() == current.raw_location() {
                    return Err(AdapterError::DuplicateGeneLocation(
                        current.raw_location().to_string(),
                    ));
                }
            }

            let starts_cluster = previous.as_ref().is_none_or(|(_, location, locus)| {
                location != current.raw_location() || *locus != current.locus_tag
            });
            if starts_cluster {
                self.seen_xrefs.clear();
            }

            let mut gene = self.gene(current)?;

            let cognate = next.filter(|next| {
                !next.is_gene()
                    && (next.raw_location() == current.raw_location()
                        || (current.locus_tag.is_some() && next.locus_tag == current.locus_tag))
            });
            if let Some(cognate) = cognate {
                self.link_cognate(&mut gene, current, cognate)?;
                i += 1;
            }

            previous = Some((gene.id, current.raw_location().to_string(), current.locus_tag.clone()));
            self.genes.push(gene);
            i += 1;
        }
        Ok(())
    }

    fn gene(&mut self, located: &LocatedFeature) -> Result<Gene> {
        let feature = located.feature;
        let id = Counters::next(&mut self.counters.gene);

        let dseq_id = match self.config.transcribe_genes {
            true => {
                let transcript = located
                    .location
                    .transcript_from(&self.sequence)
                    .map_err(|source| AdapterError::FeatureLocation {
                        key: feature.key.clone(),
                        location: feature.location.clone(),
                        source,
                    })?;
                Some(pool(&mut self.gene_seqs, &mut self.gene_seq_ids, &transcript))
            }
            false => None,
        };

        let notes = feature.texts("note");
        let gene = Gene {
            id,
            component_id: self.component_id,
            dseq_id,
            aseq_id: None,
            accession: None,
            version: None,
            locus: located.locus_tag.clone(),
            old_locus: feature.first_text("old_locus_tag"),
            location: feature.location.clone(),
            strand: located.location.strand(),
            start: located.lower,
            stop: located.location.upper_bound(),
            length: located.length,
            names: gene_names(feature),
            pseudo: feature.has_qualifier("pseudo"),
            notes: (!notes.is_empty()).then(|| notes.join("; ")),
            product: None,
            codon_start: None,
            translation_table: None,
            qualifiers: remaining(&feature.qualifiers, GENE_FIELDS),
            cognate_key: None,
            cognate_location: None,
            cognate_qualifiers: Qualifiers::new(),
        };

        self.push_xrefs(id, feature)?;
        Ok(gene)
    }

    fn link_cognate(
        &mut self,
        gene: &mut Gene,
        gene_feature: &LocatedFeature,
        cognate: &LocatedFeature,
    ) -> Result<()> {
        let overlaps = cognate
            .location
            .overlaps(&gene_feature.location, self.is_circular, self.seq_length())?;
        if !overlaps {
            return Err(AdapterError::CognateDoesNotOverlap {
                key: cognate.feature.key.clone(),
                location: cognate.raw_location().to_string(),
                gene_location: gene.location.clone(),
            });
        }

        let feature = cognate.feature;
        gene.cognate_key = Some(feature.key.clone());
        gene.cognate_location = Some(feature.location.clone());
        gene.pseudo |= feature.has_qualifier("pseudo");

        let skipped = match feature.key == CDS_KEY {
            true => {
                self.apply_cds(gene, feature);
                CDS_FIELDS
            }
            false => &["db_xref"][..],
        };
        for (name, values) in remaining(&feature.qualifiers, skipped) {
            gene.cognate_qualifiers
                .entry(name)
                .or_default()
                .extend(values);
        }

        self.push_xrefs(gene.id, feature)
    }

    fn apply_cds(&mut self, gene: &mut Gene, cds: &Feature) {
        let first_integer = |name: &str| {
            cds.qualifiers
                .get(name)
                .and_then(|values| values.first())
                .and_then(|v| v.as_integer())
        };

        gene.product = cds.first_text("product");
        gene.codon_start = first_integer("codon_start");
        gene.translation_table = first_integer("transl_table");

        if let Some(protein_id) = cds.first_text("protein_id") {
            let versioned = protein_id
                .rsplit_once('.')
                .and_then(|(accession, version)| Some((accession, version.parse::<u32>().ok()?)));
            match versioned {
                Some((accession, version)) => {
                    gene.accession = Some(accession.to_string());
                    gene.version = Some(version);
                }
                None => gene.accession = Some(protein_id.clone()),
            }
        }

        if self.config.keep_translations {
            if let Some(translation) = cds.first_text("translation") {
                let protein = Sequence::new(&translation);
                gene.aseq_id = Some(pool(
                    &mut self.protein_seqs,
                    &mut self.protein_seq_ids,
                    &protein,
                ));
            }
        }
    }

    fn push_xrefs(&mut self, gene_id: u64, feature: &Feature) -> Result<()> {
        for xref in feature.texts("db_xref") {
            let (database, database_id) = xref
                .split_once(':')
                .map(|(db, id)| (db.trim(), id.trim()))
                .filter(|(db, id)| !db.is_empty() && !id.is_empty())
                .ok_or_else(|| AdapterError::InvalidField {
                    field: "db_xref",
                    reason: format!("{:?} on {} {} is not DATABASE:ID", xref, feature.key, feature.location),
                })?;

            if self.config.drops_database(database) {
                debug!("Dropping {} cross reference {}", database, database_id);
                continue;
            }
            if !self
                .seen_xrefs
                .insert((database.to_string(), database_id.to_string()))
            {
                continue;
            }

            self.xrefs.push(Xref {
                id: Counters::next(&mut self.counters.xref),
                gene_id,
                database: database.to_string(),
                database_id: database_id.to_string(),
            });
        }
        Ok(())
    }

    fn push_feature(&mut self, located: &LocatedFeature, gene_id: Option<u64>) {
        let feature = located.feature;
        self.features.push(ComponentFeature {
            id: Counters::next(&mut self.counters.feature),
            component_id: self.component_id,
            gene_id,
            key: feature.key.clone(),
            location: feature.location.clone(),
            strand: located.location.strand(),
            start: located.lower,
            stop: located.location.upper_bound(),
            length: located.length,
            qualifiers: feature.qualifiers.clone(),
        });
    }
}

/// Add `seq` to a pool unless an identical sequence is already there.
fn pool(
    pool: &mut Vec<DerivedSequence>,
    ids: &mut FxHashSet<String>,
    seq: &Sequence,
) -> String {
    let id = seq.seq_id();
    if ids.insert(id.clone()) {
        pool.push(DerivedSequence::from(seq));
    }
    id
}

/// `gene` values followed by `;`-separated `gene_synonym` values, de-duplicated.
fn gene_names(feature: &Feature) -> Vec<String> {
    let synonyms = feature.texts("gene_synonym");
    let candidates = feature
        .texts("gene")
        .into_iter()
        .chain(synonyms.iter().flat_map(|s| s.split(';').map(|n| n.to_string())));

    let mut names: Vec<String> = vec![];
    for name in candidates {
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

fn remaining(qualifiers: &Qualifiers, skip: &[&str]) -> Qualifiers {
    qualifiers
        .iter()
        .filter(|(name, _)| !skip.contains(&name.as_str()))
        .map(|(name, values)| (name.clone(), values.clone()))
        .collect()
}
