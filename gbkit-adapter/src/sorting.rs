//! Feature ordering.
//!
//! Features are ordered by lower bound, then length, then raw location text,
//! with genes ahead of other features on a full tie. Within a run of equal
//! lower bounds a gene is additionally moved in front of any feature carrying
//! its locus tag, so a gene always precedes its own CDS even when the CDS is
//! shorter.
use std::cmp::Ordering;

use gbkit_core::{Bounded, Location};
use gbkit_genbank::Feature;

use crate::errors::{AdapterError, Result};

pub const GENE_KEY: &str = "gene";

/// A feature with its parsed location and the values it is ordered by.
#[derive(Debug, Clone)]
pub struct LocatedFeature<'a> {
    pub feature: &'a Feature,
    pub location: Location,
    pub lower: u64,
    pub length: u64,
    pub locus_tag: Option<String>,
}

impl<'a> LocatedFeature<'a> {
    pub fn new(feature: &'a Feature, is_circular: bool, seq_length: u64) -> Result<Self> {
        let with_context = |source| AdapterError::FeatureLocation {
            key: feature.key.clone(),
            location: feature.location.clone(),
            source,
        };

        let location = gbkit_core::parse_location(&feature.location).map_err(with_context)?;
        let length = location
            .length(is_circular, seq_length)
            .map_err(with_context)?;

        Ok(LocatedFeature {
            feature,
            lower: location.lower_bound(),
            length,
            location,
            locus_tag: feature
                .first_text("locus_tag")
                .filter(|tag| !tag.is_empty()),
        })
    }

    pub fn is_gene(&self) -> bool {
        self.feature.key == GENE_KEY
    }

    pub fn raw_location(&self) -> &str {
        &self.feature.location
    }

    fn shares_locus_tag(&self, other: &LocatedFeature) -> bool {
        self.locus_tag.is_some() && self.locus_tag == other.locus_tag
    }
}

fn total_order(a: &LocatedFeature, b: &LocatedFeature) -> Ordering {
    a.lower
        .cmp(&b.lower)
        .then(a.length.cmp(&b.length))
        .then_with(|| a.raw_location().cmp(b.raw_location()))
        .then(b.is_gene().cmp(&a.is_gene()))
}

///
/// Sort features into the order genes and their cognates are linked in.
///
pub fn sort_features(features: &mut Vec<LocatedFeature>) {
    features.sort_by(total_order);

    let mut run_start = 0;
    for i in 0..features.len() {
        if features[i].lower != features[run_start].lower {
            run_start = i;
        }
        if !features[i].is_gene() || features[i].locus_tag.is_none() {
            continue;
        }

        let first_tagged = (run_start..i)
            .find(|&j| !features[j].is_gene() && features[j].shares_locus_tag(&features[i]));
        if let Some(j) = first_tagged {
            let gene = features.remove(i);
            features.insert(j, gene);
        }
    }
}
