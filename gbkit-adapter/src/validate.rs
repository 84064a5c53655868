//! Upfront shape checks. Records may arrive as JSON, so nothing the parser
//! would have guaranteed is assumed here.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use gbkit_genbank::{Accession, GenbankRecord, Locus};

use crate::errors::{AdapterError, Result};

static VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\w+)\.([1-9]\d*)$").unwrap());

/// The mandatory parts of a record, checked.
#[derive(Debug)]
pub struct ValidRecord<'a> {
    pub locus: &'a Locus,
    pub accession: &'a Accession,
    pub version: u32,
    pub origin: &'a str,
    pub record: &'a GenbankRecord,
}

///
/// Check that `record` carries everything the adapter needs.
///
pub fn validate(record: &GenbankRecord) -> Result<ValidRecord<'_>> {
    let locus = record.locus.as_ref().ok_or(AdapterError::MissingField("LOCUS"))?;
    let locus_fields = [
        ("LOCUS name", &locus.name),
        ("LOCUS molecule type", &locus.molecule_type),
        ("LOCUS topology", &locus.topology),
        ("LOCUS division code", &locus.division_code),
        ("LOCUS date", &locus.date),
    ];
    for (field, value) in locus_fields {
        if value.trim().is_empty() {
            return Err(AdapterError::MissingField(field));
        }
    }

    let accession = record
        .accession
        .as_ref()
        .ok_or(AdapterError::MissingField("ACCESSION"))?;
    if accession.primary.trim().is_empty() {
        return Err(AdapterError::MissingField("primary accession"));
    }

    let version_text = record
        .version
        .as_deref()
        .ok_or(AdapterError::MissingField("VERSION"))?;
    let captures = VERSION
        .captures(version_text)
        .ok_or_else(|| AdapterError::InvalidField {
            field: "VERSION",
            reason: format!("expected ACCESSION.VERSION, found {:?}", version_text),
        })?;
    let version = captures[2].parse().map_err(|_| AdapterError::InvalidField {
        field: "VERSION",
        reason: format!("version number out of range in {:?}", version_text),
    })?;
    if captures[1] != accession.primary {
        warn!(
            "VERSION {} does not match primary accession {}",
            version_text, accession.primary
        );
    }

    let origin = record
        .origin
        .as_deref()
        .ok_or(AdapterError::MissingField("ORIGIN"))?;

    for (index, feature) in record.features.iter().enumerate() {
        if feature.key.trim().is_empty() {
            return Err(AdapterError::InvalidFeature {
                index,
                reason: "empty feature key".to_string(),
            });
        }
        if feature.location.trim().is_empty() {
            return Err(AdapterError::InvalidFeature {
                index,
                reason: format!("{} has an empty location", feature.key),
            });
        }
    }

    Ok(ValidRecord {
        locus,
        accession,
        version,
        origin,
        record,
    })
}
