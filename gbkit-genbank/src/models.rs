use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Qualifier name to every value it was given, in file order.
pub type Qualifiers = IndexMap<String, Vec<QualifierValue>>;

///
/// GenbankRecord struct, one `//`-terminated entry of a GenBank flat file.
///
/// Every section is optional at this level: a record consisting of nothing but
/// the terminator parses to the default value.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GenbankRecord {
    pub locus: Option<Locus>,
    pub definition: Option<String>,
    pub accession: Option<Accession>,
    pub version: Option<String>,
    pub db_link: IndexMap<String, Vec<String>>,
    pub keywords: Vec<String>,
    pub segment: Option<Segment>,
    pub source: Option<Source>,
    pub references: Vec<Reference>,
    pub comment: Option<String>,
    pub contig: Option<String>,
    pub origin: Option<String>,
    pub features: Vec<Feature>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub name: String,
    pub bp: u64,
    pub strandedness: Option<String>,
    pub molecule_type: String,
    pub topology: String,
    pub division_code: String,
    pub date: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Accession {
    pub primary: String,
    pub secondary: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub number: u32,
    pub total: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    pub common_name: Option<String>,
    pub formal_name: Option<String>,
    pub taxonomic_ranks: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    pub number: u32,
    pub notes: Option<String>,
    pub authors: Option<String>,
    pub consortium: Option<String>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub pubmed: Option<String>,
    pub medline: Option<String>,
    pub remark: Option<String>,
}

///
/// One entry of the feature table. The location is kept as text; turning it
/// into a [gbkit_core::Location] is left to the consumer.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Feature {
    pub key: String,
    pub location: String,
    pub qualifiers: Qualifiers,
}

impl Feature {
    pub fn new(key: &str, location: &str) -> Feature {
        Feature {
            key: key.to_string(),
            location: location.to_string(),
            qualifiers: Qualifiers::new(),
        }
    }

    pub fn with_qualifier(mut self, name: &str, value: QualifierValue) -> Feature {
        self.qualifiers
            .entry(name.to_string())
            .or_default()
            .push(value);
        self
    }

    pub fn has_qualifier(&self, name: &str) -> bool {
        self.qualifiers.contains_key(name)
    }

    /// Every value of `name` rendered as text.
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.qualifiers
            .get(name)
            .map(|values| values.iter().map(|v| v.to_string()).collect())
            .unwrap_or_default()
    }

    /// The first value of `name` rendered as text, if any.
    pub fn first_text(&self, name: &str) -> Option<String> {
        self.qualifiers
            .get(name)
            .and_then(|values| values.first())
            .map(|v| v.to_string())
    }
}

///
/// A single qualifier value. Quoted values are always text; unquoted values
/// that look numeric become numbers; a bare `/name` is a boolean flag.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum QualifierValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl QualifierValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            QualifierValue::Integer(value) => Some(*value),
            QualifierValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<&str> for QualifierValue {
    fn from(value: &str) -> Self {
        QualifierValue::Text(value.to_string())
    }
}

impl Display for QualifierValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualifierValue::Boolean(value) => write!(f, "{}", value),
            QualifierValue::Integer(value) => write!(f, "{}", value),
            QualifierValue::Float(value) => write!(f, "{}", value),
            QualifierValue::Text(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_feature_qualifier_accessors() {
        let feature = Feature::new("gene", "1..10")
            .with_qualifier("locus_tag", "b0001".into())
            .with_qualifier("db_xref", "GeneID:1".into())
            .with_qualifier("db_xref", "ASAP:2".into())
            .with_qualifier("pseudo", QualifierValue::Boolean(true));

        assert_eq!(feature.first_text("locus_tag"), Some("b0001".to_string()));
        assert_eq!(feature.texts("db_xref"), vec!["GeneID:1", "ASAP:2"]);
        assert!(feature.has_qualifier("pseudo"));
        assert_eq!(feature.first_text("note"), None);
        assert!(feature.texts("note").is_empty());
    }

    #[rstest]
    fn test_qualifier_value_json() {
        let values = vec![
            QualifierValue::Boolean(true),
            QualifierValue::Integer(11),
            QualifierValue::Text("thr operon leader".to_string()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[true,11,"thr operon leader"]"#);

        let back: Vec<QualifierValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[rstest]
    fn test_empty_record_deserializes_from_empty_object() {
        let record: GenbankRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, GenbankRecord::default());
    }
}
