use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Database whose identifiers are always dropped: GenInfo numbers are retired.
pub const GI_DATABASE: &str = "GI";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AdapterConfig {
    /// Extra `db_xref` databases to discard, on top of `GI`.
    pub dropped_xref_databases: Vec<String>,
    /// Compute gene transcripts and collect them into `geneSeqs`.
    pub transcribe_genes: bool,
    /// Collect CDS translations into `proteinSeqs`.
    pub keep_translations: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            dropped_xref_databases: vec![],
            transcribe_genes: true,
            keep_translations: true,
        }
    }
}

impl AdapterConfig {
    pub fn drops_database(&self, database: &str) -> bool {
        database == GI_DATABASE || self.dropped_xref_databases.iter().any(|d| d == database)
    }
}

impl TryFrom<&Path> for AdapterConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        if path.extension().and_then(OsStr::to_str) != Some("toml") {
            return Err(ConfigError::InvalidFileType);
        }
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("tests/data/adapter.toml");
        let config = AdapterConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.dropped_xref_databases, vec!["ASAP", "EcoGene"]);
        assert!(!config.transcribe_genes);
        assert!(config.keep_translations);
    }

    #[rstest]
    fn test_partial_toml_uses_defaults() {
        let config: AdapterConfig = toml::from_str("transcribe_genes = false").unwrap();
        assert_eq!(
            config,
            AdapterConfig {
                transcribe_genes: false,
                ..Default::default()
            }
        );
    }

    #[rstest]
    fn test_wrong_extension() {
        let path = PathBuf::from("tests/data/adapter.yaml");
        assert!(matches!(
            AdapterConfig::try_from(path.as_path()),
            Err(ConfigError::InvalidFileType)
        ));
    }

    #[rstest]
    fn test_gi_is_always_dropped() {
        let config = AdapterConfig::default();
        assert!(config.drops_database("GI"));
        assert!(!config.drops_database("GeneID"));
    }
}
