//! Incremental parser for the FEATURES table.
//!
//! Feature keys start in column 6, locations and qualifiers in column 22.
//! A quoted qualifier value stays open across lines until a line ends with an
//! odd run of quotes; `""` inside a quoted value is a literal quote.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{GenbankError, Result};
use crate::models::{Feature, QualifierValue};

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").unwrap());
static FLOAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+\.\d+$").unwrap());

const KEY_COLUMN: usize = 5;

/// Qualifiers whose wrapped lines are concatenated without a separator.
const SEQUENCE_QUALIFIERS: &[&str] = &["translation"];

#[derive(Debug)]
struct OpenQualifier {
    name: String,
    text: String,
    quoted: bool,
    closed: bool,
}

#[derive(Debug)]
struct FeatureBuilder {
    feature: Feature,
    qualifier: Option<OpenQualifier>,
}

#[derive(Debug, Default)]
pub struct FeatureTableParser {
    features: Vec<Feature>,
    current: Option<FeatureBuilder>,
}

impl FeatureTableParser {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Consume one line of the feature table (anything after the FEATURES header).
    ///
    /// # Arguments
    /// - line: the raw line
    /// - line_number: used for error reporting
    pub fn push_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        let content = line.trim();
        if content.is_empty() {
            return Ok(());
        }

        let indent = line.len() - line.trim_start().len();
        let quote_open = self
            .current
            .as_ref()
            .and_then(|b| b.qualifier.as_ref())
            .is_some_and(|q| q.quoted && !q.closed);

        if indent <= KEY_COLUMN && !quote_open {
            self.finish_feature(line_number)?;
            return self.start_feature(content, line_number);
        }

        if indent <= KEY_COLUMN {
            return Err(GenbankError::InvalidFeature {
                line: line_number,
                reason: "new feature key while a quoted qualifier value is still open"
                    .to_string(),
            });
        }

        let builder = self.current.as_mut().ok_or_else(|| GenbankError::InvalidFeature {
            line: line_number,
            reason: "qualifier or location line before any feature key".to_string(),
        })?;

        if quote_open {
            if let Some(qualifier) = builder.qualifier.as_mut() {
                continue_quoted(qualifier, content, line_number)?;
            }
            return Ok(());
        }

        if let Some(stripped) = content.strip_prefix('/') {
            builder.close_qualifier(line_number)?;
            builder.qualifier = Some(open_qualifier(stripped, line_number)?);
            return Ok(());
        }

        match builder.qualifier.as_mut() {
            // location still wrapping
            None => builder.feature.location.push_str(content),
            Some(qualifier) => {
                if content.starts_with('"') || content.ends_with('"') {
                    return Err(GenbankError::InvalidFeature {
                        line: line_number,
                        reason: format!("stray quote in unquoted value of /{}", qualifier.name),
                    });
                }
                qualifier.text.push_str(content);
            }
        }
        Ok(())
    }

    ///
    /// Close the table and hand back every feature seen.
    ///
    pub fn finish(mut self, line_number: usize) -> Result<Vec<Feature>> {
        self.finish_feature(line_number)?;
        Ok(self.features)
    }

    fn start_feature(&mut self, content: &str, line_number: usize) -> Result<()> {
        let mut parts = content.splitn(2, char::is_whitespace);
        let key = parts.next().unwrap_or_default();
        let location = parts.next().map(|l| l.trim()).unwrap_or_default();

        if location.is_empty() {
            return Err(GenbankError::InvalidFeature {
                line: line_number,
                reason: format!("feature {:?} has no location", key),
            });
        }

        self.current = Some(FeatureBuilder {
            feature: Feature::new(key, location),
            qualifier: None,
        });
        Ok(())
    }

    fn finish_feature(&mut self, line_number: usize) -> Result<()> {
        if let Some(mut builder) = self.current.take() {
            builder.close_qualifier(line_number)?;
            self.features.push(builder.feature);
        }
        Ok(())
    }
}

impl FeatureBuilder {
    fn close_qualifier(&mut self, line_number: usize) -> Result<()> {
        let Some(qualifier) = self.qualifier.take() else {
            return Ok(());
        };

        let value = match (qualifier.quoted, qualifier.closed) {
            (true, false) => {
                return Err(GenbankError::InvalidFeature {
                    line: line_number,
                    reason: format!("unterminated quoted value for /{}", qualifier.name),
                });
            }
            (true, true) => QualifierValue::Text(unescape_quotes(
                &qualifier.text,
                &qualifier.name,
                line_number,
            )?),
            (false, _) if qualifier.text.is_empty() => QualifierValue::Boolean(true),
            (false, _) => typed_value(qualifier.text.trim()),
        };

        self.feature
            .qualifiers
            .entry(qualifier.name)
            .or_default()
            .push(value);
        Ok(())
    }
}

fn open_qualifier(content: &str, line_number: usize) -> Result<OpenQualifier> {
    let (name, value) = match content.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (content.trim(), None),
    };

    if name.is_empty() {
        return Err(GenbankError::InvalidFeature {
            line: line_number,
            reason: "qualifier without a name".to_string(),
        });
    }

    let mut qualifier = OpenQualifier {
        name: name.to_string(),
        text: String::new(),
        quoted: false,
        closed: false,
    };

    match value {
        None => {}
        Some(value) => match value.strip_prefix('"') {
            Some(rest) => {
                qualifier.quoted = true;
                append_quoted(&mut qualifier, rest);
            }
            None => {
                if value.ends_with('"') {
                    return Err(GenbankError::InvalidFeature {
                        line: line_number,
                        reason: format!("unbalanced quote in value of /{}", name),
                    });
                }
                qualifier.text.push_str(value);
            }
        },
    }

    Ok(qualifier)
}

fn continue_quoted(qualifier: &mut OpenQualifier, content: &str, line_number: usize) -> Result<()> {
    let leading = content.chars().take_while(|c| *c == '"').count();
    if leading % 2 == 1 && leading != content.len() {
        return Err(GenbankError::InvalidFeature {
            line: line_number,
            reason: format!("unbalanced quote at line start in /{}", qualifier.name),
        });
    }

    if !qualifier.text.is_empty() && !SEQUENCE_QUALIFIERS.contains(&qualifier.name.as_str()) {
        qualifier.text.push(' ');
    }
    append_quoted(qualifier, content);
    Ok(())
}

/// Add a chunk of quoted text; an odd run of trailing quotes closes the value.
fn append_quoted(qualifier: &mut OpenQualifier, chunk: &str) {
    let trailing = chunk.chars().rev().take_while(|c| *c == '"').count();
    if trailing % 2 == 1 {
        qualifier.text.push_str(&chunk[..chunk.len() - 1]);
        qualifier.closed = true;
    } else {
        qualifier.text.push_str(chunk);
    }
}

fn unescape_quotes(text: &str, name: &str, line_number: usize) -> Result<String> {
    let mut value = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.next() != Some('"') {
                return Err(GenbankError::InvalidFeature {
                    line: line_number,
                    reason: format!("unescaped quote inside value of /{}", name),
                });
            }
        }
        value.push(c);
    }

    Ok(value.trim().to_string())
}

fn typed_value(text: &str) -> QualifierValue {
    if INTEGER.is_match(text) {
        if let Ok(value) = text.parse() {
            return QualifierValue::Integer(value);
        }
    }
    if FLOAT.is_match(text) {
        if let Ok(value) = text.parse() {
            return QualifierValue::Float(value);
        }
    }
    QualifierValue::Text(text.to_string())
}
