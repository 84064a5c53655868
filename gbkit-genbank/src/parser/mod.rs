//! Line-oriented GenBank record parser.
//!
//! Lines are fed one at a time. A line starting in column 1 opens a top level
//! section, a line with a keyword in columns 3-12 opens a sub-section of SOURCE
//! or REFERENCE, and anything else continues the open section. Everything
//! between FEATURES and the next top level keyword belongs to the feature table.
pub mod features;
pub mod sections;

use log::{debug, warn};

use crate::errors::{GenbankError, Result};
use crate::models::{GenbankRecord, Source};

use self::features::FeatureTableParser;
use self::sections::*;

/// Width of the keyword columns.
const KEYWORD_WIDTH: usize = 12;
const TERMINATOR: &str = "//";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Section(Keyword),
    Organism,
    ReferenceField(ReferenceField),
    Ignored,
}

#[derive(Debug)]
struct PendingSection {
    target: Target,
    line: usize,
    values: Vec<String>,
}

#[derive(Debug, Default)]
struct RecordBuilder {
    record: GenbankRecord,
    seen: Vec<Keyword>,
    top: Option<Keyword>,
    pending: Option<PendingSection>,
    features: Option<FeatureTableParser>,
    has_content: bool,
}

///
/// Incremental parser producing one [GenbankRecord] per `//` terminator.
///
/// A grammar error aborts the current record; every line up to and including
/// the next `//` is then discarded so the following record starts clean.
///
/// ```rust
/// use gbkit_genbank::GenbankStreamParser;
///
/// let mut parser = GenbankStreamParser::new();
/// assert!(parser.push_line("DEFINITION  Escherichia coli.").unwrap().is_none());
///
/// let record = parser.push_line("//").unwrap().unwrap();
/// assert_eq!(record.definition.as_deref(), Some("Escherichia coli."));
/// assert!(parser.finish().unwrap().is_none());
/// ```
#[derive(Debug, Default)]
pub struct GenbankStreamParser {
    builder: RecordBuilder,
    line_number: usize,
    terminators_seen: usize,
    recovering: bool,
}

impl GenbankStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    ///
    /// Feed one line (with or without its line ending).
    ///
    /// Returns the completed record when the line is a `//` terminator.
    pub fn push_line(&mut self, line: &str) -> Result<Option<GenbankRecord>> {
        self.line_number += 1;
        let line = line.trim_end_matches(['\n', '\r']);
        let is_terminator = line.trim_end() == TERMINATOR;

        if self.recovering {
            if is_terminator {
                debug!("Resuming after record terminator at line {}", self.line_number);
                self.recovering = false;
                self.terminators_seen += 1;
            }
            return Ok(None);
        }

        if is_terminator {
            self.terminators_seen += 1;
            let builder = std::mem::take(&mut self.builder);
            return builder.finish(self.line_number).map(Some);
        }

        if let Err(e) = self.builder.push_line(line, self.line_number) {
            self.builder = RecordBuilder::default();
            self.recovering = true;
            return Err(e);
        }
        Ok(None)
    }

    ///
    /// Signal the end of input.
    ///
    /// Content after the last terminator is returned as a final record, provided
    /// at least one terminator was seen. Input without any terminator is an error.
    pub fn finish(&mut self) -> Result<Option<GenbankRecord>> {
        let builder = std::mem::take(&mut self.builder);

        if self.recovering {
            self.recovering = false;
            return Ok(None);
        }

        if self.terminators_seen == 0 {
            return Err(GenbankError::MissingTerminator);
        }

        match builder.has_content {
            true => {
                debug!("Flushing unterminated final record at line {}", self.line_number);
                builder.finish(self.line_number).map(Some)
            }
            false => Ok(None),
        }
    }
}

/// Split a line into its keyword columns and the value that follows them.
fn split_columns(line: &str) -> (&str, &str) {
    match line.char_indices().nth(KEYWORD_WIDTH) {
        Some((index, _)) => (&line[..index], &line[index..]),
        None => (line, ""),
    }
}

fn is_sub_keyword(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase())
}

impl RecordBuilder {
    fn push_line(&mut self, line: &str, line_number: usize) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        self.has_content = true;

        let starts_indented = line.starts_with(char::is_whitespace);
        if !starts_indented {
            return self.open_section(line, line_number);
        }

        if let Some(features) = self.features.as_mut() {
            return features.push_line(line, line_number);
        }

        let continues_raw = matches!(
            self.pending.as_ref().map(|p| p.target),
            Some(Target::Section(Keyword::Origin)) | Some(Target::Ignored)
        );

        let (columns, value) = split_columns(line);
        let name = columns.trim();
        if !continues_raw && is_sub_keyword(name) {
            return self.open_sub_section(name, value, line_number);
        }

        match self.pending.as_mut() {
            Some(pending) => {
                pending.values.push(line.trim().to_string());
                Ok(())
            }
            None => Err(GenbankError::UnexpectedLine {
                line: line_number,
                reason: "continuation line outside of any section".to_string(),
            }),
        }
    }

    fn open_section(&mut self, line: &str, line_number: usize) -> Result<()> {
        self.close_pending()?;
        self.close_features(line_number)?;

        let (columns, value) = split_columns(line);
        let name = columns.trim();

        if IGNORED_KEYWORDS.contains(&name) {
            debug!("Skipping {} section at line {}", name, line_number);
            self.top = None;
            self.pending = Some(PendingSection {
                target: Target::Ignored,
                line: line_number,
                values: vec![],
            });
            return Ok(());
        }

        let keyword: Keyword = name.parse().map_err(|_| GenbankError::UnknownKeyword {
            line: line_number,
            keyword: name.to_string(),
        })?;

        if !keyword.is_repeatable() && self.seen.contains(&keyword) {
            return Err(GenbankError::DuplicateSection {
                line: line_number,
                section: keyword.to_string(),
            });
        }
        self.seen.push(keyword);
        self.top = Some(keyword);

        if keyword == Keyword::Features {
            self.features = Some(FeatureTableParser::new());
            return Ok(());
        }

        self.pending = Some(PendingSection {
            target: Target::Section(keyword),
            line: line_number,
            values: vec![value.to_string()],
        });
        Ok(())
    }

    fn open_sub_section(&mut self, name: &str, value: &str, line_number: usize) -> Result<()> {
        let target = match (self.top, name) {
            (Some(Keyword::Source), "ORGANISM") => Target::Organism,
            (Some(Keyword::Reference), _) => match ReferenceField::from_keyword(name) {
                Some(field) => Target::ReferenceField(field),
                None => {
                    return Err(GenbankError::UnexpectedLine {
                        line: line_number,
                        reason: format!("unknown REFERENCE field {:?}", name),
                    });
                }
            },
            (top, _) => {
                return Err(GenbankError::UnexpectedLine {
                    line: line_number,
                    reason: format!(
                        "sub-keyword {:?} outside of SOURCE or REFERENCE (in {})",
                        name,
                        top.map(|k| k.as_str()).unwrap_or("no section")
                    ),
                });
            }
        };

        self.close_pending()?;

        match target {
            Target::Organism => {
                let organism_seen = self
                    .record
                    .source
                    .as_ref()
                    .is_some_and(|s| s.formal_name.is_some());
                if organism_seen {
                    return Err(GenbankError::DuplicateSection {
                        line: line_number,
                        section: "ORGANISM".to_string(),
                    });
                }
            }
            Target::ReferenceField(field) => {
                let reference = self.record.references.last_mut().ok_or_else(|| {
                    GenbankError::UnexpectedLine {
                        line: line_number,
                        reason: format!("{} without a REFERENCE", field.as_str()),
                    }
                })?;

                if field.slot(reference).is_some() {
                    return Err(GenbankError::DuplicateSection {
                        line: line_number,
                        section: field.as_str().to_string(),
                    });
                }

                let needs_journal =
                    matches!(field, ReferenceField::Pubmed | ReferenceField::Medline);
                if needs_journal && reference.journal.is_none() {
                    return Err(GenbankError::UnexpectedLine {
                        line: line_number,
                        reason: format!("{} must follow JOURNAL", field.as_str()),
                    });
                }
            }
            _ => {}
        }

        self.pending = Some(PendingSection {
            target,
            line: line_number,
            values: vec![value.to_string()],
        });
        Ok(())
    }

    fn close_features(&mut self, line_number: usize) -> Result<()> {
        if let Some(features) = self.features.take() {
            let parsed = features.finish(line_number)?;
            self.record.features.extend(parsed);
        }
        Ok(())
    }

    fn close_pending(&mut self) -> Result<()> {
        let Some(PendingSection {
            target,
            line,
            values,
        }) = self.pending.take()
        else {
            return Ok(());
        };

        let record = &mut self.record;
        match target {
            Target::Ignored => {}
            Target::Section(keyword) => match keyword {
                Keyword::Locus => record.locus = Some(parse_locus(&values, line)?),
                Keyword::Definition => {
                    record.definition = Some(free_text(&values, line, "DEFINITION")?)
                }
                Keyword::Accession => record.accession = Some(parse_accession(&values, line)?),
                Keyword::Version => record.version = Some(parse_version(&values, line)?),
                Keyword::DbLink => record.db_link = parse_dblink(&values, line)?,
                Keyword::Keywords => record.keywords = parse_keywords(&values, line)?,
                Keyword::Segment => record.segment = Some(parse_segment(&values, line)?),
                Keyword::Source => {
                    record.source = Some(Source {
                        common_name: Some(free_text(&values, line, "SOURCE")?),
                        ..Default::default()
                    })
                }
                Keyword::Reference => record.references.push(parse_reference_header(&values, line)?),
                Keyword::Comment => record.comment = Some(free_text(&values, line, "COMMENT")?),
                Keyword::Contig => record.contig = Some(parse_contig(&values, line)?),
                Keyword::Origin => record.origin = Some(parse_origin(&values, line)?),
                Keyword::Features => {}
            },
            Target::Organism => {
                let (formal_name, ranks) = parse_organism(&values, line)?;
                if let Some(source) = record.source.as_mut() {
                    source.formal_name = Some(formal_name);
                    source.taxonomic_ranks = ranks;
                }
            }
            Target::ReferenceField(field) => {
                let text = free_text(&values, line, field.as_str())?;
                if let Some(reference) = record.references.last_mut() {
                    *field.slot(reference) = Some(text);
                }
            }
        }
        Ok(())
    }

    fn finish(mut self, line_number: usize) -> Result<GenbankRecord> {
        self.close_pending()?;
        self.close_features(line_number)?;

        let record = self.record;
        if let (Some(locus), Some(origin)) = (&record.locus, &record.origin) {
            if locus.bp != origin.len() as u64 {
                warn!(
                    "{}: LOCUS reports {} bp but ORIGIN holds {}",
                    locus.name,
                    locus.bp,
                    origin.len()
                );
            }
        }

        debug!(
            "Parsed record {} ({} features) ending at line {}",
            record.locus.as_ref().map(|l| l.name.as_str()).unwrap_or("<unnamed>"),
            record.features.len(),
            line_number
        );
        Ok(record)
    }
}
