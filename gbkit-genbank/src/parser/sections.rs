//! Grammars of the individual GenBank sections.
//!
//! Each function receives the section's value text, one entry per physical
//! line with the keyword columns removed, and the line number the section
//! started on.
use std::fmt::{self, Display};
use std::str::FromStr;

use indexmap::IndexMap;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{GenbankError, Result};
use crate::models::{Accession, Locus, Reference, Segment};

static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\.([1-9]\d*)(?:\s|$)").unwrap());
static SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+) of (\d+)$").unwrap());
static REFERENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)(?:\s+(.*))?$").unwrap());
static MOLECULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(ss|ds|ms)-)?([A-Za-z][A-Za-z-]*)$").unwrap());
static DIVISION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());
static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}-[A-Z]{3}-\d{4}$").unwrap());

/// Top level keywords of a GenBank record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Locus,
    Definition,
    Accession,
    Version,
    DbLink,
    Keywords,
    Segment,
    Source,
    Reference,
    Comment,
    Contig,
    Origin,
    Features,
}

impl Keyword {
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Keyword::Reference | Keyword::Features)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Locus => "LOCUS",
            Keyword::Definition => "DEFINITION",
            Keyword::Accession => "ACCESSION",
            Keyword::Version => "VERSION",
            Keyword::DbLink => "DBLINK",
            Keyword::Keywords => "KEYWORDS",
            Keyword::Segment => "SEGMENT",
            Keyword::Source => "SOURCE",
            Keyword::Reference => "REFERENCE",
            Keyword::Comment => "COMMENT",
            Keyword::Contig => "CONTIG",
            Keyword::Origin => "ORIGIN",
            Keyword::Features => "FEATURES",
        }
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "LOCUS" => Ok(Keyword::Locus),
            "DEFINITION" => Ok(Keyword::Definition),
            "ACCESSION" => Ok(Keyword::Accession),
            "VERSION" => Ok(Keyword::Version),
            "DBLINK" => Ok(Keyword::DbLink),
            "KEYWORDS" => Ok(Keyword::Keywords),
            "SEGMENT" => Ok(Keyword::Segment),
            "SOURCE" => Ok(Keyword::Source),
            "REFERENCE" => Ok(Keyword::Reference),
            "COMMENT" => Ok(Keyword::Comment),
            "CONTIG" => Ok(Keyword::Contig),
            "ORIGIN" => Ok(Keyword::Origin),
            "FEATURES" => Ok(Keyword::Features),
            _ => Err(()),
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Legacy or informational sections that are recognised and skipped.
pub const IGNORED_KEYWORDS: &[&str] = &[
    "BASE COUNT",
    "PROJECT",
    "NID",
    "PRIMARY",
    "WGS",
    "WGS_SCAFLD",
    "TSA",
    "TLS",
];

/// Sub-keywords of a REFERENCE block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceField {
    Authors,
    Consortium,
    Title,
    Journal,
    Medline,
    Pubmed,
    Remark,
}

impl ReferenceField {
    pub fn from_keyword(keyword: &str) -> Option<ReferenceField> {
        match keyword {
            "AUTHORS" => Some(ReferenceField::Authors),
            "CONSRTM" => Some(ReferenceField::Consortium),
            "TITLE" => Some(ReferenceField::Title),
            "JOURNAL" => Some(ReferenceField::Journal),
            "MEDLINE" => Some(ReferenceField::Medline),
            "PUBMED" => Some(ReferenceField::Pubmed),
            "REMARK" => Some(ReferenceField::Remark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceField::Authors => "AUTHORS",
            ReferenceField::Consortium => "CONSRTM",
            ReferenceField::Title => "TITLE",
            ReferenceField::Journal => "JOURNAL",
            ReferenceField::Medline => "MEDLINE",
            ReferenceField::Pubmed => "PUBMED",
            ReferenceField::Remark => "REMARK",
        }
    }

    pub fn slot<'a>(&self, reference: &'a mut Reference) -> &'a mut Option<String> {
        match self {
            ReferenceField::Authors => &mut reference.authors,
            ReferenceField::Consortium => &mut reference.consortium,
            ReferenceField::Title => &mut reference.title,
            ReferenceField::Journal => &mut reference.journal,
            ReferenceField::Medline => &mut reference.medline,
            ReferenceField::Pubmed => &mut reference.pubmed,
            ReferenceField::Remark => &mut reference.remark,
        }
    }
}

///
/// Join free text continuation lines with a single space. Fails if nothing is left.
///
pub fn free_text(values: &[String], line: usize, section: &str) -> Result<String> {
    let text = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return Err(GenbankError::EmptySection {
            line,
            section: section.to_string(),
        });
    }
    Ok(text)
}

///
/// `NAME LENGTH bp [ss-|ds-|ms-]MOLECULE TOPOLOGY DIVISION DD-MON-YYYY`
///
pub fn parse_locus(values: &[String], line: usize) -> Result<Locus> {
    let text = free_text(values, line, "LOCUS")?;
    let tokens: Vec<&str> = text.split_whitespace().collect();

    if tokens.len() != 7 {
        return Err(GenbankError::invalid(
            line,
            "LOCUS",
            format!("expected 7 fields, found {}", tokens.len()),
        ));
    }

    let bp = tokens[1]
        .parse::<u64>()
        .map_err(|_| GenbankError::invalid(line, "LOCUS", format!("bad length {:?}", tokens[1])))?;

    if tokens[2] != "bp" && tokens[2] != "aa" {
        return Err(GenbankError::invalid(
            line,
            "LOCUS",
            format!("expected length unit bp or aa, found {:?}", tokens[2]),
        ));
    }

    let molecule = MOLECULE.captures(tokens[3]).ok_or_else(|| {
        GenbankError::invalid(line, "LOCUS", format!("bad molecule type {:?}", tokens[3]))
    })?;

    if !DIVISION.is_match(tokens[5]) {
        return Err(GenbankError::invalid(
            line,
            "LOCUS",
            format!("bad division code {:?}", tokens[5]),
        ));
    }

    if !DATE.is_match(tokens[6]) {
        return Err(GenbankError::invalid(
            line,
            "LOCUS",
            format!("bad date {:?}", tokens[6]),
        ));
    }

    Ok(Locus {
        name: tokens[0].to_string(),
        bp,
        strandedness: molecule.get(1).map(|m| m.as_str().to_string()),
        molecule_type: molecule[2].to_string(),
        topology: tokens[4].to_string(),
        division_code: tokens[5].to_string(),
        date: tokens[6].to_string(),
    })
}

pub fn parse_accession(values: &[String], line: usize) -> Result<Accession> {
    let text = free_text(values, line, "ACCESSION")?;
    let mut tokens = text.split_whitespace().map(|t| t.to_string());

    let primary = tokens.next().ok_or_else(|| GenbankError::EmptySection {
        line,
        section: "ACCESSION".to_string(),
    })?;

    Ok(Accession {
        primary,
        secondary: tokens.collect(),
    })
}

///
/// `ACCESSION.VERSION`, anything after the first token (old `GI:` numbers) is ignored.
///
pub fn parse_version(values: &[String], line: usize) -> Result<String> {
    let text = free_text(values, line, "VERSION")?;
    let captures = VERSION.captures(&text).ok_or_else(|| {
        GenbankError::invalid(
            line,
            "VERSION",
            format!("expected ACCESSION.VERSION, found {:?}", text),
        )
    })?;

    Ok(format!("{}.{}", &captures[1], &captures[2]))
}

///
/// `Resource: id[,id...]` pairs. Identifier lists may wrap onto the next line
/// after a `,` or `:`; a resource name may wrap before its colon.
///
pub fn parse_dblink(values: &[String], line: usize) -> Result<IndexMap<String, Vec<String>>> {
    let mut links: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut resource: Option<String> = None;
    let mut partial_resource: Option<String> = None;
    let mut expecting_ids = false;

    let push_ids = |links: &mut IndexMap<String, Vec<String>>, resource: &str, ids: &str| {
        let entry = links.entry(resource.to_string()).or_default();
        entry.extend(
            ids.split(',')
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(|id| id.to_string()),
        );
    };

    for (offset, value) in values.iter().enumerate() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let line = line + offset;

        let continues_ids = resource.is_some() && (expecting_ids || value.starts_with(','));

        if continues_ids {
            if let Some(current) = &resource {
                push_ids(&mut links, current, value);
            }
        } else if let Some((name, ids)) = value.split_once(':') {
            let name = match partial_resource.take() {
                Some(prefix) => format!("{} {}", prefix, name.trim()).trim().to_string(),
                None => name.trim().to_string(),
            };
            if name.is_empty() {
                return Err(GenbankError::invalid(
                    line,
                    "DBLINK",
                    format!("missing resource name in {:?}", value),
                ));
            }
            push_ids(&mut links, &name, ids);
            resource = Some(name);
        } else if value.starts_with(',') {
            return Err(GenbankError::invalid(
                line,
                "DBLINK",
                format!("identifier list without a resource: {:?}", value),
            ));
        } else {
            partial_resource = Some(match partial_resource.take() {
                Some(prefix) => format!("{} {}", prefix, value),
                None => value.to_string(),
            });
        }

        expecting_ids = value.ends_with(',') || value.ends_with(':');
    }

    if let Some(partial) = partial_resource {
        return Err(GenbankError::invalid(
            line,
            "DBLINK",
            format!("resource {:?} has no identifiers", partial),
        ));
    }

    if links.is_empty() {
        return Err(GenbankError::EmptySection {
            line,
            section: "DBLINK".to_string(),
        });
    }

    for (resource, ids) in &links {
        if ids.is_empty() {
            warn!("DBLINK resource {} has no identifiers", resource);
        }
    }

    Ok(links)
}

///
/// `;`-separated keywords with a terminating `.`; a lone `.` means "no keywords".
///
pub fn parse_keywords(values: &[String], line: usize) -> Result<Vec<String>> {
    let text = free_text(values, line, "KEYWORDS")?;
    let text = text.strip_suffix('.').unwrap_or(&text);

    Ok(text
        .split(';')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| k.to_string())
        .collect())
}

/// `N of M`
pub fn parse_segment(values: &[String], line: usize) -> Result<Segment> {
    let text = free_text(values, line, "SEGMENT")?;
    let captures = SEGMENT.captures(&text).ok_or_else(|| {
        GenbankError::invalid(line, "SEGMENT", format!("expected 'N of M', found {:?}", text))
    })?;

    let number: u32 = captures[1]
        .parse()
        .map_err(|_| GenbankError::invalid(line, "SEGMENT", "segment number out of range"))?;
    let total: u32 = captures[2]
        .parse()
        .map_err(|_| GenbankError::invalid(line, "SEGMENT", "segment total out of range"))?;

    if number == 0 || number > total {
        return Err(GenbankError::invalid(
            line,
            "SEGMENT",
            format!("segment {} of {} is out of range", number, total),
        ));
    }

    Ok(Segment { number, total })
}

///
/// First line is the formal organism name, the remaining lines are the
/// `;`-separated lineage ending with a `.`.
///
pub fn parse_organism(values: &[String], line: usize) -> Result<(String, Vec<String>)> {
    let formal_name = values
        .first()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GenbankError::EmptySection {
            line,
            section: "ORGANISM".to_string(),
        })?;

    let lineage = values.iter().skip(1).map(|v| v.trim()).collect::<Vec<_>>().join(" ");
    let lineage = lineage.trim().strip_suffix('.').unwrap_or(lineage.trim());

    let ranks = lineage
        .split(';')
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(|r| r.to_string())
        .collect();

    Ok((formal_name, ranks))
}

/// `N  (bases 1 to 100)`
pub fn parse_reference_header(values: &[String], line: usize) -> Result<Reference> {
    let text = free_text(values, line, "REFERENCE")?;
    let captures = REFERENCE.captures(&text).ok_or_else(|| {
        GenbankError::invalid(line, "REFERENCE", format!("expected a number, found {:?}", text))
    })?;

    let number = captures[1]
        .parse()
        .map_err(|_| GenbankError::invalid(line, "REFERENCE", "reference number out of range"))?;

    Ok(Reference {
        number,
        notes: captures.get(2).map(|m| m.as_str().trim().to_string()),
        ..Default::default()
    })
}

///
/// Sequence lines with their position numbers and spacing removed; letter case
/// is preserved.
///
pub fn parse_origin(values: &[String], line: usize) -> Result<String> {
    // the ORIGIN line itself may carry a free text note, which is not sequence
    let sequence: String = values
        .iter()
        .skip(1)
        .flat_map(|v| v.chars())
        .filter(|c| !c.is_ascii_digit() && !c.is_whitespace())
        .collect();

    if sequence.is_empty() {
        return Err(GenbankError::EmptySection {
            line,
            section: "ORIGIN".to_string(),
        });
    }
    Ok(sequence)
}

pub fn parse_contig(values: &[String], line: usize) -> Result<String> {
    let contig: String = values.iter().map(|v| v.trim()).collect();
    if contig.is_empty() {
        return Err(GenbankError::EmptySection {
            line,
            section: "CONTIG".to_string(),
        });
    }
    Ok(contig)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn lines(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[rstest]
    fn test_parse_locus() {
        let locus = parse_locus(
            &lines(&["NC_000913            4641652 bp    DNA     circular CON 09-MAR-2016"]),
            1,
        )
        .unwrap();
        assert_eq!(locus.name, "NC_000913");
        assert_eq!(locus.bp, 4641652);
        assert_eq!(locus.strandedness, None);
        assert_eq!(locus.molecule_type, "DNA");
        assert_eq!(locus.topology, "circular");
        assert_eq!(locus.division_code, "CON");
        assert_eq!(locus.date, "09-MAR-2016");
    }

    #[rstest]
    fn test_parse_locus_strandedness() {
        let locus =
            parse_locus(&lines(&["AB000001  120 bp ss-RNA linear VRL 01-JAN-2001"]), 1).unwrap();
        assert_eq!(locus.strandedness, Some("ss".to_string()));
        assert_eq!(locus.molecule_type, "RNA");
    }

    #[rstest]
    #[case("NC_1 100 bp DNA circular BCT")]
    #[case("NC_1 x bp DNA circular BCT 01-JAN-2001")]
    #[case("NC_1 100 nt DNA circular BCT 01-JAN-2001")]
    #[case("NC_1 100 bp DNA circular bacteria 01-JAN-2001")]
    #[case("NC_1 100 bp DNA circular BCT 2001-01-01")]
    #[case("NC_1 100 bp DNA circular BCT 01-JAN-2001 extra")]
    fn test_parse_locus_errors(#[case] text: &str) {
        assert!(parse_locus(&lines(&[text]), 1).is_err());
    }

    #[rstest]
    #[case("NC_000913.3", "NC_000913.3")]
    #[case("NC_000913.3  GI:556503834", "NC_000913.3")]
    fn test_parse_version(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(parse_version(&lines(&[text]), 1).unwrap(), expected);
    }

    #[rstest]
    #[case("NC_000913")]
    #[case("NC_000913.0")]
    #[case("NC_000913.x")]
    #[case(".3")]
    fn test_parse_version_errors(#[case] text: &str) {
        assert!(parse_version(&lines(&[text]), 1).is_err());
    }

    #[rstest]
    fn test_parse_accession() {
        let accession = parse_accession(&lines(&["NC_000913 AE000111 AE000112"]), 1).unwrap();
        assert_eq!(accession.primary, "NC_000913");
        assert_eq!(accession.secondary, vec!["AE000111", "AE000112"]);
    }

    #[rstest]
    fn test_parse_dblink() {
        let links = parse_dblink(
            &lines(&[
                "BioProject: PRJNA57779",
                "BioSample: SAMN02604091, SAMN02604092,",
                "SAMN02604093",
                "Assembly: GCF_000005845.2",
            ]),
            1,
        )
        .unwrap();
        assert_eq!(links["BioProject"], vec!["PRJNA57779"]);
        assert_eq!(
            links["BioSample"],
            vec!["SAMN02604091", "SAMN02604092", "SAMN02604093"]
        );
        assert_eq!(links["Assembly"], vec!["GCF_000005845.2"]);
    }

    #[rstest]
    fn test_parse_dblink_wrapped_resource_and_leading_comma() {
        let links = parse_dblink(
            &lines(&["Sequence Read", "Archive: SRR1, SRR2", ",SRR3"]),
            1,
        )
        .unwrap();
        assert_eq!(links["Sequence Read Archive"], vec!["SRR1", "SRR2", "SRR3"]);

        let links = parse_dblink(&lines(&["Sequence Read", ": SRR1"]), 1).unwrap();
        assert_eq!(links["Sequence Read"], vec!["SRR1"]);
    }

    #[rstest]
    #[case(&[": PRJNA1"])]
    #[case(&[",PRJNA1"])]
    #[case(&["BioProject"])]
    #[case(&[""])]
    fn test_parse_dblink_errors(#[case] values: &[&str]) {
        assert!(parse_dblink(&lines(values), 1).is_err());
    }

    #[rstest]
    #[case(&["RefSeq; complete genome."], vec!["RefSeq", "complete genome"])]
    #[case(&["."], vec![])]
    #[case(&["GSS; single", "pass."], vec!["GSS", "single pass"])]
    fn test_parse_keywords(#[case] values: &[&str], #[case] expected: Vec<&str>) {
        assert_eq!(parse_keywords(&lines(values), 1).unwrap(), expected);
    }

    #[rstest]
    fn test_parse_segment() {
        assert_eq!(
            parse_segment(&lines(&["2 of 6"]), 1).unwrap(),
            Segment { number: 2, total: 6 }
        );
        assert!(parse_segment(&lines(&["7 of 6"]), 1).is_err());
        assert!(parse_segment(&lines(&["two of six"]), 1).is_err());
    }

    #[rstest]
    fn test_parse_organism() {
        let (name, ranks) = parse_organism(
            &lines(&[
                "Escherichia coli str. K-12 substr. MG1655",
                "Bacteria; Proteobacteria; Gammaproteobacteria; Enterobacterales;",
                "Enterobacteriaceae; Escherichia.",
            ]),
            1,
        )
        .unwrap();
        assert_eq!(name, "Escherichia coli str. K-12 substr. MG1655");
        assert_eq!(
            ranks,
            vec![
                "Bacteria",
                "Proteobacteria",
                "Gammaproteobacteria",
                "Enterobacterales",
                "Enterobacteriaceae",
                "Escherichia"
            ]
        );
    }

    #[rstest]
    fn test_parse_reference_header() {
        let reference = parse_reference_header(&lines(&["1  (bases 1 to 4641652)"]), 1).unwrap();
        assert_eq!(reference.number, 1);
        assert_eq!(reference.notes, Some("(bases 1 to 4641652)".to_string()));

        let reference = parse_reference_header(&lines(&["2"]), 1).unwrap();
        assert_eq!(reference.notes, None);
    }

    #[rstest]
    fn test_parse_origin() {
        let origin = parse_origin(
            &lines(&["", "1 agcttttcat tctgactgca", "21 acgGGCaata"]),
            1,
        )
        .unwrap();
        assert_eq!(origin, "agcttttcattctgactgcaacgGGCaata");
        assert!(parse_origin(&lines(&[""]), 1).is_err());
    }

    #[rstest]
    fn test_free_text_rejects_blank() {
        assert!(matches!(
            free_text(&lines(&["", "  "]), 3, "COMMENT"),
            Err(GenbankError::EmptySection { line: 3, .. })
        ));
    }
}
