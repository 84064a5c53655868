use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use pretty_assertions::assert_eq;
use rstest::*;

use gbkit_genbank::{GenbankError, GenbankReader, GenbankRecord, QualifierValue, parse_str};

#[fixture]
fn path_to_data() -> &'static str {
    "tests/data"
}

#[fixture]
fn thr_operon(path_to_data: &str) -> PathBuf {
    Path::new(path_to_data).join("thr_operon.gb")
}

fn read_single(path: &Path) -> GenbankRecord {
    let mut records: Vec<_> = GenbankReader::new(BufReader::new(File::open(path).unwrap()))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records.len(), 1);
    records.remove(0)
}

#[rstest]
fn test_header_sections(thr_operon: PathBuf) {
    let record = read_single(&thr_operon);

    let locus = record.locus.as_ref().unwrap();
    assert_eq!(locus.name, "NC_TEST01");
    assert_eq!(locus.bp, 120);
    assert_eq!(locus.molecule_type, "DNA");
    assert_eq!(locus.strandedness, None);
    assert_eq!(locus.topology, "circular");
    assert_eq!(locus.division_code, "CON");
    assert_eq!(locus.date, "11-OCT-2018");

    assert_eq!(
        record.definition.as_deref(),
        Some("Escherichia coli str. K-12 substr. MG1655, thr operon fragment for parser tests.")
    );
    let accession = record.accession.as_ref().unwrap();
    assert_eq!(accession.primary, "NC_TEST01");
    assert_eq!(accession.secondary, vec!["NC_OLD01"]);
    assert_eq!(record.version.as_deref(), Some("NC_TEST01.3"));

    assert_eq!(record.db_link["BioProject"], vec!["PRJNA57779"]);
    assert_eq!(record.db_link["BioSample"], vec!["SAMN02604091"]);
    assert_eq!(record.keywords, vec!["RefSeq", "complete genome"]);
    assert_eq!(record.segment, None);

    let source = record.source.as_ref().unwrap();
    assert_eq!(
        source.common_name.as_deref(),
        Some("Escherichia coli str. K-12 substr. MG1655")
    );
    assert_eq!(source.taxonomic_ranks.len(), 6);
    assert_eq!(source.taxonomic_ranks.last().unwrap(), "Escherichia");

    assert!(record.comment.as_deref().unwrap().starts_with("PROVISIONAL REFSEQ"));
    assert_eq!(record.contig, None);
    assert_eq!(record.origin.as_ref().unwrap().len(), 120);
}

#[rstest]
fn test_references(thr_operon: PathBuf) {
    let record = read_single(&thr_operon);
    assert_eq!(record.references.len(), 2);

    let first = &record.references[0];
    assert_eq!(first.number, 1);
    assert_eq!(first.notes.as_deref(), Some("(bases 1 to 120)"));
    assert!(first.authors.as_deref().unwrap().ends_with("and Glasner,J.D."));
    assert_eq!(
        first.title.as_deref(),
        Some("Escherichia coli K-12: a cooperatively developed annotation snapshot--2005")
    );
    assert_eq!(first.pubmed.as_deref(), Some("16397293"));
    assert_eq!(first.remark.as_deref(), Some("Publication Status: Online-Only"));

    let second = &record.references[1];
    assert_eq!(second.consortium.as_deref(), Some("NCBI Genome Project"));
    assert_eq!(second.authors, None);
    assert_eq!(second.pubmed, None);
}

#[rstest]
fn test_feature_table(thr_operon: PathBuf) {
    let record = read_single(&thr_operon);
    let keys: Vec<&str> = record.features.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["source", "gene", "CDS", "misc_feature"]);

    let gene = &record.features[1];
    assert_eq!(gene.location, "10..75");
    assert_eq!(gene.texts("db_xref"), vec!["EcoGene:EG11277", "GeneID:944742"]);

    let cds = &record.features[2];
    assert_eq!(cds.qualifiers["transl_table"], vec![QualifierValue::Integer(11)]);
    assert_eq!(cds.first_text("translation").as_deref(), Some("MKRISTTITTTITITTGNGAG"));

    let misc = &record.features[3];
    assert_eq!(misc.location, "complement(join(100..110,115..118))");
    assert_eq!(
        misc.first_text("note").as_deref(),
        Some("a \"quoted\" remark that wraps onto a second line")
    );
    assert_eq!(misc.qualifiers["experiment"], vec![QualifierValue::Boolean(true)]);
}

#[rstest]
fn test_multiple_records(path_to_data: &str) {
    let path = Path::new(path_to_data).join("two_records.gb");
    let records: Vec<GenbankRecord> = GenbankReader::from_path(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].segment.unwrap().number, 1);
    assert_eq!(records[1].segment.unwrap().total, 2);

    let locus = records[1].locus.as_ref().unwrap();
    assert_eq!(locus.strandedness.as_deref(), Some("ss"));
    assert_eq!(locus.molecule_type, "RNA");
    assert_eq!(records[1].origin.as_deref(), Some("acguacgu"));
}

#[rstest]
fn test_gzip_input(thr_operon: PathBuf) {
    let tempdir = tempfile::tempdir().unwrap();
    let gz_path = tempdir.path().join("thr_operon.gb.gz");

    let mut encoder = GzEncoder::new(File::create(&gz_path).unwrap(), Compression::default());
    encoder
        .write_all(&std::fs::read(&thr_operon).unwrap())
        .unwrap();
    encoder.finish().unwrap();

    let records: Vec<GenbankRecord> = GenbankReader::from_path(&gz_path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(records, vec![read_single(&thr_operon)]);
}

#[rstest]
fn test_missing_file() {
    assert!(GenbankReader::from_path(Path::new("tests/data/does_not_exist.gb")).is_err());
}

#[rstest]
fn test_no_terminator_is_an_error() {
    assert!(matches!(
        parse_str("DEFINITION  never terminated.\n"),
        Err(GenbankError::MissingTerminator)
    ));
}

#[rstest]
fn test_lone_terminator_yields_empty_record() {
    let records = parse_str("//\n").unwrap();
    assert_eq!(records, vec![GenbankRecord::default()]);
}

#[rstest]
fn test_two_terminators_yield_two_records() {
    assert_eq!(parse_str("//\n//\n").unwrap().len(), 2);
}

#[rstest]
#[case("LOCUS       A                         10 bp    DNA     linear   BCT 01-JAN-2020")]
#[case("DEFINITION  Something.")]
#[case("ACCESSION   A00001")]
#[case("VERSION     A00001.1")]
#[case("KEYWORDS    .")]
#[case("SEGMENT     1 of 1")]
#[case("SOURCE      Escherichia coli")]
#[case("COMMENT     Some comment.")]
#[case("CONTIG      join(A00001.1:1..10)")]
#[case("DBLINK      BioProject: PRJNA1")]
#[case("ORIGIN\n        1 acgt")]
fn test_duplicate_sections_are_errors(#[case] section: &str) {
    let text = format!("{}\n{}\n//\n", section, section);
    assert!(matches!(
        parse_str(&text),
        Err(GenbankError::DuplicateSection { .. })
    ));
}

#[rstest]
fn test_repeatable_sections() {
    let text = "REFERENCE   1\nREFERENCE   2\nFEATURES             Location/Qualifiers\n     gene            1..2\nFEATURES             Location/Qualifiers\n     gene            3..4\n//\n";
    let record = parse_str(text).unwrap().remove(0);
    assert_eq!(record.references.len(), 2);
    assert_eq!(record.features.len(), 2);
}

#[rstest]
#[case("LOCUS       A   10 bp DNA linear BCT\n//\n")]
#[case("LOCUS       A   ten bp DNA linear BCT 01-JAN-2020\n//\n")]
#[case("LOCUS       A   10 nt DNA linear BCT 01-JAN-2020\n//\n")]
#[case("LOCUS       A   10 bp DNA linear bct 01-JAN-2020\n//\n")]
#[case("LOCUS       A   10 bp DNA linear BCT 2020-01-01\n//\n")]
#[case("VERSION     A00001\n//\n")]
#[case("VERSION     A00001.0\n//\n")]
#[case("SEGMENT     3 of 2\n//\n")]
#[case("DEFINITION\n//\n")]
#[case("DBLINK      , PRJNA1\n//\n")]
#[case("REFERENCE   one\n//\n")]
#[case("FEATURES             Location/Qualifiers\n     gene            1..2\n                     /note=\"open\n//\n")]
fn test_invalid_sections(#[case] text: &str) {
    assert!(parse_str(text).is_err());
}
