use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::ProgressBar;
use log::info;

use gbkit_genbank::GenbankReader;

use crate::output::{OutputOptions, RunSummary, create_spinner, open_output, write_json};

pub fn run_parse(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to a GenBank file is required.");
    let options = OutputOptions::from_matches(matches);

    let reader = GenbankReader::from_path(Path::new(input))?;
    let mut out = open_output(matches.get_one::<String>("output"))?;

    let progress = create_spinner(format!("Parsing {}", input));
    let summary = parse_records(reader, &mut out, &options, &progress)?;
    progress.finish_and_clear();

    out.flush()?;
    info!(
        "Parsed {} records from {} ({} skipped)",
        summary.written, input, summary.skipped
    );
    Ok(())
}

///
/// Stream every record of `reader` to `out` as JSON.
///
pub fn parse_records<R: BufRead, W: Write>(
    reader: GenbankReader<R>,
    out: &mut W,
    options: &OutputOptions,
    progress: &ProgressBar,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, record) in reader.enumerate() {
        match record.with_context(|| format!("Failed to parse record #{}", index + 1)) {
            Ok(record) => {
                write_json(out, &record, options.pretty)?;
                summary.written += 1;
            }
            Err(e) => summary.skip_or_fail(e, options)?,
        }
        progress.inc(1);
    }

    Ok(summary)
}
