use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::ProgressBar;
use log::{debug, info};

use gbkit_adapter::{AdapterConfig, GenbankAdapter};
use gbkit_core::utils::get_dynamic_reader;
use gbkit_genbank::{GenbankReader, GenbankRecord};

use crate::output::{OutputOptions, RunSummary, create_spinner, open_output, write_json};

type RecordIter = Box<dyn Iterator<Item = Result<GenbankRecord>>>;

pub fn run_adapt(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to an input file is required.");
    let options = OutputOptions::from_matches(matches);

    let config = match matches.get_one::<String>("config") {
        Some(path) => AdapterConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load adapter config: {}", path))?,
        None => AdapterConfig::default(),
    };
    debug!("Adapter config: {:?}", config);

    let records = open_records(Path::new(input))?;
    let mut adapter = GenbankAdapter::new(config);
    let mut out = open_output(matches.get_one::<String>("output"))?;

    let progress = create_spinner(format!("Adapting {}", input));
    let summary = adapt_records(records, &mut adapter, &mut out, &options, &progress)?;
    progress.finish_and_clear();

    out.flush()?;
    info!(
        "Adapted {} records from {} ({} skipped)",
        summary.written, input, summary.skipped
    );
    Ok(())
}

/// `.jsonl`, `.json` (and their `.gz` forms) hold records written by `parse`.
fn is_json_lines(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    name.ends_with(".jsonl") || name.ends_with(".json")
}

fn open_records(path: &Path) -> Result<RecordIter> {
    if !is_json_lines(path) {
        let reader = GenbankReader::from_path(path)?;
        return Ok(Box::new(reader.map(|r| r.map_err(anyhow::Error::from))));
    }

    let reader = get_dynamic_reader(path)?;
    Ok(Box::new(json_records(reader)))
}

fn json_records<R: BufRead + 'static>(reader: R) -> impl Iterator<Item = Result<GenbankRecord>> {
    reader
        .lines()
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .map(|(index, line)| {
            let line = line?;
            serde_json::from_str(&line)
                .with_context(|| format!("Invalid JSON record on line {}", index + 1))
        })
}

///
/// Adapt every record and write the results to `out` as JSON.
///
pub fn adapt_records<I, W>(
    records: I,
    adapter: &mut GenbankAdapter,
    out: &mut W,
    options: &OutputOptions,
    progress: &ProgressBar,
) -> Result<RunSummary>
where
    I: Iterator<Item = Result<GenbankRecord>>,
    W: Write,
{
    let mut summary = RunSummary::default();

    for (index, record) in records.enumerate() {
        let adapted = record.and_then(|record| {
            let name = record
                .locus
                .as_ref()
                .map(|l| l.name.clone())
                .unwrap_or_else(|| format!("#{}", index + 1));
            adapter
                .format_ref_seq(&record)
                .with_context(|| format!("Failed to adapt record {}", name))
        });

        match adapted {
            Ok(adapted) => {
                write_json(out, &adapted, options.pretty)?;
                summary.written += 1;
            }
            Err(e) => summary.skip_or_fail(e, options)?,
        }
        progress.inc(1);
    }

    Ok(summary)
}
