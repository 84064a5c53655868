use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use gbkit_genbank::GenbankError;

/// Output flags shared by every subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub pretty: bool,
    pub skip_invalid: bool,
}

impl OutputOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        OutputOptions {
            pretty: matches.get_flag("pretty"),
            skip_invalid: matches.get_flag("skip-invalid"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
}

impl RunSummary {
    ///
    /// Decide what to do with a failed record: count it when skipping is
    /// enabled, otherwise hand the error back. I/O errors are never skipped.
    ///
    pub fn skip_or_fail(&mut self, err: anyhow::Error, options: &OutputOptions) -> Result<()> {
        let is_io = err
            .downcast_ref::<GenbankError>()
            .is_some_and(|e| matches!(e, GenbankError::Io(_)))
            || err.downcast_ref::<io::Error>().is_some();

        if options.skip_invalid && !is_io {
            log::warn!("Skipping record: {:#}", err);
            self.skipped += 1;
            return Ok(());
        }
        Err(err)
    }
}

///
/// Open the output destination: a file when a path is given, stdout otherwise.
///
pub fn open_output(path: Option<&String>) -> Result<BufWriter<Box<dyn Write>>> {
    let writer: Box<dyn Write> = match path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    Ok(BufWriter::new(writer))
}

/// Write one value as a line of JSON.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
    match pretty {
        true => serde_json::to_writer_pretty(&mut *out, value)?,
        false => serde_json::to_writer(&mut *out, value)?,
    }
    writeln!(out)?;
    Ok(())
}

pub fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} records)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
