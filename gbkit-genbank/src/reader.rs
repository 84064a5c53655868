use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use gbkit_core::utils::get_dynamic_reader;

use crate::errors::{GenbankError, Result};
use crate::models::GenbankRecord;
use crate::parser::GenbankStreamParser;

///
/// Iterator over the records of a GenBank flat file.
///
/// Errors do not end iteration: a record that fails to parse is yielded as an
/// `Err` and the reader moves on to the next record. An I/O error is final.
///
pub struct GenbankReader<R> {
    reader: R,
    parser: GenbankStreamParser,
    buffer: String,
    done: bool,
}

impl<R: BufRead> GenbankReader<R> {
    pub fn new(reader: R) -> Self {
        GenbankReader {
            reader,
            parser: GenbankStreamParser::new(),
            buffer: String::new(),
            done: false,
        }
    }
}

impl GenbankReader<BufReader<Box<dyn Read>>> {
    ///
    /// Open a GenBank file, gzip'd or not, by path.
    ///
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        Ok(GenbankReader::new(get_dynamic_reader(path)?))
    }
}

impl<R: BufRead> Iterator for GenbankReader<R> {
    type Item = Result<GenbankRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => {
                    self.done = true;
                    return self.parser.finish().transpose();
                }
                Ok(_) => {
                    if let Some(result) = self.parser.push_line(&self.buffer).transpose() {
                        return Some(result);
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(GenbankError::Io(e)));
                }
            }
        }
        None
    }
}

///
/// Parse every record in an in-memory GenBank text, stopping at the first error.
///
pub fn parse_str(text: &str) -> Result<Vec<GenbankRecord>> {
    GenbankReader::new(text.as_bytes()).collect()
}
