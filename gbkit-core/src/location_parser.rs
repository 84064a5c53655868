//! Recursive descent parser for GenBank feature location strings.
//!
//! ```text
//! location     := simple | 'complement(' location ')' | 'join(' locationList ')' | 'order(' locationList ')'
//! locationList := location (',' location)*
//! simple       := [accession ':']? point ['..' point]?
//! point        := digits | '<' digits | '>' digits | digits '.' digits | digits '^' digits
//! ```
//!
//! The scan is a single left-to-right pass with no backtracking; the first
//! problem aborts the parse.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{LocationError, Result};
use crate::models::point::{Fuzziness, LocationPoint};
use crate::models::location::Location;

static EXACT_POINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static TWO_PART_POINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)([.^])(\d+)$").unwrap());
static FUZZY_POINT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([<>])(\d+)$").unwrap());

const COMPLEMENT: &str = "complement(";
const JOIN: &str = "join(";
const ORDER: &str = "order(";

/// Deepest nesting of `complement(`/`join(` accepted.
pub const MAX_DEPTH: usize = 64;

///
/// Parse a GenBank location string such as `join(1..5,complement(10..20))`.
///
/// # Arguments
/// - text: the raw location text; embedded whitespace (from line wrapping) is ignored
pub fn parse_location(text: &str) -> Result<Location> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parser = LocationParser {
        text: &compact,
        pos: 0,
        depth: 0,
    };

    let location = parser.parse_location()?;
    if parser.pos != compact.len() {
        return Err(parser.malformed("unexpected trailing text"));
    }
    Ok(location)
}

///
/// Convert the text of a single location point into a [LocationPoint].
///
/// Returns `Ok(None)` when the text does not look like any kind of point; the
/// caller decides how to report that.
pub fn parse_point(text: &str) -> Result<Option<LocationPoint>> {
    if EXACT_POINT.is_match(text) {
        return LocationPoint::exact(parse_position(text)?).map(Some);
    }

    if let Some(captures) = TWO_PART_POINT.captures(text) {
        let start = parse_position(&captures[1])?;
        let stop = parse_position(&captures[3])?;
        return match &captures[2] {
            "^" => LocationPoint::between(start, stop).map(Some),
            _ => LocationPoint::bounded(start, stop).map(Some),
        };
    }

    if let Some(captures) = FUZZY_POINT.captures(text) {
        let fuzziness = match &captures[1] {
            "<" => Fuzziness::Before,
            _ => Fuzziness::After,
        };
        return LocationPoint::fuzzy(parse_position(&captures[2])?, fuzziness).map(Some);
    }

    Ok(None)
}

fn parse_position(digits: &str) -> Result<u64> {
    digits
        .parse::<u64>()
        .map_err(|_| LocationError::InvalidPoint(digits.to_string()))
}

fn require_point(text: &str) -> Result<LocationPoint> {
    parse_point(text)?.ok_or_else(|| LocationError::InvalidPoint(text.to_string()))
}

struct LocationParser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LocationParser<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn malformed(&self, reason: &str) -> LocationError {
        LocationError::Malformed {
            location: self.text.to_string(),
            reason: format!("{} at offset {}", reason, self.pos),
        }
    }

    fn parse_location(&mut self) -> Result<Location> {
        let rest = self.rest();

        if rest.starts_with(COMPLEMENT) {
            self.pos += COMPLEMENT.len();
            let mut children = self.parse_nested()?;
            if children.len() != 1 {
                return Err(LocationError::ComplementArity(self.text.to_string()));
            }
            return Ok(Location::complement(children.remove(0)));
        }

        if rest.starts_with(JOIN) {
            self.pos += JOIN.len();
            let children = self.parse_nested()?;
            return Location::join(children);
        }

        if rest.starts_with(ORDER) {
            return Err(LocationError::NotImplemented("order".to_string()));
        }

        self.parse_simple()
    }

    fn parse_nested(&mut self) -> Result<Vec<Location>> {
        if self.depth == MAX_DEPTH {
            return Err(self.malformed(&format!("nesting deeper than {}", MAX_DEPTH)));
        }
        self.depth += 1;
        let children = self.parse_list()?;
        self.expect_close()?;
        self.depth -= 1;
        Ok(children)
    }

    fn parse_list(&mut self) -> Result<Vec<Location>> {
        let mut children = vec![self.parse_location()?];
        while self.rest().starts_with(',') {
            self.pos += 1;
            children.push(self.parse_location()?);
        }
        Ok(children)
    }

    fn expect_close(&mut self) -> Result<()> {
        if !self.rest().starts_with(')') {
            return Err(self.malformed("expected ')'"));
        }
        self.pos += 1;
        Ok(())
    }

    fn parse_simple(&mut self) -> Result<Location> {
        let rest = self.rest();
        let end = rest
            .find(|c: char| matches!(c, ',' | '(' | ')'))
            .unwrap_or(rest.len());
        let token = &rest[..end];

        if rest[end..].starts_with('(') {
            return Err(self.malformed(&format!("unknown location operator {:?}", token)));
        }
        if token.is_empty() {
            return Err(self.malformed("empty location"));
        }
        self.pos += end;

        let (accession, span) = match token.split_once(':') {
            Some((accession, span)) if !accession.is_empty() => (Some(accession), span),
            Some(_) => return Err(self.malformed("empty accession")),
            None => (None, token),
        };

        let (start, stop) = match span.split_once("..") {
            Some((start, stop)) => (require_point(start)?, require_point(stop)?),
            None => {
                let point = require_point(span)?;
                (point.clone(), point)
            }
        };

        Ok(match accession {
            Some(accession) => Location::on_accession(start, stop, accession),
            None => Location::simple(start, stop),
        })
    }
}
