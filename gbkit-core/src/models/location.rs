use std::fmt::{self, Display};

use crate::errors::{LocationError, Result};
use crate::models::point::LocationPoint;
use crate::models::sequence::Sequence;
use crate::traits::{Bounded, Strand};

///
/// A contiguous span between two points, optionally on another accession
/// (`J00194.1:100..202`).
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct SimpleLocation {
    pub start: LocationPoint,
    pub stop: LocationPoint,
    pub accession: Option<String>,
}

///
/// Location tree parsed from a GenBank feature location.
///
/// Simple spans are on the forward strand, complements flip to the reverse
/// strand and reverse complement their transcript, and joins concatenate their
/// children in order.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub enum Location {
    Simple(SimpleLocation),
    Complement(Box<Location>),
    Join(Vec<Location>),
}

impl Location {
    pub fn simple(start: LocationPoint, stop: LocationPoint) -> Location {
        Location::Simple(SimpleLocation {
            start,
            stop,
            accession: None,
        })
    }

    pub fn on_accession(start: LocationPoint, stop: LocationPoint, accession: &str) -> Location {
        Location::Simple(SimpleLocation {
            start,
            stop,
            accession: Some(accession.to_string()),
        })
    }

    pub fn complement(location: Location) -> Location {
        Location::Complement(Box::new(location))
    }

    pub fn join(children: Vec<Location>) -> Result<Location> {
        if children.is_empty() {
            return Err(LocationError::Malformed {
                location: "join()".to_string(),
                reason: "join requires at least one child".to_string(),
            });
        }
        Ok(Location::Join(children))
    }

    pub fn strand(&self) -> Strand {
        match self {
            Location::Complement(_) => Strand::Reverse,
            Location::Simple(_) | Location::Join(_) => Strand::Forward,
        }
    }

    ///
    /// Number of bases covered by this location.
    ///
    /// # Arguments
    /// - is_circular: whether the underlying sequence is circular
    /// - seq_length: length of the underlying sequence
    pub fn length(&self, is_circular: bool, seq_length: u64) -> Result<u64> {
        match self {
            Location::Simple(_) => {
                span_length(self.lower_bound(), self.upper_bound(), is_circular, seq_length)
            }
            Location::Complement(inner) => inner.length(is_circular, seq_length),
            Location::Join(children) => children
                .iter()
                .map(|child| child.length(is_circular, seq_length))
                .sum(),
        }
    }

    ///
    /// Whether any base of this location's outer span is shared with `other`'s.
    /// Wrapping spans are split at the origin before comparing.
    ///
    pub fn overlaps(&self, other: &Location, is_circular: bool, seq_length: u64) -> Result<bool> {
        let ours = segments(self, is_circular, seq_length)?;
        let theirs = segments(other, is_circular, seq_length)?;

        Ok(ours.iter().any(|(a_start, a_stop)| {
            theirs
                .iter()
                .any(|(b_start, b_stop)| a_start <= b_stop && b_start <= a_stop)
        }))
    }

    ///
    /// Extract the bases this location describes from `seq`.
    ///
    pub fn transcript_from(&self, seq: &Sequence) -> Result<Sequence> {
        match self {
            Location::Simple(simple) => {
                if let Some(accession) = &simple.accession {
                    return Err(LocationError::ExternalAccession(accession.clone()));
                }
                transcribe_span(seq, simple.start.lower_bound(), simple.stop.upper_bound())
            }
            Location::Complement(inner) => Ok(inner.transcript_from(seq)?.reverse_complement()),
            Location::Join(children) => {
                let mut transcript = Sequence::default();
                for child in children {
                    transcript.push_sequence(&child.transcript_from(seq)?);
                }
                Ok(transcript)
            }
        }
    }
}

impl Bounded for Location {
    fn lower_bound(&self) -> u64 {
        match self {
            Location::Simple(simple) => simple.start.lower_bound(),
            Location::Complement(inner) => inner.lower_bound(),
            Location::Join(children) => children.first().map_or(0, |c| c.lower_bound()),
        }
    }

    fn upper_bound(&self) -> u64 {
        match self {
            Location::Simple(simple) => simple.stop.upper_bound(),
            Location::Complement(inner) => inner.upper_bound(),
            Location::Join(children) => children.last().map_or(0, |c| c.upper_bound()),
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Simple(simple) => {
                if let Some(accession) = &simple.accession {
                    write!(f, "{}:", accession)?;
                }
                if simple.start == simple.stop {
                    write!(f, "{}", simple.start)
                } else {
                    write!(f, "{}..{}", simple.start, simple.stop)
                }
            }
            Location::Complement(inner) => write!(f, "complement({})", inner),
            Location::Join(children) => {
                write!(f, "join(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn check_bounds(lower: u64, upper: u64, seq_length: u64) -> Result<()> {
    for bound in [lower, upper] {
        if bound > seq_length {
            return Err(LocationError::BoundExceedsLength {
                bound,
                length: seq_length,
            });
        }
    }
    Ok(())
}

fn span_length(lower: u64, upper: u64, is_circular: bool, seq_length: u64) -> Result<u64> {
    check_bounds(lower, upper, seq_length)?;

    if lower <= upper {
        return Ok(upper - lower + 1);
    }
    if !is_circular {
        return Err(LocationError::WrapsLinearSequence { lower, upper });
    }
    Ok((seq_length - lower + 1) + upper)
}

fn segments(location: &Location, is_circular: bool, seq_length: u64) -> Result<Vec<(u64, u64)>> {
    let (lower, upper) = (location.lower_bound(), location.upper_bound());
    check_bounds(lower, upper, seq_length)?;

    if lower <= upper {
        return Ok(vec![(lower, upper)]);
    }
    if !is_circular {
        return Err(LocationError::WrapsLinearSequence { lower, upper });
    }
    Ok(vec![(lower, seq_length), (1, upper)])
}

fn transcribe_span(seq: &Sequence, lower: u64, upper: u64) -> Result<Sequence> {
    let length = seq.len() as u64;
    check_bounds(lower, upper, length)?;

    if lower <= upper {
        return Ok(seq.subseq(lower as usize, upper as usize)?);
    }
    if !seq.is_circular() {
        return Err(LocationError::WrapsLinearSequence { lower, upper });
    }

    let mut transcript = seq.subseq(lower as usize, length as usize)?;
    transcript.push_sequence(&seq.subseq(1, upper as usize)?);
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn span(start: u64, stop: u64) -> Location {
        Location::simple(
            LocationPoint::exact(start).unwrap(),
            LocationPoint::exact(stop).unwrap(),
        )
    }

    #[fixture]
    fn letters() -> Sequence {
        Sequence::new("ABCDEFGHIJ")
    }

    #[rstest]
    #[case(1, 10, false, 10)]
    #[case(3, 3, false, 1)]
    #[case(3, 7, true, 5)]
    #[case(8, 2, true, 5)]
    #[case(10, 1, true, 2)]
    fn test_span_length(
        #[case] start: u64,
        #[case] stop: u64,
        #[case] is_circular: bool,
        #[case] expected: u64,
    ) {
        assert_eq!(span(start, stop).length(is_circular, 10).unwrap(), expected);
    }

    #[rstest]
    fn test_length_errors() {
        assert_eq!(
            span(3, 11).length(true, 10),
            Err(LocationError::BoundExceedsLength {
                bound: 11,
                length: 10
            })
        );
        assert_eq!(
            span(8, 2).length(false, 10),
            Err(LocationError::WrapsLinearSequence { lower: 8, upper: 2 })
        );
    }

    #[rstest]
    fn test_complement_passes_bounds_through() {
        let location = Location::complement(span(3, 6));
        assert_eq!(location.strand(), Strand::Reverse);
        assert_eq!((location.lower_bound(), location.upper_bound()), (3, 6));
        assert_eq!(location.length(false, 10).unwrap(), 4);
    }

    #[rstest]
    fn test_join_bounds_and_length() {
        let location = Location::join(vec![span(2, 4), Location::complement(span(6, 9))]).unwrap();
        assert_eq!(location.strand(), Strand::Forward);
        assert_eq!((location.lower_bound(), location.upper_bound()), (2, 9));
        assert_eq!(location.length(false, 10).unwrap(), 7);
        assert!(Location::join(vec![]).is_err());
    }

    #[rstest]
    #[case(span(1, 5), span(5, 9), false, true)]
    #[case(span(1, 4), span(5, 9), false, false)]
    #[case(span(3, 4), span(1, 9), false, true)]
    #[case(span(9, 2), span(1, 1), true, true)]
    #[case(span(9, 2), span(3, 8), true, false)]
    #[case(span(9, 2), span(10, 1), true, true)]
    #[case(span(2, 3), span(3, 2), true, true)]
    fn test_overlaps_is_symmetric(
        #[case] a: Location,
        #[case] b: Location,
        #[case] is_circular: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(a.overlaps(&b, is_circular, 10).unwrap(), expected);
        assert_eq!(b.overlaps(&a, is_circular, 10).unwrap(), expected);
    }

    #[rstest]
    fn test_overlaps_rejects_wrap_on_linear_sequence() {
        assert!(span(9, 2).overlaps(&span(1, 3), false, 10).is_err());
    }

    #[rstest]
    fn test_transcript_from(letters: Sequence) {
        assert_eq!(span(5, 5).transcript_from(&letters).unwrap().as_str(), "E");
        assert_eq!(span(1, 10).transcript_from(&letters).unwrap().as_str(), "ABCDEFGHIJ");
        assert_eq!(
            Location::join(vec![span(1, 2), span(2, 3)])
                .unwrap()
                .transcript_from(&letters)
                .unwrap()
                .as_str(),
            "ABBC"
        );
    }

    #[rstest]
    fn test_transcript_wraps_circular_origin() {
        let circular = Sequence::with_topology("ACGTACGTAA", true);
        assert_eq!(span(9, 2).transcript_from(&circular).unwrap().as_str(), "AAAC");
        assert!(span(9, 2).transcript_from(&Sequence::new("ACGTACGTAA")).is_err());
    }

    #[rstest]
    fn test_complement_transcript() {
        let seq = Sequence::new("AACCGGTTAC");
        let location = Location::complement(span(1, 4));
        assert_eq!(location.transcript_from(&seq).unwrap().as_str(), "GGTT");
    }

    #[rstest]
    fn test_transcript_rejects_external_accession(letters: Sequence) {
        let location = Location::on_accession(
            LocationPoint::exact(1).unwrap(),
            LocationPoint::exact(3).unwrap(),
            "J00194.1",
        );
        assert_eq!(
            location.transcript_from(&letters),
            Err(LocationError::ExternalAccession("J00194.1".to_string()))
        );
    }

    #[rstest]
    fn test_display() {
        let location = Location::join(vec![
            span(1, 5),
            Location::complement(span(10, 20)),
            span(30, 30),
        ])
        .unwrap();
        assert_eq!(location.to_string(), "join(1..5,complement(10..20),30)");
    }
}
