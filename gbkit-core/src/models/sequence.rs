use std::fmt::{self, Display};

use md5::{Digest, Md5};

use crate::errors::SequenceError;

/// Character substituted for anything that is not an ASCII letter.
pub const INVALID_SYMBOL: char = '@';

///
/// Sequence struct, a cleaned biological sequence (DNA, RNA or protein).
///
/// The characters are always upper case letters or [INVALID_SYMBOL]; nothing
/// else survives construction.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    characters: String,
    is_circular: bool,
}

impl Sequence {
    ///
    /// Create a new, linear sequence from raw text. Whitespace is dropped,
    /// letters are upper cased, and every other symbol becomes [INVALID_SYMBOL].
    ///
    pub fn new(raw: &str) -> Sequence {
        Sequence {
            characters: clean(raw),
            is_circular: false,
        }
    }

    ///
    /// Same as [Sequence::new], with an explicit topology.
    ///
    pub fn with_topology(raw: &str, is_circular: bool) -> Sequence {
        Sequence {
            characters: clean(raw),
            is_circular,
        }
    }

    pub fn is_circular(&self) -> bool {
        self.is_circular
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.characters
    }

    ///
    /// Content-addressed identifier: the MD5 digest of the cleaned characters,
    /// base64url encoded without padding. Identical content always yields the
    /// same identifier regardless of topology.
    ///
    pub fn seq_id(&self) -> String {
        md5_base64url(self.characters.as_bytes())
    }

    ///
    /// Get the 1-based, inclusive sub-sequence `start..=stop`.
    ///
    pub fn subseq(&self, start: usize, stop: usize) -> Result<Sequence, SequenceError> {
        if stop > self.len() || start == 0 || start > stop + 1 {
            return Err(SequenceError::OutOfRange {
                start,
                stop,
                length: self.len(),
            });
        }

        Ok(Sequence {
            characters: self.characters[start - 1..stop].to_string(),
            is_circular: false,
        })
    }

    pub fn reverse_complement(&self) -> Sequence {
        Sequence {
            characters: self.characters.chars().rev().map(complement).collect(),
            is_circular: self.is_circular,
        }
    }

    ///
    /// Append another sequence's characters; the topology of `self` is kept.
    ///
    pub fn push_sequence(&mut self, other: &Sequence) {
        self.characters.push_str(&other.characters);
    }
}

impl From<&str> for Sequence {
    fn from(value: &str) -> Self {
        Sequence::new(value)
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.characters)
    }
}

fn clean(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            if c.is_ascii_alphabetic() {
                c.to_ascii_uppercase()
            } else {
                INVALID_SYMBOL
            }
        })
        .collect()
}

/// IUPAC nucleotide complement; anything without a partner maps to itself.
fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'T' | 'U' => 'A',
        'C' => 'G',
        'G' => 'C',
        'R' => 'Y',
        'Y' => 'R',
        'K' => 'M',
        'M' => 'K',
        'B' => 'V',
        'V' => 'B',
        'D' => 'H',
        'H' => 'D',
        other => other,
    }
}

///
/// MD5 digest of the given bytes, base64url encoded without padding.
///
pub fn md5_base64url(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    base64_url::encode(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("acgt", "ACGT")]
    #[case("AC GT\n nn", "ACGTNN")]
    #[case("AC-G*T1", "AC@G@T@")]
    #[case("", "")]
    fn test_clean_sequence(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Sequence::new(raw).as_str(), expected);
    }

    #[rstest]
    fn test_seq_id_is_unpadded_base64url_md5() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(Sequence::new("").seq_id(), "1B2M2Y8AsgTpgAmY7PhCfg");
        let id = Sequence::new("ACGT").seq_id();
        assert_eq!(id.len(), 22);
        assert!(!id.contains('='));
        assert!(!id.contains('+'));
        assert!(!id.contains('/'));
    }

    #[rstest]
    fn test_seq_id_ignores_case_whitespace_and_topology() {
        let a = Sequence::with_topology("acg t", true);
        let b = Sequence::new("ACGT");
        assert_eq!(a.seq_id(), b.seq_id());
    }

    #[rstest]
    #[case(1, 1, "A")]
    #[case(2, 4, "BCD")]
    #[case(1, 10, "ABCDEFGHIJ")]
    #[case(5, 4, "")]
    fn test_subseq(#[case] start: usize, #[case] stop: usize, #[case] expected: &str) {
        let seq = Sequence::new("ABCDEFGHIJ");
        assert_eq!(seq.subseq(start, stop).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case(0, 3)]
    #[case(3, 11)]
    #[case(6, 3)]
    #[case(1, usize::MAX)]
    fn test_subseq_out_of_range(#[case] start: usize, #[case] stop: usize) {
        let seq = Sequence::new("ABCDEFGHIJ");
        assert!(seq.subseq(start, stop).is_err());
    }

    #[rstest]
    fn test_reverse_complement() {
        assert_eq!(Sequence::new("AACGTN@").reverse_complement().as_str(), "@NACGTT");
        assert_eq!(Sequence::new("RYKM").reverse_complement().as_str(), "KMRY");
    }
}
