use std::fmt::{self, Display};

/// Anything with 1-based, inclusive lower and upper bounds on a sequence.
pub trait Bounded {
    fn lower_bound(&self) -> u64;

    fn upper_bound(&self) -> u64;

    /// On a circular sequence a lower bound past the upper bound crosses the origin.
    fn wraps(&self) -> bool {
        self.lower_bound() > self.upper_bound()
    }
}

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Forward,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Reverse,
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}
