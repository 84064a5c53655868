use std::fmt::{self, Display};

use crate::errors::{LocationError, Result};
use crate::traits::Bounded;

/// Direction of an uncertain (`<` or `>`) point.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
pub enum Fuzziness {
    /// `<N`: the feature extends beyond N towards the origin
    Before,
    /// `>N`: the feature extends beyond N away from the origin
    After,
}

///
/// One end of a GenBank location.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub enum LocationPoint {
    /// `N`
    Exact(u64),
    /// `<N` or `>N`. The wrapped position is kept for display and used as both bounds.
    Fuzzy { position: u64, fuzziness: Fuzziness },
    /// `N^N+1`, a site between two adjacent bases
    Between { start: u64, stop: u64 },
    /// `N.M`, a single base somewhere within N..M
    Bounded { start: u64, stop: u64 },
}

impl LocationPoint {
    pub fn exact(position: u64) -> Result<Self> {
        if position == 0 {
            return Err(LocationError::ZeroPosition);
        }
        Ok(LocationPoint::Exact(position))
    }

    pub fn fuzzy(position: u64, fuzziness: Fuzziness) -> Result<Self> {
        if position == 0 {
            return Err(LocationError::ZeroPosition);
        }
        Ok(LocationPoint::Fuzzy {
            position,
            fuzziness,
        })
    }

    pub fn between(start: u64, stop: u64) -> Result<Self> {
        if start == 0 {
            return Err(LocationError::ZeroPosition);
        }
        if start.checked_add(1) != Some(stop) {
            return Err(LocationError::InvalidBetween { start, stop });
        }
        Ok(LocationPoint::Between { start, stop })
    }

    pub fn bounded(start: u64, stop: u64) -> Result<Self> {
        if start == 0 {
            return Err(LocationError::ZeroPosition);
        }
        if start >= stop {
            return Err(LocationError::InvalidBounded { start, stop });
        }
        Ok(LocationPoint::Bounded { start, stop })
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, LocationPoint::Exact(_))
    }
}

impl Bounded for LocationPoint {
    fn lower_bound(&self) -> u64 {
        match self {
            LocationPoint::Exact(position) => *position,
            LocationPoint::Fuzzy { position, .. } => *position,
            LocationPoint::Between { start, .. } => *start,
            LocationPoint::Bounded { start, .. } => *start,
        }
    }

    fn upper_bound(&self) -> u64 {
        match self {
            LocationPoint::Exact(position) => *position,
            LocationPoint::Fuzzy { position, .. } => *position,
            LocationPoint::Between { stop, .. } => *stop,
            LocationPoint::Bounded { stop, .. } => *stop,
        }
    }
}

impl Display for LocationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationPoint::Exact(position) => write!(f, "{}", position),
            LocationPoint::Fuzzy {
                position,
                fuzziness: Fuzziness::Before,
            } => write!(f, "<{}", position),
            LocationPoint::Fuzzy {
                position,
                fuzziness: Fuzziness::After,
            } => write!(f, ">{}", position),
            LocationPoint::Between { start, stop } => write!(f, "{}^{}", start, stop),
            LocationPoint::Bounded { start, stop } => write!(f, "{}.{}", start, stop),
        }
    }
}
