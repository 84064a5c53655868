pub mod location;
pub mod point;
pub mod sequence;

// re-export for cleaner imports
pub use self::location::{Location, SimpleLocation};
pub use self::point::{Fuzziness, LocationPoint};
pub use self::sequence::{INVALID_SYMBOL, Sequence, md5_base64url};
