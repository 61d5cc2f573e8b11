//! Error Types
//!
//! Construction and mutation APIs signal failure through [`INVALID_ID`]
//! returns; only lookups and snapshot loading produce a `Result`, so this
//! enum stays small on purpose.
//!
//! [`INVALID_ID`]: crate::store::INVALID_ID

use core::fmt;

use crate::store::Identifier;

/// Unified error type for fallible queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicsError {
    /// An identifier is negative, past the store bound, or names a removed
    /// entity.
    OutOfRange {
        /// The offending identifier.
        id: Identifier,
    },
    /// Snapshot data was truncated or structurally inconsistent.
    DeserializationFailed,
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { id } => write!(f, "identifier {id} out of range"),
            Self::DeserializationFailed => write!(f, "snapshot deserialization failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PhysicsError {}

// ============================================================================
// Tests
// ============================================================================
