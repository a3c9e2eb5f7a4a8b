//! Error types for the cell ring library.
//!
//! Ring operations themselves never fail: an empty ring answers `None` and a
//! malformed weight simply yields no virtual nodes. Errors only arise when
//! cell records are validated at the registry boundary.

use crate::cell::CellId;

/// Result type alias for the cell ring library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when validating cell records.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A cell record failed validation.
    #[error("invalid cell {cell_id}: {reason}")]
    InvalidCell {
        /// Identifier of the offending record (may be empty).
        cell_id: CellId,
        /// Human readable reason.
        reason: String,
    },

    /// The same cell id appeared twice in one snapshot.
    #[error("duplicate cell id {0}")]
    DuplicateCell(CellId),
}
