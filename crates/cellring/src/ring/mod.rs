//! Consistent hash ring implementation.
//!
//! The ring owns the position -> cell mapping and answers placement queries.
//! It is rebuilt wholesale from a cell snapshot whenever membership changes.

pub mod builder;
pub mod diff;
pub mod introspect;
pub mod ring;
pub mod shared;

pub use builder::RingBuilder;
pub use diff::Reassignment;
pub use introspect::{CellShare, RingEntry, Visualization};
pub use ring::{HashRing, Placement};
pub use shared::SharedRing;
