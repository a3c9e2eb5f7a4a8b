//! Consistent hashing for cell-based architectures.
//!
//! This crate maps client identifiers onto weighted, independently
//! activatable service partitions ("cells"):
//! - Cell records and their registry interface
//! - Partitioners hashing keys onto a 32-bit ring
//! - Virtual nodes realizing cell weights
//! - The hash ring: construction, placement lookup and introspection
//! - Shared ring snapshots for concurrent routers
//!
//! The ring is a pure in-memory value. It does no I/O and never decides cell
//! health; it trusts the `active` flag on the records it is given.

pub mod cell;
pub mod config;
pub mod error;
pub mod partitioner;
pub mod position;
pub mod registry;
pub mod ring;
pub mod vnode;

pub use cell::{Cell, CellId};
pub use config::{RingConfig, DEFAULT_VIRTUAL_NODES, MAX_VIRTUAL_NODES_PER_CELL};
pub use error::{Error, Result};
pub use partitioner::{HashAlgorithm, Partitioner};
pub use position::Position;
pub use registry::{CellRegistry, StaticRegistry};
pub use ring::{
    CellShare, HashRing, Placement, Reassignment, RingBuilder, RingEntry, SharedRing,
    Visualization,
};
pub use vnode::VirtualNode;
