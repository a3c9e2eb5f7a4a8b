//! Ring configuration.

use serde::{Deserialize, Serialize};

use crate::partitioner::HashAlgorithm;

/// Virtual nodes given to a cell of weight 1.
pub const DEFAULT_VIRTUAL_NODES: u32 = 150;

/// Upper bound on virtual nodes for a single cell, whatever its weight.
///
/// Keeps one oversized weight from stalling a rebuild. At the default base
/// this allows weights up to about 436.
pub const MAX_VIRTUAL_NODES_PER_CELL: usize = 65_536;

/// Ring-wide settings. Both values must stay fixed for as long as placements
/// are expected to be stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Base virtual node count per unit of weight.
    pub virtual_nodes: u32,
    /// Digest used for virtual-node and client keys.
    pub hash: HashAlgorithm,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: DEFAULT_VIRTUAL_NODES,
            hash: HashAlgorithm::default(),
        }
    }
}
