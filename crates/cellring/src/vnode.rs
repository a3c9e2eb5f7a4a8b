//! Virtual node abstractions.
//!
//! Each active cell is placed on the ring many times, once per virtual node.
//! More virtual nodes smooth the key distribution; a cell's weight scales its
//! virtual node count, which is how heavier cells get more traffic.
//!
//! - **Memory**: O(v) positions per cell
//! - **Lookup**: O(log n) over all positions, independent of per-cell count
//! - **Rebalancing**: removing one of N cells moves about 1/N of the keys

use crate::cell::CellId;
use crate::partitioner::Partitioner;
use crate::position::Position;

/// A virtual node on the hash ring.
///
/// The position is the hash of `"{cell_id}:{vnode_index}"`, so a given cell
/// always lands on the same positions no matter which other cells exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Ring position of this replica.
    pub position: Position,
    /// Index of this replica among its cell's virtual nodes.
    pub vnode_index: usize,
}

impl VirtualNode {
    /// The key hashed to place virtual node `vnode_index` of `cell_id`.
    pub fn key(cell_id: &CellId, vnode_index: usize) -> String {
        format!("{}:{}", cell_id, vnode_index)
    }

    /// Create virtual node `vnode_index` for a cell.
    pub fn for_cell<P: Partitioner + ?Sized>(
        cell_id: &CellId,
        vnode_index: usize,
        partitioner: &P,
    ) -> Self {
        let key = Self::key(cell_id, vnode_index);
        Self {
            position: partitioner.position(key.as_bytes()),
            vnode_index,
        }
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(position={}, index={})", self.position, self.vnode_index)
    }
}
