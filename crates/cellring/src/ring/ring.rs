//! Hash ring data structure.
//!
//! The ring keeps two views over the same placement: a position -> cell map
//! and the ascending list of occupied positions used for binary search. Every
//! mutation regenerates the sorted list, so the two never drift apart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cell::{Cell, CellId};
use crate::config::RingConfig;
use crate::partitioner::{HashAlgorithm, Partitioner};
use crate::position::Position;

/// Where a client key landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a> {
    /// Hash of the client key.
    pub client_hash: Position,
    /// The first occupied position at or after `client_hash` (wrapping).
    pub position: Position,
    /// Cell owning `position`.
    pub cell: &'a Cell,
}

/// Consistent hash ring mapping client keys to cells.
///
/// Each active cell gets `floor(base_virtual_nodes * weight)` positions on a
/// 32-bit ring. A client key is owned by the first position clockwise from
/// its hash.
///
/// Mutating methods take `&mut self`; to share a ring between threads, build
/// it once and publish it through [`SharedRing`](crate::ring::SharedRing).
#[derive(Debug, Clone)]
pub struct HashRing {
    /// Virtual nodes per unit of weight.
    base_virtual_nodes: u32,
    algorithm: HashAlgorithm,
    /// Position -> owning cell. Collisions are last write wins.
    ring: HashMap<Position, Arc<Cell>>,
    /// Ascending occupied positions.
    sorted_positions: Vec<Position>,
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HashRing {
    /// Empty ring with the default configuration (150 vnodes, blake3).
    pub fn new() -> Self {
        Self::with_config(&RingConfig::default())
    }

    pub fn with_config(config: &RingConfig) -> Self {
        Self {
            base_virtual_nodes: config.virtual_nodes,
            algorithm: config.hash,
            ring: HashMap::new(),
            sorted_positions: Vec::new(),
        }
    }

    /// Empty ring with a custom base virtual node count.
    pub fn with_virtual_nodes(base_virtual_nodes: u32) -> Self {
        Self::with_config(&RingConfig {
            virtual_nodes: base_virtual_nodes,
            ..RingConfig::default()
        })
    }

    /// Hash an arbitrary key onto the ring.
    ///
    /// Virtual-node keys and client keys go through the same function.
    #[inline]
    pub fn hash(&self, key: &str) -> Position {
        self.algorithm.position(key.as_bytes())
    }

    /// Place a cell's virtual nodes on the ring.
    ///
    /// Inactive cells are ignored. A cell id already on the ring is replaced,
    /// so re-adding a cell with a new weight resizes it.
    pub fn add_cell(&mut self, cell: Cell) {
        if !cell.active {
            debug!(cell_id = %cell.cell_id, "skipping inactive cell");
            return;
        }

        if self.ring.values().any(|c| c.cell_id == cell.cell_id) {
            self.drop_positions(&cell.cell_id);
        }

        self.place(Arc::new(cell));
        self.update_sorted_positions();
    }

    /// Remove every position owned by `cell_id`.
    ///
    /// Returns the number of positions removed.
    pub fn remove_cell(&mut self, cell_id: &CellId) -> usize {
        let removed = self.drop_positions(cell_id);
        self.update_sorted_positions();
        if removed > 0 {
            debug!(%cell_id, removed, "removed cell from ring");
        }
        removed
    }

    /// Replace the whole ring with one built from `cells`.
    ///
    /// Inactive cells are skipped, including an inactive record repeating an
    /// active cell's id. Among active records sharing an id the later one
    /// replaces the earlier. Placement depends only on cell content, except
    /// when virtual nodes of two different cells hash to the same position:
    /// the cell processed later keeps it.
    pub fn rebuild_from_cells(&mut self, cells: &[Cell]) {
        self.ring.clear();
        self.sorted_positions.clear();

        let mut seen: HashSet<&CellId> = HashSet::with_capacity(cells.len());
        for cell in cells.iter().filter(|c| c.active) {
            if !seen.insert(&cell.cell_id) {
                warn!(
                    cell_id = %cell.cell_id,
                    "duplicate active cell id in snapshot, replacing earlier record"
                );
                self.drop_positions(&cell.cell_id);
            }
            self.place(Arc::new(cell.clone()));
        }

        self.update_sorted_positions();
        debug!(
            cells = seen.len(),
            positions = self.sorted_positions.len(),
            "rebuilt ring"
        );
    }

    /// The cell owning `client_key`, or `None` when no cell is active.
    pub fn get_cell(&self, client_key: &str) -> Option<&Cell> {
        self.route(client_key).map(|p| p.cell)
    }

    /// Full placement decision for `client_key`.
    ///
    /// Binary-searches for the smallest occupied position `>=` the key's hash,
    /// wrapping to the first position past the end of the ring.
    pub fn route(&self, client_key: &str) -> Option<Placement<'_>> {
        let first = *self.sorted_positions.first()?;
        let client_hash = self.hash(client_key);

        let idx = self.sorted_positions.partition_point(|p| *p < client_hash);
        let position = self.sorted_positions.get(idx).copied().unwrap_or(first);
        let cell = self.ring.get(&position)?;

        Some(Placement {
            client_hash,
            position,
            cell: cell.as_ref(),
        })
    }

    /// Occupied positions in ascending order.
    pub fn positions(&self) -> &[Position] {
        &self.sorted_positions
    }

    /// The cell occupying exactly `position`, if any.
    pub fn owner(&self, position: &Position) -> Option<&Cell> {
        self.ring.get(position).map(Arc::as_ref)
    }

    /// Number of occupied positions.
    pub fn len(&self) -> usize {
        self.sorted_positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_positions.is_empty()
    }

    /// Number of distinct cells holding at least one position.
    pub fn cell_count(&self) -> usize {
        self.ring
            .values()
            .map(|c| &c.cell_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Cells on the ring, ordered by id.
    pub fn cells(&self) -> Vec<&Cell> {
        let mut cells: Vec<&Cell> = Vec::new();
        let mut seen = HashSet::new();
        for cell in self.ring.values() {
            if seen.insert(&cell.cell_id) {
                cells.push(cell.as_ref());
            }
        }
        cells.sort_by(|a, b| a.cell_id.cmp(&b.cell_id));
        cells
    }

    pub fn base_virtual_nodes(&self) -> u32 {
        self.base_virtual_nodes
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Insert a cell's virtual nodes without re-sorting. Returns how many
    /// virtual nodes the cell was given.
    fn place(&mut self, cell: Arc<Cell>) -> usize {
        let count = cell.virtual_node_count(self.base_virtual_nodes);
        if cell.exceeds_virtual_node_cap(self.base_virtual_nodes) {
            warn!(
                cell_id = %cell.cell_id,
                weight = cell.weight,
                virtual_nodes = count,
                "cell weight exceeds the virtual node cap, clamping"
            );
        }
        if count == 0 {
            if cell.weight == 0.0 {
                debug!(cell_id = %cell.cell_id, "cell has zero weight");
            } else {
                warn!(cell_id = %cell.cell_id, weight = cell.weight, "cell weight yields no virtual nodes");
            }
            return 0;
        }

        let algorithm = self.algorithm;
        let mut collisions = 0usize;
        for vnode in cell.virtual_nodes(self.base_virtual_nodes, &algorithm) {
            if let Some(prev) = self.ring.insert(vnode.position, Arc::clone(&cell)) {
                if prev.cell_id != cell.cell_id {
                    collisions += 1;
                    debug!(
                        %vnode,
                        previous = %prev.cell_id,
                        cell_id = %cell.cell_id,
                        "virtual node collision, last write wins"
                    );
                }
            }
        }

        debug!(cell_id = %cell.cell_id, virtual_nodes = count, collisions, "placed cell");
        count
    }

    fn drop_positions(&mut self, cell_id: &CellId) -> usize {
        let before = self.ring.len();
        self.ring.retain(|_, cell| &cell.cell_id != cell_id);
        before - self.ring.len()
    }

    fn update_sorted_positions(&mut self) {
        self.sorted_positions.clear();
        self.sorted_positions.extend(self.ring.keys().copied());
        self.sorted_positions.sort_unstable();
    }
}
