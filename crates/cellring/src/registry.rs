//! Cell registry interface.
//!
//! The registry is the source of truth for cell records. The ring never talks
//! to it directly; callers scan it and hand the snapshot to
//! [`HashRing::rebuild_from_cells`](crate::HashRing::rebuild_from_cells) or
//! [`SharedRing::refresh_from`](crate::SharedRing::refresh_from).

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::cell::{Cell, CellId};

/// Anything that can produce the current list of cell records.
pub trait CellRegistry {
    type Error;

    /// Every known cell, active or not.
    fn scan(&self) -> Result<Vec<Cell>, Self::Error>;
}

/// In-memory registry keyed by cell id.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    cells: BTreeMap<CellId, Cell>,
}

impl StaticRegistry {
    /// Later records replace earlier ones with the same id.
    pub fn new(cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut registry = Self::default();
        for cell in cells {
            registry.upsert(cell);
        }
        registry
    }

    pub fn upsert(&mut self, cell: Cell) -> Option<Cell> {
        self.cells.insert(cell.cell_id.clone(), cell)
    }

    pub fn remove(&mut self, cell_id: &CellId) -> Option<Cell> {
        self.cells.remove(cell_id)
    }

    pub fn get(&self, cell_id: &CellId) -> Option<&Cell> {
        self.cells.get(cell_id)
    }

    /// Returns false if the cell is unknown.
    pub fn set_active(&mut self, cell_id: &CellId, active: bool) -> bool {
        match self.cells.get_mut(cell_id) {
            Some(cell) => {
                cell.active = active;
                true
            }
            None => false,
        }
    }

    /// Returns false if the cell is unknown.
    pub fn set_weight(&mut self, cell_id: &CellId, weight: f64) -> bool {
        match self.cells.get_mut(cell_id) {
            Some(cell) => {
                cell.weight = weight;
                true
            }
            None => false,
        }
    }

    /// Toggle every cell in `region`, returning the ids touched.
    pub fn set_region_active(&mut self, region: &str, active: bool) -> Vec<CellId> {
        self.cells
            .values_mut()
            .filter(|c| c.region == region)
            .map(|c| {
                c.active = active;
                c.cell_id.clone()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.cells.values().filter(|c| c.active).count()
    }
}

impl CellRegistry for StaticRegistry {
    type Error = Infallible;

    fn scan(&self) -> Result<Vec<Cell>, Self::Error> {
        Ok(self.cells.values().cloned().collect())
    }
}
