//! Builder for hash rings.

use crate::cell::Cell;
use crate::config::RingConfig;
use crate::partitioner::HashAlgorithm;
use crate::ring::HashRing;

/// Collects configuration and cells, then builds a ring in one pass.
///
/// ```rust
/// use cellring::{Cell, RingBuilder};
///
/// let ring = RingBuilder::new()
///     .with_virtual_nodes(64)
///     .add_cell(Cell::new("cell-1", "us-east-1", "us-east-1a"))
///     .add_cell(Cell::new("cell-2", "us-east-1", "us-east-1b").with_weight(2.0))
///     .build();
///
/// assert_eq!(ring.len(), 64 + 128);
/// assert!(ring.get_cell("client-7").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RingBuilder {
    config: RingConfig,
    cells: Vec<Cell>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: &RingConfig) -> Self {
        self.config = *config;
        self
    }

    /// Base virtual node count for a weight-1 cell.
    pub fn with_virtual_nodes(mut self, virtual_nodes: u32) -> Self {
        self.config.virtual_nodes = virtual_nodes;
        self
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.hash = algorithm;
        self
    }

    pub fn add_cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn add_cells(mut self, cells: impl IntoIterator<Item = Cell>) -> Self {
        self.cells.extend(cells);
        self
    }

    pub fn build(self) -> HashRing {
        let mut ring = HashRing::with_config(&self.config);
        ring.rebuild_from_cells(&self.cells);
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let ring = RingBuilder::new()
            .add_cell(Cell::new("a", "r", "z"))
            .add_cell(Cell::new("b", "r", "z"))
            .build();
        assert_eq!(ring.base_virtual_nodes(), 150);
        assert_eq!(ring.len(), 300);
        assert_eq!(ring.algorithm(), HashAlgorithm::Blake3);
    }

    #[test]
    fn test_builder_custom_config() {
        let ring = RingBuilder::new()
            .with_config(&RingConfig {
                virtual_nodes: 8,
                hash: HashAlgorithm::Xxh3,
            })
            .add_cells(vec![
                Cell::new("a", "r", "z"),
                Cell::new("b", "r", "z").with_active(false),
            ])
            .build();
        assert_eq!(ring.len(), 8);
        assert_eq!(ring.cell_count(), 1);
        assert_eq!(ring.algorithm(), HashAlgorithm::Xxh3);
    }
}
