//! Read-only views of a ring for reporting and dashboards.
//!
//! Nothing here takes part in placement decisions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cell::CellId;
use crate::position::Position;
use crate::ring::HashRing;

/// Size of the 32-bit hash space.
const RING_SPAN: f64 = 4_294_967_296.0;

/// One occupied ring position with its owner's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingEntry<'a> {
    pub position: Position,
    pub cell_id: &'a CellId,
    pub region: &'a str,
    #[serde(rename = "az")]
    pub availability_zone: &'a str,
}

/// How much of the ring one cell holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellShare {
    pub cell_id: CellId,
    pub virtual_nodes: usize,
    /// Share of all virtual nodes, in percent.
    pub percentage: f64,
    /// Fraction of the hash space (0..=1) whose keys land on this cell.
    pub ownership: f64,
}

/// Lazy walk over the ring in ascending position order.
///
/// Computed from the ring on demand. Call [`HashRing::visualization`] again
/// to start over from the first position.
#[derive(Debug, Clone)]
pub struct Visualization<'a> {
    ring: &'a HashRing,
    positions: std::slice::Iter<'a, Position>,
}

impl<'a> Iterator for Visualization<'a> {
    type Item = RingEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let ring = self.ring;
        self.positions.by_ref().find_map(|position| {
            ring.owner(position).map(|cell| RingEntry {
                position: *position,
                cell_id: &cell.cell_id,
                region: &cell.region,
                availability_zone: &cell.availability_zone,
            })
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.positions.len()))
    }
}

impl HashRing {
    /// Virtual node count per cell.
    pub fn cell_distribution(&self) -> BTreeMap<CellId, usize> {
        let mut distribution = BTreeMap::new();
        for cell in self.positions().iter().filter_map(|p| self.owner(p)) {
            *distribution.entry(cell.cell_id.clone()).or_insert(0) += 1;
        }
        distribution
    }

    /// Every occupied position, ascending, with the owning cell's metadata.
    pub fn visualization(&self) -> Visualization<'_> {
        Visualization {
            ring: self,
            positions: self.positions().iter(),
        }
    }

    /// Per-cell share of virtual nodes and of hash space, ordered by cell id.
    ///
    /// A position owns the arc running back (exclusive) to the previous
    /// position, wrapping at the start of the ring.
    pub fn distribution_report(&self) -> Vec<CellShare> {
        let positions = self.positions();
        let total = positions.len();
        let mut arcs: BTreeMap<CellId, u64> = BTreeMap::new();

        for (i, position) in positions.iter().enumerate() {
            let Some(cell) = self.owner(position) else {
                continue;
            };
            let arc = if total == 1 {
                1u64 << 32
            } else {
                let prev = positions[(i + total - 1) % total];
                prev.distance_to(position)
            };
            *arcs.entry(cell.cell_id.clone()).or_insert(0) += arc;
        }

        self.cell_distribution()
            .into_iter()
            .map(|(cell_id, virtual_nodes)| {
                let arc = arcs.get(&cell_id).copied().unwrap_or(0);
                CellShare {
                    percentage: virtual_nodes as f64 / total as f64 * 100.0,
                    ownership: arc as f64 / RING_SPAN,
                    cell_id,
                    virtual_nodes,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    fn ring_of(cells: &[Cell], vnodes: u32) -> HashRing {
        let mut ring = HashRing::with_virtual_nodes(vnodes);
        ring.rebuild_from_cells(cells);
        ring
    }

    #[test]
    fn test_distribution_counts_positions() {
        let ring = ring_of(
            &[
                Cell::new("a", "r1", "az1"),
                Cell::new("b", "r1", "az2").with_weight(2.0),
            ],
            50,
        );
        let distribution = ring.cell_distribution();
        let total: usize = distribution.values().sum();
        assert_eq!(total, ring.len());
        assert_eq!(distribution[&CellId::from("a")], 50);
        assert_eq!(distribution[&CellId::from("b")], 100);
    }

    #[test]
    fn test_visualization_is_ordered_and_restartable() {
        let ring = ring_of(&[Cell::new("a", "r1", "az1"), Cell::new("b", "r2", "az2")], 20);

        let entries: Vec<RingEntry<'_>> = ring.visualization().collect();
        assert_eq!(entries.len(), ring.len());
        assert!(entries.windows(2).all(|w| w[0].position < w[1].position));

        let again: Vec<RingEntry<'_>> = ring.visualization().collect();
        assert_eq!(entries, again);

        let b = entries.iter().find(|e| e.cell_id.as_str() == "b").unwrap();
        assert_eq!(b.region, "r2");
        assert_eq!(b.availability_zone, "az2");
    }

    #[test]
    fn test_visualization_serializes_with_registry_names() {
        let ring = ring_of(&[Cell::new("a", "us-east-1", "us-east-1a")], 1);
        let entry = ring.visualization().next().unwrap();
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["cellId"], "a");
        assert_eq!(json["az"], "us-east-1a");
        assert_eq!(json["position"], ring.positions()[0].value());
    }

    #[test]
    fn test_report_shares_add_up() {
        let ring = ring_of(
            &[
                Cell::new("a", "r", "z"),
                Cell::new("b", "r", "z"),
                Cell::new("c", "r", "z"),
            ],
            30,
        );
        let report = ring.distribution_report();
        assert_eq!(report.len(), 3);

        let pct: f64 = report.iter().map(|s| s.percentage).sum();
        let own: f64 = report.iter().map(|s| s.ownership).sum();
        assert!((pct - 100.0).abs() < 1e-9);
        assert!((own - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_position_owns_everything() {
        let ring = ring_of(&[Cell::new("solo", "r", "z")], 1);
        let report = ring.distribution_report();
        assert_eq!(report[0].ownership, 1.0);
        assert_eq!(report[0].percentage, 100.0);
    }

    #[test]
    fn test_empty_ring_reports_nothing() {
        let ring = HashRing::new();
        assert!(ring.cell_distribution().is_empty());
        assert_eq!(ring.visualization().count(), 0);
        assert!(ring.distribution_report().is_empty());
    }
}
