//! Property tests for ring placement.

use cellring::{Cell, HashRing, RingBuilder};
use proptest::prelude::*;

fn cells_strategy() -> impl Strategy<Value = Vec<Cell>> {
    prop::collection::btree_set("[a-z]{1,6}", 1..6).prop_flat_map(|ids| {
        let n = ids.len();
        (
            Just(ids),
            prop::collection::vec(prop::sample::select(vec![0.5, 1.0, 1.5, 2.0]), n),
        )
            .prop_map(|(ids, weights)| {
                ids.into_iter()
                    .zip(weights)
                    .map(|(id, w)| Cell::new(id, "region", "az").with_weight(w))
                    .collect()
            })
    })
}

fn build(cells: &[Cell]) -> HashRing {
    RingBuilder::new()
        .with_virtual_nodes(16)
        .add_cells(cells.iter().cloned())
        .build()
}

proptest! {
    /// Same key, same cell, however often and across rebuilds.
    #[test]
    fn prop_deterministic_placement(cells in cells_strategy(), key in ".{0,24}") {
        let mut ring = build(&cells);
        let first = ring.get_cell(&key).map(|c| c.cell_id.clone());
        prop_assert_eq!(ring.get_cell(&key).map(|c| c.cell_id.clone()), first.clone());

        ring.rebuild_from_cells(&cells);
        prop_assert_eq!(ring.get_cell(&key).map(|c| c.cell_id.clone()), first);
    }

    /// Any active cell means every key is placed.
    #[test]
    fn prop_coverage(cells in cells_strategy(), keys in prop::collection::vec(".{0,16}", 1..50)) {
        let ring = build(&cells);
        for key in &keys {
            prop_assert!(ring.get_cell(key).is_some());
        }
    }

    /// Placement only ever picks active cells.
    #[test]
    fn prop_inactive_cells_never_chosen(
        cells in cells_strategy(),
        mask in prop::collection::vec(any::<bool>(), 6),
        keys in prop::collection::vec("[a-z0-9-]{1,12}", 1..50),
    ) {
        let cells: Vec<Cell> = cells
            .into_iter()
            .zip(mask)
            .map(|(c, active)| c.with_active(active))
            .collect();
        let ring = build(&cells);
        let any_active = cells.iter().any(|c| c.active);

        for key in &keys {
            match ring.get_cell(key) {
                Some(cell) => prop_assert!(cell.active),
                None => prop_assert!(!any_active),
            }
        }
    }

    /// Permuting the snapshot only matters at contested positions.
    #[test]
    fn prop_order_independent(
        (cells, shuffled) in cells_strategy()
            .prop_flat_map(|c| (Just(c.clone()), Just(c).prop_shuffle())),
        keys in prop::collection::vec("[a-z0-9-]{1,12}", 1..100),
    ) {
        let a = build(&cells);
        let b = build(&shuffled);
        for key in &keys {
            let pa = a.route(key).unwrap();
            let pb = b.route(key).unwrap();
            if pa.cell.cell_id != pb.cell.cell_id {
                prop_assert_eq!(pa.position, pb.position);
            }
        }
    }

    /// Distribution always accounts for every position.
    #[test]
    fn prop_distribution_sums_to_len(cells in cells_strategy()) {
        let ring = build(&cells);
        prop_assert_eq!(ring.cell_distribution().values().sum::<usize>(), ring.len());
        prop_assert_eq!(ring.visualization().count(), ring.len());
    }
}
