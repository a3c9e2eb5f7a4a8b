//! Cell records placed on the ring.
//!
//! A cell is an independently deployable service partition. The ring only
//! cares about its id, weight and `active` flag; region and availability zone
//! are carried through untouched for the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_VIRTUAL_NODES, MAX_VIRTUAL_NODES_PER_CELL};
use crate::error::{Error, Result};
use crate::partitioner::Partitioner;
use crate::vnode::VirtualNode;

/// Stable identifier of a cell.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub String);

impl CellId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        CellId(id.to_string())
    }
}

impl From<String> for CellId {
    fn from(id: String) -> Self {
        CellId(id)
    }
}

impl AsRef<str> for CellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A routable partition, as recorded in the cell registry.
///
/// Field names follow the registry record format (`cellId`,
/// `availabilityZone`, ...). Extra registry attributes such as heartbeat
/// timestamps are ignored on deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub cell_id: CellId,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub availability_zone: String,
    /// Relative share of hash space. `1.0` gets the base virtual node count.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Inactive cells are left off the ring entirely.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_weight() -> f64 {
    1.0
}

fn default_active() -> bool {
    true
}

impl Cell {
    /// An active cell with weight 1.
    pub fn new(
        cell_id: impl Into<CellId>,
        region: impl Into<String>,
        availability_zone: impl Into<String>,
    ) -> Self {
        Self {
            cell_id: cell_id.into(),
            region: region.into(),
            availability_zone: availability_zone.into(),
            weight: default_weight(),
            active: true,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Number of virtual nodes this cell gets: `floor(base * weight)`,
    /// capped at [`MAX_VIRTUAL_NODES_PER_CELL`].
    ///
    /// Zero, negative and non-finite weights give zero, which keeps the cell
    /// off the ring without treating it as an error.
    pub fn virtual_node_count(&self, base: u32) -> usize {
        if self.exceeds_virtual_node_cap(base) {
            return MAX_VIRTUAL_NODES_PER_CELL;
        }
        self.requested_virtual_nodes(base) as usize
    }

    /// Whether `floor(base * weight)` is above [`MAX_VIRTUAL_NODES_PER_CELL`].
    pub fn exceeds_virtual_node_cap(&self, base: u32) -> bool {
        self.requested_virtual_nodes(base) > MAX_VIRTUAL_NODES_PER_CELL as f64
    }

    fn requested_virtual_nodes(&self, base: u32) -> f64 {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return 0.0;
        }
        (f64::from(base) * self.weight).floor()
    }

    /// Virtual nodes of this cell, computed lazily.
    pub fn virtual_nodes<'a, P: Partitioner + ?Sized>(
        &'a self,
        base: u32,
        partitioner: &'a P,
    ) -> impl Iterator<Item = VirtualNode> + 'a {
        (0..self.virtual_node_count(base))
            .map(move |i| VirtualNode::for_cell(&self.cell_id, i, partitioner))
    }

    /// Boundary validation for records coming out of a registry.
    ///
    /// Weights are checked against the default base: a weight that would need
    /// more than [`MAX_VIRTUAL_NODES_PER_CELL`] virtual nodes is rejected.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.cell_id.0.trim().is_empty() {
            Some("cell id is empty".to_string())
        } else if !self.weight.is_finite() {
            Some(format!("weight {} is not finite", self.weight))
        } else if self.weight < 0.0 {
            Some(format!("weight {} is negative", self.weight))
        } else if self.exceeds_virtual_node_cap(DEFAULT_VIRTUAL_NODES) {
            Some(format!(
                "weight {} needs more than {} virtual nodes",
                self.weight, MAX_VIRTUAL_NODES_PER_CELL
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(Error::InvalidCell {
                cell_id: self.cell_id.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
