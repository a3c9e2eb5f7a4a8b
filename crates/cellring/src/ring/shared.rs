//! Shared ring snapshots.
//!
//! One writer rebuilds a fresh ring and swaps it in; readers grab an `Arc`
//! to whatever ring is current and route against it without holding a lock.
//! A published ring is never mutated.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::cell::Cell;
use crate::config::RingConfig;
use crate::registry::CellRegistry;
use crate::ring::HashRing;

/// Atomically swappable handle to the current ring.
#[derive(Debug)]
pub struct SharedRing {
    config: RingConfig,
    current: RwLock<Arc<HashRing>>,
}

impl Default for SharedRing {
    fn default() -> Self {
        Self::new(RingConfig::default())
    }
}

impl SharedRing {
    /// Start with an empty ring using `config` for every rebuild.
    pub fn new(config: RingConfig) -> Self {
        Self {
            config,
            current: RwLock::new(Arc::new(HashRing::with_config(&config))),
        }
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Snapshot of the current ring.
    pub fn load(&self) -> Arc<HashRing> {
        self.current.read().clone()
    }

    /// Publish `ring`, returning the one it replaces.
    pub fn replace(&self, ring: HashRing) -> Arc<HashRing> {
        let ring = Arc::new(ring);
        std::mem::replace(&mut *self.current.write(), ring)
    }

    /// Build a ring from `cells` and publish it.
    ///
    /// The build happens before the lock is taken, so readers are only
    /// blocked for the pointer swap.
    pub fn refresh(&self, cells: &[Cell]) -> Arc<HashRing> {
        let mut ring = HashRing::with_config(&self.config);
        ring.rebuild_from_cells(cells);
        let ring = Arc::new(ring);
        *self.current.write() = Arc::clone(&ring);
        debug!(positions = ring.len(), cells = ring.cell_count(), "published ring");
        ring
    }

    /// Scan `registry` and publish a ring built from the result.
    ///
    /// On a registry error the current ring stays in place.
    pub fn refresh_from<R>(&self, registry: &R) -> Result<Arc<HashRing>, R::Error>
    where
        R: CellRegistry + ?Sized,
    {
        let cells = registry.scan()?;
        Ok(self.refresh(&cells))
    }

    /// Route against the current ring, cloning the chosen cell.
    pub fn get_cell(&self, client_key: &str) -> Option<Cell> {
        self.load().get_cell(client_key).cloned()
    }
}
