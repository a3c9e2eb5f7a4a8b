//! Partitioner abstraction for the cell ring.
//!
//! Partitioners turn keys (virtual-node keys and client keys alike) into
//! positions on the 32-bit ring. A ring fixes its partitioner for its whole
//! lifetime; switching algorithms moves almost every client.

pub mod blake;
pub mod traits;
pub mod xxh3;

pub use blake::Blake3Partitioner;
pub use traits::{HashAlgorithm, Partitioner};
pub use xxh3::Xxh3Partitioner;
