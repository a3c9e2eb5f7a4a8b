//! Blake3 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::position::Position;

/// Blake3 partitioner: the first four digest bytes, big-endian.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Partitioner;

impl Partitioner for Blake3Partitioner {
    fn position(&self, key: &[u8]) -> Position {
        let hash = blake3::hash(key);
        let bytes = hash.as_bytes();
        Position(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn name(&self) -> &'static str {
        "Blake3Partitioner"
    }
}
