//! XXH3 partitioner implementation.

use xxhash_rust::xxh3::xxh3_128;

use crate::partitioner::traits::Partitioner;
use crate::position::Position;

/// XXH3-128 partitioner, folded to 32 bits by XOR of the four words.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn position(&self, key: &[u8]) -> Position {
        let h = xxh3_128(key);
        let folded = (h as u32) ^ ((h >> 32) as u32) ^ ((h >> 64) as u32) ^ ((h >> 96) as u32);
        Position(folded)
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_and_spread() {
        let p = Xxh3Partitioner;
        assert_eq!(p.position(b"client-1"), p.position(b"client-1"));

        let mut seen: Vec<u32> = (0..64u32)
            .map(|i| p.position(format!("client-{i}").as_bytes()).0)
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 64);
    }
}
