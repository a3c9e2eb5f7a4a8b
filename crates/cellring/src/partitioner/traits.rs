//! Core partitioner trait definitions.

use serde::{Deserialize, Serialize};

use crate::partitioner::{Blake3Partitioner, Xxh3Partitioner};
use crate::position::Position;

/// A partitioner converts keys into positions on the hash ring.
///
/// Partitioners are stateless and thread-safe. Implementations must be
/// deterministic across processes and runs: the same bytes always land on
/// the same position.
pub trait Partitioner: Send + Sync {
    /// Converts a key into a ring position.
    fn position(&self, key: &[u8]) -> Position;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}

/// Selects the digest a ring hashes with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Xxh3,
}

impl Partitioner for HashAlgorithm {
    #[inline]
    fn position(&self, key: &[u8]) -> Position {
        match self {
            HashAlgorithm::Blake3 => Blake3Partitioner.position(key),
            HashAlgorithm::Xxh3 => Xxh3Partitioner.position(key),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Blake3 => Blake3Partitioner.name(),
            HashAlgorithm::Xxh3 => Xxh3Partitioner.name(),
        }
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blake3" => Ok(HashAlgorithm::Blake3),
            "xxh3" => Ok(HashAlgorithm::Xxh3),
            other => Err(format!("unknown hash algorithm: {other}")),
        }
    }
}
