//! Placement changes between two rings.

use serde::Serialize;

use crate::cell::CellId;
use crate::ring::HashRing;

/// A client key whose owning cell differs between two rings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reassignment {
    pub client_key: String,
    /// Owner in the old ring; `None` if the old ring was empty.
    pub from: Option<CellId>,
    /// Owner in the new ring; `None` if the new ring is empty.
    pub to: Option<CellId>,
}

impl HashRing {
    /// Compute which of `client_keys` move when going from `old` to `new`.
    ///
    /// Keys keeping the same cell are left out. Output follows input order.
    pub fn diff<I>(old: &HashRing, new: &HashRing, client_keys: I) -> Vec<Reassignment>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        client_keys
            .into_iter()
            .filter_map(|key| {
                let key = key.as_ref();
                let from = old.get_cell(key).map(|c| &c.cell_id);
                let to = new.get_cell(key).map(|c| &c.cell_id);
                (from != to).then(|| Reassignment {
                    client_key: key.to_string(),
                    from: from.cloned(),
                    to: to.cloned(),
                })
            })
            .collect()
    }
}
