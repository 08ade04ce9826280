//! The membership set and its per-run builder.
//!
//! The published document is a flat JSON object mapping decimal-string item
//! ids to `true`. The set is rebuilt from scratch every run; it is never
//! patched incrementally from a previous run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The membership document: which item ids are classified.
///
/// Absence of an id means "not matched" or "not evaluated"; the two are
/// indistinguishable at the set level. Keys iterate in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipSet {
    entries: BTreeMap<String, bool>,
}

impl MembershipSet {
    pub fn contains(&self, id: u64) -> bool {
        self.entries.get(&id.to_string()).copied().unwrap_or(false)
    }

    /// Ids in lexical (string) order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<u64> for MembershipSet {
    fn from_iter<I: IntoIterator<Item = u64>>(ids: I) -> Self {
        Self {
            entries: ids.into_iter().map(|id| (id.to_string(), true)).collect(),
        }
    }
}

/// Accumulates matched item ids during a run, then freezes them into a
/// [`MembershipSet`].
#[derive(Debug, Default)]
pub struct MembershipBuilder {
    ids: BTreeSet<String>,
}

impl MembershipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a matched item. Recording the same id twice is a no-op.
    pub fn record(&mut self, id: u64) {
        self.ids.insert(id.to_string());
    }

    pub fn build(self) -> MembershipSet {
        MembershipSet {
            entries: self.ids.into_iter().map(|id| (id, true)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_idempotent() {
        let mut builder = MembershipBuilder::new();
        builder.record(5);
        builder.record(5);

        let set = builder.build();
        assert_eq!(set.len(), 1);
        assert!(set.contains(5));
    }

    #[test]
    fn test_builder_starts_empty() {
        assert!(MembershipBuilder::new().build().is_empty());
    }

    #[test]
    fn test_serializes_to_flat_document() {
        let set: MembershipSet = [5u64].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"{"5":true}"#);
    }

    #[test]
    fn test_deserializes_flat_document() {
        let set: MembershipSet = serde_json::from_str(r#"{"5":true,"12":true}"#).unwrap();
        assert!(set.contains(5));
        assert!(set.contains(12));
        assert!(!set.contains(7));
    }

    #[test]
    fn test_ids_are_lexically_ordered() {
        let set: MembershipSet = [9u64, 10, 2].into_iter().collect();
        let ids: Vec<&str> = set.ids().collect();
        // String keys sort lexically, not numerically.
        assert_eq!(ids, vec!["10", "2", "9"]);
    }

    #[test]
    fn test_document_roundtrip() {
        let set: MembershipSet = [9u64, 10].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        let restored: MembershipSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, set);
    }
}
