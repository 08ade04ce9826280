//! Threshold classification of item signatures against the reference store.

use crate::error::Result;
use crate::signature::{Signature, SignatureStore};

/// The reference an item was matched against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedReference {
    pub name: String,
    pub distance: u32,
}

/// Outcome of classifying a single item. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub item_id: u64,
    pub matched: Option<MatchedReference>,
}

impl Classification {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

/// Classify one item signature against the reference store.
///
/// References are scanned in store order; the first one within `threshold`
/// (inclusive) wins and the scan stops there, even if a later reference is
/// closer. Errors only on a signature length mismatch, which indicates a
/// misconfigured store rather than a bad item.
pub fn classify(
    item_id: u64,
    signature: &Signature,
    store: &SignatureStore,
    threshold: u32,
) -> Result<Classification> {
    for (name, reference) in store.iter() {
        let distance = signature.distance(reference)?;
        if distance <= threshold {
            return Ok(Classification {
                item_id,
                matched: Some(MatchedReference {
                    name: name.to_string(),
                    distance,
                }),
            });
        }
    }

    Ok(Classification {
        item_id,
        matched: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(entries: &[(&str, &str)]) -> SignatureStore {
        SignatureStore::from_entries(
            entries
                .iter()
                .map(|(name, hex)| (name.to_string(), Signature::from_hex(hex).unwrap()))
                .collect(),
        )
    }

    #[test]
    fn test_first_match_wins_over_closer_later_match() {
        // poseA is at distance 3, poseB at distance 0. Store order decides.
        let store = store(&[
            ("poseA", "0700000000000000"),
            ("poseB", "0000000000000000"),
        ]);
        let signature = Signature::from_hex("0000000000000000").unwrap();

        let result = classify(1, &signature, &store, 5).unwrap();
        let matched = result.matched.unwrap();
        assert_eq!(matched.name, "poseA");
        assert_eq!(matched.distance, 3);
    }

    #[test]
    fn test_distance_equal_to_threshold_matches() {
        let store = store(&[("poseA", "1f00000000000000")]); // 5 bits set
        let signature = Signature::from_hex("0000000000000000").unwrap();

        let result = classify(1, &signature, &store, 5).unwrap();
        assert_eq!(result.matched.unwrap().distance, 5);
    }

    #[test]
    fn test_distance_above_threshold_does_not_match() {
        let store = store(&[("poseA", "3f00000000000000")]); // 6 bits set
        let signature = Signature::from_hex("0000000000000000").unwrap();

        let result = classify(1, &signature, &store, 5).unwrap();
        assert!(!result.is_match());
        assert_eq!(result.item_id, 1);
    }

    #[test]
    fn test_no_reference_within_threshold() {
        let store = store(&[
            ("poseA", "ffffffffffffffff"),
            ("poseB", "ffffffff00000000"),
        ]);
        let signature = Signature::from_hex("0000000000000000").unwrap();

        let result = classify(7, &signature, &store, 5).unwrap();
        assert!(result.matched.is_none());
    }

    #[test]
    fn test_mismatched_store_raises() {
        let store = store(&[("poseA", "0000")]);
        let signature = Signature::from_hex("0000000000000000").unwrap();

        assert!(classify(1, &signature, &store, 5).is_err());
    }
}
