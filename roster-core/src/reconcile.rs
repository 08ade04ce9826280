//! Change detection between the previously published set and the rebuilt one.

use crate::membership::MembershipSet;

/// The publish decision for a run. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishDecision {
    pub changed: bool,
    pub previous_ids: Vec<String>,
    pub new_ids: Vec<String>,
}

/// Compare the rebuilt set against the previously published one.
///
/// Both key sequences are taken in lexical (string) order and compared for
/// exact equality. Any membership delta, additions or removals alike, flips
/// `changed`; same members in a different internal representation do not.
/// The decision is binary; no minimal diff is computed.
pub fn reconcile(previous: &MembershipSet, current: &MembershipSet) -> PublishDecision {
    let previous_ids: Vec<String> = previous.ids().map(str::to_string).collect();
    let new_ids: Vec<String> = current.ids().map(str::to_string).collect();
    let changed = previous_ids != new_ids;

    PublishDecision {
        changed,
        previous_ids,
        new_ids,
    }
}
