//! Roster core - perceptual image classification and membership
//! reconciliation.
//!
//! The library classifies a collection of externally hosted images against a
//! small set of reference signatures and rebuilds a canonical membership set
//! on every run. The rebuilt set is compared against the previously
//! published one; only a membership change triggers a republish.
//!
//! The decision core (signature store, classifier, set builder, reconciler)
//! is pure and synchronous. Everything that touches the network or the disk
//! sits behind the collaborator traits in [`remote`], so the whole pipeline
//! can be driven in tests with the in-memory mocks.
//!
//! # Example
//!
//! ```
//! use roster_core::{classify, Signature, SignatureStore};
//!
//! # fn example() -> roster_core::Result<()> {
//! let store = SignatureStore::from_json(
//!     br#"[{ "name": "poseA", "hash": "deadbeefcafebabe" }]"#,
//! )?;
//! let signature = Signature::from_hex("deadbeefcafebabe")?;
//!
//! let result = classify(12, &signature, &store, 5)?;
//! assert_eq!(result.matched.unwrap().name, "poseA");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod classify;
pub mod error;
#[cfg(feature = "imaging")]
pub mod imaging;
pub mod membership;
#[cfg(feature = "remote")]
pub mod pipeline;
pub mod reconcile;
#[cfg(feature = "remote")]
pub mod remote;
pub mod signature;

// Re-export main types for convenience
pub use classify::{classify, Classification, MatchedReference};
pub use error::{Result, RosterError};
pub use membership::{MembershipBuilder, MembershipSet};
pub use reconcile::{reconcile, PublishDecision};
pub use signature::{Signature, SignatureStore, SIGNATURE_SIZE};

#[cfg(feature = "remote")]
pub use pipeline::{Collaborators, Coordinator, RunOutcome};
