//! Perceptual signatures and the reference signature store.
//!
//! A signature is a fixed-length perceptual fingerprint of an image; two
//! signatures are only comparable when their lengths match. The store holds
//! the named reference signatures a run classifies against, in the order
//! they appear in the reference file.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, RosterError};

/// Standard signature size in bytes (64 bits, Blockhash64).
pub const SIGNATURE_SIZE: usize = 8;

/// A fixed-length perceptual fingerprint of an image.
///
/// Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Parse a signature from a hexadecimal string.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| RosterError::SignatureData(format!("Invalid hex signature: {e}")))?;
        Ok(Self(bytes))
    }

    /// The signature as a hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hamming distance to another signature: the number of differing bits.
    ///
    /// Both signatures must have the same length; a mismatch returns
    /// [`RosterError::LengthMismatch`] rather than comparing a prefix.
    pub fn distance(&self, other: &Self) -> Result<u32> {
        if self.0.len() != other.0.len() {
            return Err(RosterError::LengthMismatch {
                expected: self.0.len(),
                actual: other.0.len(),
            });
        }

        Ok(self
            .0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }
}

/// One entry of the reference file.
#[derive(Debug, Deserialize)]
struct ReferenceEntry {
    name: String,
    hash: String,
}

/// Ordered set of named reference signatures.
///
/// Iteration order is the order entries appear in the reference file and
/// determines tie-break precedence during classification.
#[derive(Debug, Clone, Default)]
pub struct SignatureStore {
    entries: Vec<(String, Signature)>,
}

impl SignatureStore {
    /// Load the store from a reference file.
    ///
    /// The file is a JSON array of `{ "name": ..., "hash": <hex> }` entries.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            RosterError::SignatureData(format!(
                "Failed to read reference file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&data)
    }

    /// Parse and validate reference entries from JSON bytes.
    ///
    /// Rejects malformed hex, empty signatures, duplicate names, and
    /// entries whose signature lengths disagree with each other.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: Vec<ReferenceEntry> = serde_json::from_slice(data)
            .map_err(|e| RosterError::SignatureData(format!("Malformed reference file: {e}")))?;

        if raw.is_empty() {
            return Err(RosterError::SignatureData(
                "Reference file contains no entries".into(),
            ));
        }

        let mut entries: Vec<(String, Signature)> = Vec::with_capacity(raw.len());
        let mut expected_len: Option<usize> = None;

        for entry in raw {
            let signature = Signature::from_hex(&entry.hash).map_err(|e| {
                RosterError::SignatureData(format!("Reference {}: {e}", entry.name))
            })?;

            if signature.is_empty() {
                return Err(RosterError::SignatureData(format!(
                    "Reference {} has an empty signature",
                    entry.name
                )));
            }

            match expected_len {
                None => expected_len = Some(signature.len()),
                Some(len) if len != signature.len() => {
                    return Err(RosterError::SignatureData(format!(
                        "Reference {} has a {}-byte signature, expected {len}",
                        entry.name,
                        signature.len()
                    )));
                }
                Some(_) => {}
            }

            if entries.iter().any(|(name, _)| name == &entry.name) {
                return Err(RosterError::SignatureData(format!(
                    "Duplicate reference name: {}",
                    entry.name
                )));
            }

            entries.push((entry.name, signature));
        }

        Ok(Self { entries })
    }

    /// Build a store from already-decoded entries, preserving their order.
    pub fn from_entries(entries: Vec<(String, Signature)>) -> Self {
        Self { entries }
    }

    /// Entries in reference-file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.entries.iter().map(|(name, sig)| (name.as_str(), sig))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
