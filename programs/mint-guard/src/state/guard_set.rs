// Sparse guard set and its binary codec
//
// A guard set maps each guard kind to at most one configuration. In memory it is
// a tagged-variant container keyed by `GuardKind`; on the wire it is the feature
// mask followed by the payload of every enabled guard, concatenated in canonical
// kind order. Insertion order never leaks into the encoding, so two logically
// equal sets always produce identical bytes.
//
// Layout:
//   [0..8)   feature mask (u64, little-endian)
//   [8..)    payload of each enabled kind, fixed width per kind, ascending order
use std::collections::BTreeMap;

use super::{FeatureMask, GuardKind};
use crate::{
    errors::MintGuardError,
    guards::{GuardConfig, GuardVariant},
};
use anchor_lang::prelude::*;

/// The set of guards enabled for the default policy or a group
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardSet {
    guards: BTreeMap<GuardKind, GuardConfig>,
}

impl GuardSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, guard: impl Into<GuardConfig>) -> Self {
        self.set(guard);
        self
    }

    /// Enables a guard, replacing any previous configuration of the same kind
    pub fn set(&mut self, guard: impl Into<GuardConfig>) -> Option<GuardConfig> {
        let guard = guard.into();
        self.guards.insert(guard.kind(), guard)
    }

    pub fn remove(&mut self, kind: GuardKind) -> Option<GuardConfig> {
        self.guards.remove(&kind)
    }

    pub fn get(&self, kind: GuardKind) -> Option<&GuardConfig> {
        self.guards.get(&kind)
    }

    /// Typed access to an enabled guard
    pub fn guard<T: GuardVariant>(&self) -> Option<&T> {
        self.get(T::KIND).and_then(T::from_config)
    }

    pub fn is_enabled(&self, kind: GuardKind) -> bool {
        self.guards.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Enabled guards in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &GuardConfig> {
        self.guards.values()
    }

    pub fn features(&self) -> FeatureMask {
        let mut mask = FeatureMask::new();
        for kind in self.guards.keys() {
            mask.enable(*kind);
        }
        mask
    }

    /// Encoded size: mask plus the width of every enabled guard
    pub fn size(&self) -> usize {
        FeatureMask::SIZE + self.guards.keys().map(|kind| kind.size()).sum::<usize>()
    }

    // ================================
    // Encoding
    // ================================

    /// Writes the guard set at the start of `data`, returning the bytes written
    pub fn save(&self, data: &mut [u8]) -> Result<usize> {
        let size = self.size();
        if data.len() < size {
            return err!(MintGuardError::InvalidAccountSize);
        }

        data[..FeatureMask::SIZE].copy_from_slice(&self.features().to_le_bytes());
        let mut cursor = FeatureMask::SIZE;

        for guard in self.guards.values() {
            let width = guard.kind().size();
            guard.save(&mut data[cursor..cursor + width])?;
            cursor += width;
        }

        Ok(cursor)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = vec![0u8; self.size()];
        self.save(&mut data)?;
        Ok(data)
    }

    // ================================
    // Decoding
    // ================================

    /// Reads a guard set starting at `offset`, returning it with the number
    /// of bytes consumed
    pub fn decode(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let features = FeatureMask::read(data, offset)?;
        let consumed = features.encoded_size();

        let end = offset
            .checked_add(consumed)
            .ok_or_else(|| error!(MintGuardError::NumericalOverflowError))?;
        if data.len() < end {
            msg!(
                "Guard set requires {} bytes, {} available",
                consumed,
                data.len().saturating_sub(offset)
            );
            return err!(MintGuardError::MalformedGuardSet);
        }

        let mut guards = BTreeMap::new();
        let mut cursor = offset + FeatureMask::SIZE;

        for kind in features.enabled() {
            let width = kind.size();
            let guard = GuardConfig::load(kind, &data[cursor..cursor + width])?;
            guards.insert(kind, guard);
            cursor += width;
        }

        Ok((Self { guards }, consumed))
    }

    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize)> {
        Self::decode(data, 0)
    }

    /// Bytes taken by the guard set encoded at `offset`, without decoding guards
    pub fn encoded_len(data: &[u8], offset: usize) -> Result<usize> {
        Ok(FeatureMask::read(data, offset)?.encoded_size())
    }
}
