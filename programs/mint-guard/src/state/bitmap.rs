// Feature mask for sparse guard sets
//
// Every encoded guard set starts with a little-endian u64 where bit i is set iff
// the guard kind at position i is present. The mask alone determines how many
// payload bytes follow, which lets readers skip over a guard set (for example
// while scanning groups) without decoding any guard.
//
// Bits at or above `GuardKind::COUNT` are reserved. Decoding rejects them instead
// of ignoring them, so a corrupted or newer-format account fails loudly.
use super::GuardKind;
use crate::errors::MintGuardError;
use anchor_lang::prelude::*;

/// Bit set of enabled guard kinds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureMask(u64);

impl FeatureMask {
    /// Encoded width of the mask
    pub const SIZE: usize = 8;

    /// Bits that correspond to known guard kinds
    pub const KNOWN_BITS: u64 = (1u64 << GuardKind::COUNT) - 1;

    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    pub const fn is_enabled(&self, kind: GuardKind) -> bool {
        self.0 & kind.mask() != 0
    }

    pub fn enable(&mut self, kind: GuardKind) {
        self.0 |= kind.mask();
    }

    pub fn disable(&mut self, kind: GuardKind) {
        self.0 &= !kind.mask();
    }

    /// Set bits that do not map to a known guard kind
    pub const fn reserved_bits(&self) -> u64 {
        self.0 & !Self::KNOWN_BITS
    }

    /// Enabled kinds in canonical order
    pub fn enabled(&self) -> impl Iterator<Item = GuardKind> + '_ {
        GuardKind::ALL
            .into_iter()
            .filter(move |kind| self.is_enabled(*kind))
    }

    pub fn count_set(&self) -> usize {
        (self.0 & Self::KNOWN_BITS).count_ones() as usize
    }

    /// Bytes of guard payload that follow the mask
    pub fn payload_size(&self) -> usize {
        self.enabled().map(GuardKind::size).sum()
    }

    /// Total encoded size of a guard set with this mask
    pub fn encoded_size(&self) -> usize {
        Self::SIZE + self.payload_size()
    }

    /// Reads a mask at `offset`, rejecting short buffers and reserved bits
    pub fn read(data: &[u8], offset: usize) -> Result<Self> {
        let end = offset
            .checked_add(Self::SIZE)
            .ok_or_else(|| error!(MintGuardError::NumericalOverflowError))?;
        let bytes: [u8; 8] = data
            .get(offset..end)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| error!(MintGuardError::MalformedGuardSet))?;

        let mask = Self(u64::from_le_bytes(bytes));
        if mask.reserved_bits() != 0 {
            msg!("Reserved guard bits set: {:#x}", mask.reserved_bits());
            return err!(MintGuardError::MalformedGuardSet);
        }

        Ok(mask)
    }

    pub const fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}
