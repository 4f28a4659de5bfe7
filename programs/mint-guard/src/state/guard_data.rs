// Guard configuration: a default guard set plus labeled override groups
//
// Layout (immediately after the guard account header):
//   default guard set
//   u32 (little-endian) number of groups
//   per group: 6-byte label (zero-padded) followed by the group's guard set
//
// A group count of zero is the "no groups configured" state. Group resolution
// is an exact label match; labels are unique within a configuration, which is
// checked before anything is written.
use std::collections::BTreeSet;

use super::GuardSet;
use crate::{errors::MintGuardError, MAX_LABEL_SIZE};
use anchor_lang::prelude::*;

/// Size of the group counter
const GROUP_COUNT_SIZE: usize = 4;

// ================================
// Group Label
// ================================

/// Fixed-width group label (1 to 6 bytes of UTF-8)
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    bytes: [u8; MAX_LABEL_SIZE],
    len: u8,
}

impl Label {
    pub fn new(label: &str) -> Result<Self> {
        let raw = label.as_bytes();
        require!(raw.len() <= MAX_LABEL_SIZE, MintGuardError::LabelExceededLength);
        require!(
            !raw.is_empty() && !raw.contains(&0),
            MintGuardError::InvalidGroupLabel
        );

        let mut bytes = [0u8; MAX_LABEL_SIZE];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            bytes,
            len: raw.len() as u8,
        })
    }

    /// Decodes a zero-padded label from its wire form
    pub fn from_wire(wire: &[u8; MAX_LABEL_SIZE]) -> Result<Self> {
        let len = wire.iter().position(|b| *b == 0).unwrap_or(MAX_LABEL_SIZE);
        if wire[len..].iter().any(|b| *b != 0) {
            return err!(MintGuardError::DeserializationError);
        }
        let label = std::str::from_utf8(&wire[..len])
            .map_err(|_| error!(MintGuardError::DeserializationError))?;
        Self::new(label).map_err(|_| error!(MintGuardError::DeserializationError))
    }

    pub fn as_str(&self) -> &str {
        // constructed from a &str, so always valid UTF-8
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }

    /// Zero-padded wire form
    pub const fn to_wire(&self) -> [u8; MAX_LABEL_SIZE] {
        self.bytes
    }
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Label({:?})", self.as_str())
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Label {
    type Err = anchor_lang::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ================================
// Groups
// ================================

/// A labeled guard set selectable per mint attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub label: Label,
    pub guards: GuardSet,
}

impl Group {
    pub fn new(label: &str, guards: GuardSet) -> Result<Self> {
        Ok(Self {
            label: Label::new(label)?,
            guards,
        })
    }

    pub fn size(&self) -> usize {
        MAX_LABEL_SIZE + self.guards.size()
    }
}

// ================================
// Guard Data
// ================================

/// Complete guard configuration stored on a guard account
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardData {
    /// Guards applied when no group is requested
    pub default: GuardSet,
    /// Labeled overrides; empty means no groups are configured
    pub groups: Vec<Group>,
}

impl GuardData {
    #[must_use]
    pub fn new(default: GuardSet) -> Self {
        Self {
            default,
            groups: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Checks the invariants that must hold before the data is persisted
    pub fn validate(&self) -> Result<()> {
        require!(
            self.groups.len() <= u32::MAX as usize,
            MintGuardError::NumericalOverflowError
        );

        let mut seen = BTreeSet::new();
        for group in &self.groups {
            if !seen.insert(group.label) {
                msg!("Duplicated group label: {}", group.label);
                return err!(MintGuardError::DuplicatedGroupLabel);
            }
        }

        Ok(())
    }

    /// Encoded size of the configuration (without the account header)
    pub fn size(&self) -> usize {
        self.default.size()
            + GROUP_COUNT_SIZE
            + self.groups.iter().map(Group::size).sum::<usize>()
    }

    // ================================
    // Encoding
    // ================================

    /// Serializes the configuration into `data`, returning the bytes written
    pub fn save(&self, data: &mut [u8]) -> Result<usize> {
        self.validate()?;
        require!(data.len() >= self.size(), MintGuardError::InvalidAccountSize);

        let mut cursor = self.default.save(data)?;

        data[cursor..cursor + GROUP_COUNT_SIZE]
            .copy_from_slice(&(self.groups.len() as u32).to_le_bytes());
        cursor += GROUP_COUNT_SIZE;

        for group in &self.groups {
            data[cursor..cursor + MAX_LABEL_SIZE].copy_from_slice(&group.label.to_wire());
            cursor += MAX_LABEL_SIZE;
            cursor += group.guards.save(&mut data[cursor..])?;
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

    pub fn load(data: &[u8]) -> Result<Self> {
        let (default, mut cursor) = GuardSet::from_bytes(data)?;
        let group_count = read_group_count(data, cursor)?;
        cursor += GROUP_COUNT_SIZE;

        let mut groups = Vec::new();
        for _ in 0..group_count {
            let label = Label::from_wire(&read_label(data, cursor)?)?;
            cursor += MAX_LABEL_SIZE;
            let (guards, consumed) = GuardSet::decode(data, cursor)?;
            cursor += consumed;
            groups.push(Group { label, guards });
        }

        let guard_data = Self { default, groups };
        guard_data.validate()?;
        Ok(guard_data)
    }

    // ================================
    // Group Resolution
    // ================================

    /// Selects the guard set for an attempt
    ///
    /// Without a label the default set applies. With a label, the matching
    /// group's set is returned; asking for a label when no groups exist is
    /// reported separately from asking for a label that does not exist.
    pub fn resolve(&self, label: Option<&str>) -> Result<&GuardSet> {
        let Some(label) = label else {
            return Ok(&self.default);
        };

        if self.groups.is_empty() {
            return err!(MintGuardError::RequiredGroupLabelNotFound);
        }

        self.groups
            .iter()
            .find(|group| group.label.as_str() == label)
            .map(|group| &group.guards)
            .ok_or_else(|| error!(MintGuardError::GroupNotFound))
    }

    /// Same as [`GuardData::resolve`], but reads straight from encoded data:
    /// groups before the match are skipped using their feature mask only
    pub fn active_set(data: &[u8], label: Option<&str>) -> Result<GuardSet> {
        let (default, mut cursor) = GuardSet::from_bytes(data)?;
        let Some(label) = label else {
            return Ok(default);
        };

        let group_count = read_group_count(data, cursor)?;
        cursor += GROUP_COUNT_SIZE;

        if group_count == 0 {
            return err!(MintGuardError::RequiredGroupLabelNotFound);
        }

        for _ in 0..group_count {
            let wire = read_label(data, cursor)?;
            cursor += MAX_LABEL_SIZE;

            if Label::from_wire(&wire)?.as_str() == label {
                let (guards, _) = GuardSet::decode(data, cursor)?;
                return Ok(guards);
            }
            cursor += GuardSet::encoded_len(data, cursor)?;
        }

        err!(MintGuardError::GroupNotFound)
    }
}

fn read_group_count(data: &[u8], offset: usize) -> Result<u32> {
    let bytes: [u8; GROUP_COUNT_SIZE] = data
        .get(offset..offset + GROUP_COUNT_SIZE)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| error!(MintGuardError::MalformedGuardSet))?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_label(data: &[u8], offset: usize) -> Result<[u8; MAX_LABEL_SIZE]> {
    data.get(offset..offset + MAX_LABEL_SIZE)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| error!(MintGuardError::MalformedGuardSet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::{EndDate, MintLimit, RedeemedAmount, StartDate};

    fn vip_ogs() -> (GuardData, GuardSet, GuardSet) {
        let g1 = GuardSet::new().with(StartDate { date: 10 });
        let g2 = GuardSet::new()
            .with(MintLimit { id: 2, limit: 3 })
            .with(EndDate { date: 99 });
        let data = GuardData::new(GuardSet::new().with(RedeemedAmount { maximum: 5 }))
            .with_group(Group::new("VIP", g1.clone()).unwrap())
            .with_group(Group::new("OGs", g2.clone()).unwrap());
        (data, g1, g2)
    }

    #[test]
    fn label_bounds() {
        assert_eq!(Label::new("ABCDEF").unwrap().as_str(), "ABCDEF");
        assert_eq!(
            Label::new("ABCDEFG").unwrap_err(),
            MintGuardError::LabelExceededLength.into()
        );
        assert_eq!(Label::new("").unwrap_err(), MintGuardError::InvalidGroupLabel.into());
        assert_eq!(Label::new("a\0").unwrap_err(), MintGuardError::InvalidGroupLabel.into());
    }

    #[test]
    fn label_wire_form_is_zero_padded() {
        let label = Label::new("VIP").unwrap();
        assert_eq!(&label.to_wire(), b"VIP\0\0\0");
        assert_eq!(Label::from_wire(b"VIP\0\0\0").unwrap(), label);
        assert_eq!(
            Label::from_wire(b"VI\0P\0\0").unwrap_err(),
            MintGuardError::DeserializationError.into()
        );
    }

    #[test]
    fn empty_configuration_layout() {
        let data = GuardData::default();
        assert_eq!(data.to_bytes().unwrap(), vec![0u8; 12]);

        let loaded = GuardData::load(&[0u8; 12]).unwrap();
        assert!(!loaded.has_groups());
        assert!(loaded.default.is_empty());
    }

    #[test]
    fn groups_present_but_empty_are_kept() {
        let data = GuardData::default()
            .with_group(Group::new("A", GuardSet::new()).unwrap())
            .with_group(Group::new("B", GuardSet::new()).unwrap());
        let loaded = GuardData::load(&data.to_bytes().unwrap()).unwrap();
        assert_eq!(loaded.groups.len(), 2);
        assert_eq!(loaded, data);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let data = GuardData::default()
            .with_group(Group::new("VIP", GuardSet::new()).unwrap())
            .with_group(Group::new("VIP", GuardSet::new().with(StartDate { date: 1 })).unwrap());

        assert_eq!(data.validate().unwrap_err(), MintGuardError::DuplicatedGroupLabel.into());
        assert_eq!(
            data.to_bytes().unwrap_err(),
            MintGuardError::DuplicatedGroupLabel.into()
        );
    }

    #[test]
    fn resolve_groups() {
        let (data, g1, g2) = vip_ogs();

        assert_eq!(data.resolve(Some("VIP")).unwrap(), &g1);
        assert_eq!(data.resolve(Some("OGs")).unwrap(), &g2);
        assert_eq!(data.resolve(None).unwrap(), &data.default);
        assert_eq!(
            data.resolve(Some("X")).unwrap_err(),
            MintGuardError::GroupNotFound.into()
        );

        let no_groups = GuardData::new(GuardSet::new());
        assert_eq!(
            no_groups.resolve(Some("VIP")).unwrap_err(),
            MintGuardError::RequiredGroupLabelNotFound.into()
        );
    }

    #[test]
    fn active_set_matches_resolve() {
        let (data, g1, g2) = vip_ogs();
        let bytes = data.to_bytes().unwrap();

        assert_eq!(GuardData::active_set(&bytes, Some("VIP")).unwrap(), g1);
        assert_eq!(GuardData::active_set(&bytes, Some("OGs")).unwrap(), g2);
        assert_eq!(GuardData::active_set(&bytes, None).unwrap(), data.default);
        assert_eq!(
            GuardData::active_set(&bytes, Some("nope")).unwrap_err(),
            MintGuardError::GroupNotFound.into()
        );
    }

    #[test]
    fn truncated_groups_are_malformed() {
        let (data, _, _) = vip_ogs();
        let bytes = data.to_bytes().unwrap();
        assert_eq!(
            GuardData::load(&bytes[..bytes.len() - 2]).unwrap_err(),
            MintGuardError::MalformedGuardSet.into()
        );
    }
}
