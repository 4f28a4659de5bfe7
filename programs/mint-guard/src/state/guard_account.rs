// Guard account: header plus the encoded guard configuration
//
// The account starts with the `CandyGuard` header (discriminator, base, bump,
// authority) and is followed by a flexible amount of guard data. The data is
// only ever replaced as a whole: a new configuration is validated and encoded
// into a fresh buffer first, and swapped in only when every check passed, so a
// reader never observes a half-written configuration.
//
// RESIZING: The account may grow on update, but by at most
// `MAX_PERMITTED_DATA_INCREASE` bytes per update (the platform realloc limit).
use super::{GuardData, GuardSet};
use crate::{
    context::AccountView, errors::MintGuardError, utils::assert_keys_equal, DATA_OFFSET, GUARD_SEED,
    MAX_PERMITTED_DATA_INCREASE,
};
use anchor_lang::prelude::*;

/// Header stored at the start of every guard account
#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CandyGuard {
    /// Base key used to generate the PDA
    pub base: Pubkey,
    /// Bump seed
    pub bump: u8,
    /// Authority allowed to update the guard configuration
    pub authority: Pubkey,
}

/// A guard account as allocated on the ledger
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardAccount {
    /// PDA address of the account
    pub key: Pubkey,
    /// Decoded header
    pub header: CandyGuard,
    /// Full account data (header + guard data + unused tail)
    data: Vec<u8>,
}

impl GuardAccount {
    /// PDA address for a guard created from `base`
    pub fn find_address(base: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[GUARD_SEED, base.as_ref()], &crate::ID)
    }

    /// Creates a guard account holding an empty configuration
    pub fn initialize(base: Pubkey, authority: Pubkey) -> Result<Self> {
        let (key, bump) = Self::find_address(&base);
        let header = CandyGuard {
            base,
            bump,
            authority,
        };

        let guard_data = GuardData::default();
        let mut data = Self::encode_header(&header)?;
        data.resize(DATA_OFFSET + guard_data.size(), 0);
        guard_data.save(&mut data[DATA_OFFSET..])?;

        Ok(Self { key, header, data })
    }

    /// Rebuilds a guard account from raw account data
    pub fn from_account_data(key: Pubkey, data: Vec<u8>) -> Result<Self> {
        require!(data.len() >= DATA_OFFSET, MintGuardError::InvalidAccountSize);
        let header = CandyGuard::try_deserialize(&mut &data[..DATA_OFFSET])
            .map_err(|_| error!(MintGuardError::Uninitialized))?;
        Ok(Self { key, header, data })
    }

    fn encode_header(header: &CandyGuard) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(DATA_OFFSET);
        header
            .try_serialize(&mut data)
            .map_err(|_| error!(MintGuardError::InvalidAccountSize))?;
        require!(data.len() == DATA_OFFSET, MintGuardError::InvalidAccountSize);
        Ok(data)
    }

    /// Allocated length of the account
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn account_data(&self) -> &[u8] {
        &self.data
    }

    /// Encoded guard data region
    pub fn guard_data(&self) -> &[u8] {
        &self.data[DATA_OFFSET..]
    }

    /// Decodes the full configuration
    pub fn load(&self) -> Result<GuardData> {
        GuardData::load(self.guard_data())
    }

    /// Guard set that applies to an attempt for `label`
    pub fn active_set(&self, label: Option<&str>) -> Result<GuardSet> {
        GuardData::active_set(self.guard_data(), label)
    }

    /// Replaces the configuration as a single step
    pub fn update(&mut self, signer: &AccountView, new_data: &GuardData) -> Result<()> {
        assert_keys_equal(&signer.key, &self.header.authority)?;
        require!(signer.is_signer, MintGuardError::MissingRequiredSignature);

        new_data.validate()?;

        let required = DATA_OFFSET + new_data.size();
        let current = self.data.len();
        if required > current {
            let increase = required - current;
            if increase > MAX_PERMITTED_DATA_INCREASE {
                msg!(
                    "Account needs {} more bytes, limit is {} per update",
                    increase,
                    MAX_PERMITTED_DATA_INCREASE
                );
                return err!(MintGuardError::DataIncrementLimitExceeded);
            }
        }

        let mut data = self.data[..DATA_OFFSET].to_vec();
        data.resize(required.max(current), 0);
        new_data.save(&mut data[DATA_OFFSET..])?;

        self.data = data;
        Ok(())
    }
}
