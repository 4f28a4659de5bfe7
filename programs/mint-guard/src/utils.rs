// Key and ownership assertions shared by the guards
use crate::{
    context::{AccountView, TokenAccountState},
    errors::MintGuardError,
};
use anchor_lang::prelude::*;

pub fn cmp_pubkeys(a: &Pubkey, b: &Pubkey) -> bool {
    a.as_ref() == b.as_ref()
}

pub fn assert_keys_equal(key1: &Pubkey, key2: &Pubkey) -> Result<()> {
    if !cmp_pubkeys(key1, key2) {
        msg!("Public key mismatch: {} != {}", key1, key2);
        return err!(MintGuardError::PublicKeyMismatch);
    }
    Ok(())
}

pub fn assert_owned_by(account: &AccountView, owner: &Pubkey) -> Result<()> {
    if !cmp_pubkeys(&account.owner, owner) {
        return err!(MintGuardError::IncorrectOwner);
    }
    Ok(())
}

/// Checks that `account` is a token account for `mint` owned by `owner`
pub fn assert_is_token_account<'a>(
    account: &'a AccountView,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<&'a TokenAccountState> {
    assert_owned_by(account, &crate::TOKEN_PROGRAM_ID)?;
    let token_account = account
        .token()
        .ok_or_else(|| error!(MintGuardError::Uninitialized))?;

    if !cmp_pubkeys(&token_account.owner, owner) {
        return err!(MintGuardError::IncorrectOwner);
    }
    assert_keys_equal(&token_account.mint, mint)?;

    Ok(token_account)
}

/// Checks that `account` is the associated token account of `owner` for `mint`
pub fn assert_is_ata<'a>(
    account: &'a AccountView,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<&'a TokenAccountState> {
    let token_account = assert_is_token_account(account, owner, mint)?;
    assert_keys_equal(
        &account.key,
        &anchor_spl::associated_token::get_associated_token_address(owner, mint),
    )?;
    Ok(token_account)
}

/// Derives the address of a PDA record owned by this program
pub fn find_record_address(seeds: &[&[u8]]) -> Pubkey {
    Pubkey::find_program_address(seeds, &crate::ID).0
}
