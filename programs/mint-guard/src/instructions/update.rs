// Update instruction for the mint guard
// Replaces the whole guard configuration in a single step
use crate::{
    context::AccountView,
    state::{GuardAccount, GuardData},
};
use anchor_lang::prelude::*;

/// Replaces the configuration of `account`
///
/// Fails without modifying the account if the signer is not the authority,
/// a group label is duplicated, or the account would grow by more than the
/// per-update limit.
pub fn update(account: &mut GuardAccount, signer: &AccountView, data: &GuardData) -> Result<()> {
    account.update(signer, data)?;

    msg!(
        "Mint guard {} updated: {} default guards, {} groups",
        account.key,
        data.default.len(),
        data.groups.len()
    );

    Ok(())
}

/// Same as [`update`], taking the configuration in its encoded form
pub fn update_from_bytes(
    account: &mut GuardAccount,
    signer: &AccountView,
    data: &[u8],
) -> Result<()> {
    let guard_data = GuardData::load(data)?;
    update(account, signer, &guard_data)
}
