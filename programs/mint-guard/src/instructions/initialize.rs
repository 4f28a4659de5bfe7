// Initialize instruction for the mint guard
// Creates a guard account with an empty configuration
use crate::state::GuardAccount;
use anchor_lang::prelude::*;

/// Creates the guard account derived from `base`
///
/// The configuration starts empty: no guards in the default set and no groups.
pub fn initialize(base: Pubkey, authority: Pubkey) -> Result<GuardAccount> {
    let account = GuardAccount::initialize(base, authority)?;

    msg!(
        "Mint guard {} initialized by authority: {}",
        account.key,
        authority
    );

    Ok(account)
}
