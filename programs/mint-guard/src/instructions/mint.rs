// Mint instruction for the mint guard
// Resolves the active guard set and evaluates the attempt against it
use crate::{
    context::MintContext,
    guards::{GuardEvaluator, MintOutcome},
    state::{GuardAccount, RecordStore},
    utils::assert_keys_equal,
};
use anchor_lang::prelude::*;

/// Authorizes a mint attempt
///
/// `label` selects a group; without it the default guard set applies. Record
/// writes are committed to `store` only when the attempt is authorized.
pub fn mint(
    account: &GuardAccount,
    label: Option<&str>,
    ctx: &MintContext,
    store: &mut dyn RecordStore,
) -> Result<MintOutcome> {
    assert_keys_equal(&ctx.candy_guard, &account.key)?;

    let guards = account.active_set(label)?;
    let outcome = GuardEvaluator::new(&guards).evaluate(ctx, store)?;

    if let MintOutcome::BotTaxed { lamports, .. } = &outcome {
        msg!("Mint by {} not authorized, bot tax: {}", ctx.wallet(), lamports);
    }

    Ok(outcome)
}
