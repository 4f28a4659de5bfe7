// Route instruction for the mint guard
// Dispatches guard-specific operations that run outside the mint path
use crate::{
    context::RouteContext,
    errors::MintGuardError,
    guards::RouteResult,
    state::{GuardAccount, GuardKind, RecordStore},
    utils::assert_keys_equal,
};
use anchor_lang::{error::Error, prelude::*};

/// Arguments of a route instruction
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RouteArgs {
    /// Guard kind that handles the instruction
    pub guard: GuardKind,
    /// Guard-specific instruction data
    pub data: Vec<u8>,
}

/// Routes an instruction to the guard of `args.guard` in the selected guard set
///
/// Record writes produced by the guard are committed to `store` only when the
/// instruction succeeds.
pub fn route(
    account: &GuardAccount,
    args: &RouteArgs,
    label: Option<&str>,
    ctx: &RouteContext,
    store: &mut dyn RecordStore,
) -> Result<RouteResult> {
    assert_keys_equal(&ctx.candy_guard, &account.key)?;
    assert_keys_equal(&ctx.authority, &account.header.authority)?;

    if !args.guard.has_route() {
        msg!("Guard {} has no route instruction", args.guard);
        return err!(MintGuardError::InstructionNotFound);
    }

    let guards = account.active_set(label)?;
    let guard = match guards.get(args.guard) {
        Some(guard) => guard,
        None => {
            msg!("Guard {} is not enabled", args.guard);
            return Err(not_enabled(args.guard));
        }
    };

    let result = guard.instruction(ctx, &args.data, &*store)?;
    result.staged.clone().commit(store);

    Ok(result)
}

fn not_enabled(kind: GuardKind) -> Error {
    match kind {
        GuardKind::AllowList => error!(MintGuardError::AllowedListNotEnabled),
        GuardKind::FreezeSolPayment | GuardKind::FreezeTokenPayment => {
            error!(MintGuardError::FreezeGuardNotEnabled)
        }
        _ => error!(MintGuardError::InstructionNotFound),
    }
}
