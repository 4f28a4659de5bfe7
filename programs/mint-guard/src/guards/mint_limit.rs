use super::*;
use crate::{
    state::load_record,
    utils::{assert_keys_equal, find_record_address},
    MINT_LIMIT_SEED,
};

/// Configurations options for mint limit.
///
/// List of accounts required:
///
///   0. `[writable]` Mint counter PDA. The PDA is derived
///                   using the seed `["mint_limit", mint guard id, payer key,
///                   candy guard pubkey, candy machine pubkey]`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MintLimit {
    /// Unique identifier of the mint limit.
    pub id: u8,
    /// Limit of mints per individual address.
    pub limit: u16,
}

/// PDA to track the number of mints for an individual address.
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct MintCounter {
    pub count: u16,
}

impl MintLimit {
    /// Address of the counter for `wallet`
    pub fn counter_address(
        &self,
        wallet: &Pubkey,
        candy_guard: &Pubkey,
        candy_machine: &Pubkey,
    ) -> Pubkey {
        find_record_address(&[
            MINT_LIMIT_SEED,
            &[self.id],
            wallet.as_ref(),
            candy_guard.as_ref(),
            candy_machine.as_ref(),
        ])
    }
}

impl Guard for MintLimit {
    /// Returns the current counter of the payer (u16, little-endian).
    fn instruction(
        &self,
        ctx: &RouteContext,
        _data: &[u8],
        store: &dyn RecordStore,
    ) -> Result<RouteResult> {
        let key = self.counter_address(ctx.wallet(), &ctx.candy_guard, &ctx.candy_machine);
        let count = load_record::<MintCounter>(store, &key)?
            .map(|counter| counter.count)
            .unwrap_or_default();

        msg!("MintLimit: {} of {} used by {}", count, self.limit, ctx.wallet());

        Ok(RouteResult {
            return_data: Some(count.to_le_bytes().to_vec()),
            ..RouteResult::default()
        })
    }
}

impl Condition for MintLimit {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let counter = evaluation.take_account(ctx, "mint_limit")?;
        let key = self.counter_address(ctx.wallet(), &ctx.candy_guard, &ctx.candy_machine);
        assert_keys_equal(&counter.key, &key)?;

        match evaluation.load_record::<MintCounter>(&key)? {
            Some(mint_counter) if mint_counter.count >= self.limit => {
                msg!("Mint limit of {} reached for {}", self.limit, ctx.wallet());
                return err!(MintGuardError::AllowedMintLimitReached);
            }
            // sanity check: if the limit is set to less than 1 we cannot proceed
            None if self.limit < 1 => return err!(MintGuardError::AllowedMintLimitReached),
            _ => {}
        }

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let counter = evaluation.account(ctx, "mint_limit")?;
        let mut mint_counter = evaluation
            .load_record::<MintCounter>(&counter.key)?
            .unwrap_or_default();

        mint_counter.count = mint_counter
            .count
            .checked_add(1)
            .ok_or_else(|| error!(MintGuardError::NumericalOverflowError))?;
        evaluation.stage(counter.key, &mint_counter)
    }
}
