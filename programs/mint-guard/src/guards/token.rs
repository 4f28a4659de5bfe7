use super::*;
use crate::utils::assert_is_ata;

/// Guard that restricts access to addresses that hold the specified spl-token.
///
/// List of accounts required:
///
///   0. `[]` Token account holding the required amount.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenGate {
    pub amount: u64,
    pub mint: Pubkey,
}

impl Guard for TokenGate {}

impl Condition for TokenGate {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account_info = evaluation.next_account(ctx)?;
        let token_account = assert_is_ata(token_account_info, ctx.wallet(), &self.mint)?;

        if token_account.amount < self.amount {
            return err!(MintGuardError::NotEnoughTokens);
        }

        Ok(())
    }
}

/// Guard that requires addresses that hold an amount of a specified spl-token
/// and burns them.
///
/// List of accounts required:
///
///   0. `[writable]` Token account holding the required amount.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenBurn {
    pub amount: u64,
    pub mint: Pubkey,
}

impl Guard for TokenBurn {}

impl Condition for TokenBurn {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account_info = evaluation.take_account(ctx, "token_burn")?;
        let token_account = assert_is_ata(token_account_info, ctx.wallet(), &self.mint)?;

        if token_account.amount < self.amount {
            msg!(
                "Require {} tokens to burn, account has {} tokens",
                self.amount,
                token_account.amount,
            );
            return err!(MintGuardError::NotEnoughTokens);
        }

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account = evaluation.account(ctx, "token_burn")?;
        evaluation.emit(MintEffect::BurnTokens {
            account: token_account.key,
            mint: self.mint,
            authority: *ctx.wallet(),
            amount: self.amount,
        });

        Ok(())
    }
}
