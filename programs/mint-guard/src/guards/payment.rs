use super::*;
use crate::utils::{assert_is_ata, assert_keys_equal};

/// Guard that charges an amount in SOL (lamports) for the mint.
///
/// List of accounts required:
///
///   0. `[writable]` Account to receive the funds.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SolPayment {
    pub lamports: u64,
    pub destination: Pubkey,
}

impl Guard for SolPayment {}

impl Condition for SolPayment {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let destination = evaluation.take_account(ctx, "sol_payment")?;
        assert_keys_equal(&destination.key, &self.destination)?;

        if ctx.payer.lamports < self.lamports {
            msg!(
                "Require {} lamports, account has {} lamports",
                self.lamports,
                ctx.payer.lamports,
            );
            return err!(MintGuardError::NotEnoughSOL);
        }

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let destination = evaluation.account(ctx, "sol_payment")?;
        evaluation.emit(MintEffect::TransferLamports {
            from: *ctx.wallet(),
            to: destination.key,
            lamports: self.lamports,
        });

        Ok(())
    }
}

/// Guard that charges an amount of a specified spl-token as payment for the mint.
///
/// List of accounts required:
///
///   0. `[writable]` Token account holding the required amount.
///   1. `[writable]` Address of the ATA to receive the tokens.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenPayment {
    pub amount: u64,
    pub mint: Pubkey,
    pub destination_ata: Pubkey,
}

impl Guard for TokenPayment {}

impl Condition for TokenPayment {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account_info = evaluation.take_account(ctx, "token_payment")?;
        let destination_ata = evaluation.next_account(ctx)?;

        assert_keys_equal(&destination_ata.key, &self.destination_ata)?;
        let token_account = assert_is_ata(token_account_info, ctx.wallet(), &self.mint)?;

        if token_account.amount < self.amount {
            msg!(
                "Require {} tokens, account has {} tokens",
                self.amount,
                token_account.amount,
            );
            return err!(MintGuardError::NotEnoughTokens);
        }

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let index = evaluation.index_of("token_payment")?;
        let source = EvaluationContext::get_account_info(ctx, index)?;
        let destination = EvaluationContext::get_account_info(ctx, index + 1)?;

        evaluation.emit(MintEffect::TransferTokens {
            source: source.key,
            destination: destination.key,
            authority: *ctx.wallet(),
            amount: self.amount,
        });

        Ok(())
    }
}
