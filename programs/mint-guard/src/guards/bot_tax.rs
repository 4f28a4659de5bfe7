// Bot tax: a penalty instead of a failure
//
// When enabled, an attempt that fails validation is not rejected. The payer is
// charged `lamports` and the transaction succeeds without minting, which makes
// spamming invalid attempts expensive. The evaluator owns that conversion; the
// guard itself only contributes the transaction-shape check, run after every
// other guard validated.
use super::*;

/// Guard that charges a penalty for invalid transactions.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BotTax {
    /// Penalty charged to the payer
    pub lamports: u64,
    /// Require the mint to be the last instruction of the transaction
    pub last_instruction: bool,
}

impl Guard for BotTax {}

impl Condition for BotTax {
    fn validate(&self, ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        if self.last_instruction && !ctx.is_last_instruction() {
            msg!(
                "Mint instruction {} of {} is not the last",
                ctx.current_instruction + 1,
                ctx.instructions.len()
            );
            return err!(MintGuardError::MintNotLastTransaction);
        }

        Ok(())
    }
}

impl BotTax {
    /// Effect charged instead of failing the attempt
    pub fn charge(&self, payer: &Pubkey) -> MintEffect {
        MintEffect::ChargeBotTax {
            payer: *payer,
            lamports: self.lamports,
        }
    }
}
