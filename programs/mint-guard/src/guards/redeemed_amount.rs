use super::*;

/// Guard that stops the mint once a specific amount of items were redeemed.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RedeemedAmount {
    pub maximum: u64,
}

impl Guard for RedeemedAmount {}

impl Condition for RedeemedAmount {
    fn validate(&self, ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        if ctx.items_redeemed >= self.maximum {
            return err!(MintGuardError::MaximumRedeemedAmount);
        }

        Ok(())
    }
}
