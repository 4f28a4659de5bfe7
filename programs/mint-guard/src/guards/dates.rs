use super::*;

/// Guard that sets a specific start date for the mint.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StartDate {
    pub date: i64,
}

impl Guard for StartDate {}

impl Condition for StartDate {
    fn validate(&self, ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        if ctx.now() < self.date {
            msg!("Mint starts at {}, current time {}", self.date, ctx.now());
            return err!(MintGuardError::MintNotLive);
        }

        Ok(())
    }
}

/// Guard that sets a specific date for the mint to stop.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EndDate {
    pub date: i64,
}

impl Guard for EndDate {}

impl Condition for EndDate {
    fn validate(&self, ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        if ctx.now() >= self.date {
            msg!("Mint ended at {}, current time {}", self.date, ctx.now());
            return err!(MintGuardError::AfterEndDate);
        }

        Ok(())
    }
}
