use super::*;
use crate::utils::cmp_pubkeys;

/// Guard that restricts access to a specific address.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressGate {
    pub address: Pubkey,
}

impl Guard for AddressGate {}

impl Condition for AddressGate {
    fn validate(&self, ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        if !cmp_pubkeys(&self.address, ctx.wallet()) {
            return err!(MintGuardError::AddressNotAuthorized);
        }

        Ok(())
    }
}
