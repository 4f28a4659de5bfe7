use super::*;
use crate::utils::{assert_keys_equal, cmp_pubkeys};

/// Guard that requires a specified signer to validate the transaction.
///
/// List of accounts required:
///
///   0. `[signer]` Signer of the transaction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ThirdPartySigner {
    pub signer_key: Pubkey,
}

impl Guard for ThirdPartySigner {}

impl Condition for ThirdPartySigner {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let signer = evaluation.next_account(ctx)?;

        assert_keys_equal(&signer.key, &self.signer_key)?;
        if !signer.is_signer {
            return err!(MintGuardError::MissingRequiredSignature);
        }

        Ok(())
    }
}

/// Guard that validates if the payer of the transaction has a token from a specified
/// gateway network, in most cases as a way to verify that the payer is not a bot.
///
/// List of accounts required:
///
///   0. `[]` Gateway token account issued to the payer.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Gatekeeper {
    /// The network for the gateway token required
    pub gatekeeper_network: Pubkey,
    /// Whether or not the token should expire after minting.
    pub expire_on_use: bool,
}

impl Guard for Gatekeeper {}

impl Condition for Gatekeeper {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let account = evaluation.take_account(ctx, "gatekeeper")?;
        let token = account
            .gateway_token()
            .ok_or_else(|| error!(MintGuardError::GatewayTokenInvalid))?;

        let expired = token
            .expire_time
            .is_some_and(|expire_time| expire_time <= ctx.now());

        if !cmp_pubkeys(&token.owner, ctx.wallet())
            || !cmp_pubkeys(&token.gatekeeper_network, &self.gatekeeper_network)
            || !token.is_active
            || expired
        {
            msg!("Gateway token {} rejected", account.key);
            return err!(MintGuardError::GatewayTokenInvalid);
        }

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        if self.expire_on_use {
            let gateway_token = evaluation.account(ctx, "gatekeeper")?;
            evaluation.emit(MintEffect::ExpireGatewayToken {
                gateway_token: gateway_token.key,
                gatekeeper_network: self.gatekeeper_network,
            });
        }

        Ok(())
    }
}
