use super::*;
use crate::{
    utils::cmp_pubkeys, ASSOCIATED_TOKEN_PROGRAM_ID, CANDY_MACHINE_PROGRAM_ID,
    MAX_PROGRAM_GATE_ADDRESSES, TOKEN_PROGRAM_ID,
};

/// Default list of authorized programs.
pub const DEFAULT_PROGRAMS: [Pubkey; 5] = [
    crate::ID,
    CANDY_MACHINE_PROGRAM_ID,
    anchor_lang::system_program::ID,
    TOKEN_PROGRAM_ID,
    ASSOCIATED_TOKEN_PROGRAM_ID,
];

/// Guard that restricts the programs that can be in a mint transaction. The guard allows the
/// necessary programs for the mint and any other program specified in the configuration.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramGate {
    pub additional: Vec<Pubkey>,
}

impl ProgramGate {
    fn is_authorized(&self, program_id: &Pubkey) -> bool {
        DEFAULT_PROGRAMS
            .iter()
            .chain(self.additional.iter())
            .any(|program| cmp_pubkeys(program, program_id))
    }
}

impl Guard for ProgramGate {
    fn check(&self) -> Result<()> {
        if self.additional.len() > MAX_PROGRAM_GATE_ADDRESSES {
            msg!(
                "Program gate allows at most {} additional programs, got {}",
                MAX_PROGRAM_GATE_ADDRESSES,
                self.additional.len()
            );
            return err!(MintGuardError::ExceededProgramListSize);
        }
        Ok(())
    }
}

impl Condition for ProgramGate {
    fn validate(&self, ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        for program_id in ctx.instructions {
            if !self.is_authorized(program_id) {
                msg!("Transaction had ix with program id {}", program_id);
                return err!(MintGuardError::UnauthorizedProgramFound);
            }
        }

        Ok(())
    }
}
