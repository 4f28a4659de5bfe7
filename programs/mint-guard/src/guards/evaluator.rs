// Guard evaluator - authorizes a mint attempt against one guard set
//
// Evaluation runs in phases over the enabled guards in canonical kind order:
//
//   1. validate      every guard except bot tax, fail-fast; bot tax last
//   2. pre_actions   payments, burns, gateway token expiry
//   3. post_actions  freezing the minted NFT
//   4. commit        staged record writes reach the store
//
// Nothing is committed unless all phases succeed, and the effects are only
// returned for an authorized attempt. A validation failure with bot tax
// enabled is converted into a charge instead of an error.
use super::{BotTax, EvaluationContext, MintEffect};
use crate::{
    context::MintContext,
    state::{GuardKind, GuardSet, RecordStore, StagedWrites},
};
use anchor_lang::{error::Error, prelude::*};

/// Decision for one mint attempt
#[derive(Debug, PartialEq)]
pub enum MintOutcome {
    /// Every guard passed; apply the effects together with the mint
    Authorized { effects: Vec<MintEffect> },
    /// Validation failed and the bot tax applies instead of the error
    BotTaxed {
        lamports: u64,
        error: Error,
        effects: Vec<MintEffect>,
    },
}

impl MintOutcome {
    pub fn is_authorized(&self) -> bool {
        matches!(self, MintOutcome::Authorized { .. })
    }

    pub fn effects(&self) -> &[MintEffect] {
        match self {
            MintOutcome::Authorized { effects } | MintOutcome::BotTaxed { effects, .. } => effects,
        }
    }
}

pub struct GuardEvaluator<'g> {
    guards: &'g GuardSet,
}

impl<'g> GuardEvaluator<'g> {
    pub fn new(guards: &'g GuardSet) -> Self {
        Self { guards }
    }

    /// Evaluates the attempt and commits its record writes on success
    pub fn evaluate(&self, ctx: &MintContext, store: &mut dyn RecordStore) -> Result<MintOutcome> {
        let (outcome, staged) = self.run(ctx, &*store)?;
        staged.commit(store);
        Ok(outcome)
    }

    /// Evaluates the attempt without writing; the staged writes are returned
    /// for the caller to commit atomically with the effects
    pub fn run(
        &self,
        ctx: &MintContext,
        store: &dyn RecordStore,
    ) -> Result<(MintOutcome, StagedWrites)> {
        let mut evaluation = EvaluationContext::new(store);

        if let Err(error) = self.validate(ctx, &mut evaluation) {
            return match self.guards.guard::<BotTax>() {
                Some(bot_tax) => {
                    msg!("Bot tax of {} lamports charged: {}", bot_tax.lamports, error);
                    Ok((
                        MintOutcome::BotTaxed {
                            lamports: bot_tax.lamports,
                            error,
                            effects: vec![bot_tax.charge(ctx.wallet())],
                        },
                        StagedWrites::default(),
                    ))
                }
                None => Err(error),
            };
        }

        for guard in self.guards.iter() {
            guard.condition().pre_actions(ctx, &mut evaluation)?;
        }

        for guard in self.guards.iter() {
            guard.condition().post_actions(ctx, &mut evaluation)?;
        }

        Ok((
            MintOutcome::Authorized {
                effects: evaluation.effects,
            },
            evaluation.staged,
        ))
    }

    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        for guard in self.guards.iter() {
            if guard.kind() == GuardKind::BotTax {
                continue;
            }
            if let Err(error) = guard.condition().validate(ctx, evaluation) {
                msg!("Guard {} failed", guard.kind());
                return Err(error);
            }
        }

        // transaction-shape check runs once every other guard passed
        if let Some(bot_tax) = self.guards.get(GuardKind::BotTax) {
            bot_tax.condition().validate(ctx, evaluation)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::AccountView,
        errors::MintGuardError,
        guards::{EndDate, MintCounter, MintLimit, StartDate},
        state::{load_record, MemoryRecordStore},
    };

    struct Attempt {
        payer: AccountView,
        clock: Clock,
        accounts: Vec<AccountView>,
        instructions: Vec<Pubkey>,
        candy_guard: Pubkey,
        candy_machine: Pubkey,
    }

    impl Attempt {
        fn new(now: i64) -> Self {
            Self {
                payer: AccountView::wallet(Pubkey::new_unique(), 1_000_000_000, true),
                clock: Clock {
                    unix_timestamp: now,
                    ..Clock::default()
                },
                accounts: Vec::new(),
                instructions: vec![crate::ID],
                candy_guard: Pubkey::new_unique(),
                candy_machine: Pubkey::new_unique(),
            }
        }

        fn ctx(&self) -> MintContext<'_> {
            MintContext {
                candy_guard: self.candy_guard,
                candy_machine: self.candy_machine,
                payer: &self.payer,
                nft_mint: Pubkey::new_unique(),
                clock: &self.clock,
                items_redeemed: 0,
                items_available: 100,
                remaining_accounts: &self.accounts,
                mint_args: &[],
                instructions: &self.instructions,
                current_instruction: 0,
            }
        }
    }

    #[test]
    fn empty_set_authorizes() {
        let guards = GuardSet::new();
        let attempt = Attempt::new(0);
        let mut store = MemoryRecordStore::new();

        let outcome = GuardEvaluator::new(&guards)
            .evaluate(&attempt.ctx(), &mut store)
            .unwrap();
        assert_eq!(outcome, MintOutcome::Authorized { effects: vec![] });
    }

    #[test]
    fn first_failing_guard_in_kind_order_wins() {
        // start date (kind 3) is checked before end date (kind 7)
        let guards = GuardSet::new()
            .with(EndDate { date: 10 })
            .with(StartDate { date: 100 });
        let attempt = Attempt::new(50);
        let mut store = MemoryRecordStore::new();

        assert_eq!(
            GuardEvaluator::new(&guards)
                .evaluate(&attempt.ctx(), &mut store)
                .unwrap_err(),
            MintGuardError::MintNotLive.into()
        );
    }

    #[test]
    fn bot_tax_converts_validation_failure() {
        let guards = GuardSet::new()
            .with(BotTax {
                lamports: 10,
                last_instruction: false,
            })
            .with(StartDate { date: 100 });
        let attempt = Attempt::new(0);
        let mut store = MemoryRecordStore::new();

        let outcome = GuardEvaluator::new(&guards)
            .evaluate(&attempt.ctx(), &mut store)
            .unwrap();
        assert_eq!(
            outcome,
            MintOutcome::BotTaxed {
                lamports: 10,
                error: MintGuardError::MintNotLive.into(),
                effects: vec![MintEffect::ChargeBotTax {
                    payer: attempt.payer.key,
                    lamports: 10,
                }],
            }
        );
        assert!(!outcome.is_authorized());
    }

    #[test]
    fn bot_tax_last_instruction_check() {
        let guards = GuardSet::new().with(BotTax {
            lamports: 5,
            last_instruction: true,
        });
        let mut attempt = Attempt::new(0);
        attempt.instructions.push(Pubkey::new_unique());
        let mut store = MemoryRecordStore::new();

        let outcome = GuardEvaluator::new(&guards)
            .evaluate(&attempt.ctx(), &mut store)
            .unwrap();
        match outcome {
            MintOutcome::BotTaxed { error, .. } => {
                assert_eq!(error, MintGuardError::MintNotLastTransaction.into());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn failed_attempt_commits_nothing() {
        let limit = MintLimit { id: 1, limit: 2 };
        let guards = GuardSet::new()
            .with(limit.clone())
            .with(EndDate { date: 10 });

        let mut attempt = Attempt::new(50);
        let counter =
            limit.counter_address(&attempt.payer.key, &attempt.candy_guard, &attempt.candy_machine);
        attempt.accounts.push(AccountView::address(counter));
        let mut store = MemoryRecordStore::new();

        assert_eq!(
            GuardEvaluator::new(&guards)
                .evaluate(&attempt.ctx(), &mut store)
                .unwrap_err(),
            MintGuardError::AfterEndDate.into()
        );
        assert!(load_record::<MintCounter>(&store, &counter).unwrap().is_none());
    }
}
