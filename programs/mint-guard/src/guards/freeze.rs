// Freeze payment guards: payment held in escrow while the minted NFT is frozen
//
// The payment (lamports or tokens) goes to a freeze escrow record instead of
// the destination, and every minted NFT is frozen under the escrow's authority.
// Holders thaw their NFTs once thawing is enabled (all items redeemed, or the
// freeze period since the first mint elapsed); the authority can unlock the
// escrowed funds once every NFT was thawed.
//
// ROUTE: The first byte of the route data selects the `FreezeInstruction`.
//
//   Initialize   [escrow, authority (signer)]   data[1..9] = freeze period (i64)
//   Thaw         [escrow, nft token account, owner (optional, defaults to payer)]
//   UnlockFunds  [escrow, authority (signer), destination]
use super::*;
use crate::{
    context::TokenAccountState,
    state::load_record,
    utils::{assert_is_ata, assert_keys_equal, assert_owned_by, cmp_pubkeys, find_record_address},
    FREEZE_ESCROW_SEED, MAX_FREEZE_PERIOD, TOKEN_PROGRAM_ID,
};
use anchor_spl::associated_token::get_associated_token_address;

/// PDA that holds the escrowed payment and the freeze authority.
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct FreezeEscrow {
    /// Candy machine the escrow belongs to
    pub candy_machine: Pubkey,
    /// Candy guard the escrow belongs to
    pub candy_guard: Pubkey,
    /// Token mint of the escrowed payment (`None` for lamports)
    pub mint: Option<Pubkey>,
    /// Address that receives the funds once unlocked
    pub destination: Pubkey,
    /// Thawing enabled regardless of the freeze period
    pub allow_thaw: bool,
    /// Number of NFTs currently frozen
    pub frozen_count: u64,
    /// Time of the first mint paid into the escrow
    pub first_mint_time: Option<i64>,
    /// Freeze period in seconds
    pub freeze_period: i64,
}

impl FreezeEscrow {
    pub fn address(destination: &Pubkey, candy_guard: &Pubkey, candy_machine: &Pubkey) -> Pubkey {
        find_record_address(&[
            FREEZE_ESCROW_SEED,
            destination.as_ref(),
            candy_guard.as_ref(),
            candy_machine.as_ref(),
        ])
    }

    pub fn is_thaw_allowed(&self, items_redeemed: u64, items_available: u64, now: i64) -> bool {
        if self.allow_thaw || items_redeemed >= items_available {
            return true;
        }

        self.first_mint_time
            .and_then(|first_mint_time| first_mint_time.checked_add(self.freeze_period))
            .is_some_and(|thaw_time| now >= thaw_time)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreezeInstruction {
    Initialize,
    Thaw,
    UnlockFunds,
}

impl FreezeInstruction {
    /// Reads the instruction selector from the first byte of route data
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut selector = data
            .get(..1)
            .ok_or_else(|| error!(MintGuardError::MissingFreezeInstruction))?;
        Self::deserialize(&mut selector).map_err(|_| error!(MintGuardError::MissingFreezeInstruction))
    }
}

// ================================
// Shared Freeze Logic
// ================================

/// Escrow parameters of one freeze guard
struct FreezeTarget<'g> {
    name: &'static str,
    destination: &'g Pubkey,
    mint: Option<Pubkey>,
}

impl FreezeTarget<'_> {
    fn route(&self, ctx: &RouteContext, data: &[u8], store: &dyn RecordStore) -> Result<RouteResult> {
        let instruction = FreezeInstruction::read(data)?;
        let accounts = ctx.remaining_accounts;
        let account = |index: usize| {
            accounts
                .get(index)
                .ok_or_else(|| error!(MintGuardError::MissingRemainingAccount))
        };

        let escrow_key = FreezeEscrow::address(self.destination, &ctx.candy_guard, &ctx.candy_machine);
        let escrow_info = account(0)?;
        assert_keys_equal(&escrow_info.key, &escrow_key)?;

        let mut result = RouteResult::default();

        match instruction {
            FreezeInstruction::Initialize => {
                msg!("{}: initialize", self.name);

                assert_authority(account(1)?, ctx)?;

                if store.contains(&escrow_key) {
                    return err!(MintGuardError::FreezeEscrowAlreadyExists);
                }

                // bytes 1..9 follow the instruction selector
                let freeze_period = data
                    .get(1..9)
                    .and_then(|bytes| bytes.try_into().ok())
                    .map(i64::from_le_bytes)
                    .ok_or_else(|| error!(MintGuardError::MissingFreezePeriod))?;

                if freeze_period > MAX_FREEZE_PERIOD {
                    return err!(MintGuardError::ExceededMaximumFreezePeriod);
                }

                let escrow = FreezeEscrow {
                    candy_machine: ctx.candy_machine,
                    candy_guard: ctx.candy_guard,
                    mint: self.mint,
                    destination: *self.destination,
                    allow_thaw: false,
                    frozen_count: 0,
                    first_mint_time: None,
                    freeze_period,
                };
                result.staged.stage(escrow_key, &escrow)?;
            }
            FreezeInstruction::Thaw => {
                msg!("{}: thaw", self.name);

                let mut escrow = load_escrow(store, &escrow_key)?;
                if !escrow.is_thaw_allowed(ctx.items_redeemed, ctx.items_available, ctx.now()) {
                    return err!(MintGuardError::ThawNotEnabled);
                }

                let nft_account = account(1)?;
                assert_owned_by(nft_account, &TOKEN_PROGRAM_ID)?;
                let nft_token: &TokenAccountState = nft_account
                    .token()
                    .ok_or_else(|| error!(MintGuardError::Uninitialized))?;

                if nft_token.is_frozen {
                    // only NFTs frozen by this escrow count against it
                    if nft_token.delegate != Some(escrow_key) {
                        msg!("Token account {} is not delegated to the escrow", nft_account.key);
                        return err!(MintGuardError::PublicKeyMismatch);
                    }
                    let owner = accounts.get(2).map_or(ctx.wallet(), |owner| &owner.key);
                    assert_keys_equal(&nft_token.owner, owner)?;

                    escrow.frozen_count = escrow.frozen_count.saturating_sub(1);
                    result.effects.push(MintEffect::ThawNft {
                        escrow: escrow_key,
                        token_account: nft_account.key,
                        mint: nft_token.mint,
                    });
                    result.staged.stage(escrow_key, &escrow)?;
                } else {
                    msg!("Token account is not frozen");
                }
            }
            FreezeInstruction::UnlockFunds => {
                msg!("{}: unlock_funds", self.name);

                let escrow = load_escrow(store, &escrow_key)?;
                assert_authority(account(1)?, ctx)?;

                // all NFTs must be thawed
                if escrow.frozen_count > 0 {
                    msg!("{} NFTs still frozen", escrow.frozen_count);
                    return err!(MintGuardError::UnlockNotEnabled);
                }

                let destination = account(2)?;
                assert_keys_equal(&destination.key, self.destination)?;

                result.staged.remove(escrow_key);
                result.effects.push(MintEffect::ReleaseFunds {
                    escrow: escrow_key,
                    destination: destination.key,
                });
            }
        }

        Ok(result)
    }

    /// Checks the escrow and NFT accounts; returns the escrow key
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<Pubkey> {
        let escrow_info = evaluation.take_account(ctx, self.name)?;
        let escrow_key = FreezeEscrow::address(self.destination, &ctx.candy_guard, &ctx.candy_machine);
        assert_keys_equal(&escrow_info.key, &escrow_key)?;

        if evaluation.load_record::<FreezeEscrow>(&escrow_key)?.is_none() {
            return err!(MintGuardError::FreezeNotInitialized);
        }

        let nft_ata = evaluation.next_account(ctx)?;
        assert_keys_equal(
            &nft_ata.key,
            &get_associated_token_address(ctx.wallet(), &ctx.nft_mint),
        )?;

        Ok(escrow_key)
    }

    /// Counts the minted NFT in the escrow and freezes it
    fn post_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let index = evaluation.index_of(self.name)?;
        let escrow_key = EvaluationContext::get_account_info(ctx, index)?.key;
        let nft_ata = EvaluationContext::get_account_info(ctx, index + 1)?.key;

        let mut escrow = load_escrow_staged(evaluation, &escrow_key)?;
        escrow.frozen_count = escrow
            .frozen_count
            .checked_add(1)
            .ok_or_else(|| error!(MintGuardError::NumericalOverflowError))?;
        if escrow.first_mint_time.is_none() {
            escrow.first_mint_time = Some(ctx.now());
        }
        evaluation.stage(escrow_key, &escrow)?;

        evaluation.emit(MintEffect::FreezeNft {
            escrow: escrow_key,
            token_account: nft_ata,
            mint: ctx.nft_mint,
        });

        Ok(())
    }
}

fn assert_authority(authority: &AccountView, ctx: &RouteContext) -> Result<()> {
    if !(cmp_pubkeys(&authority.key, &ctx.authority) && authority.is_signer) {
        msg!("Signer={}, Authority={}", authority.key, ctx.authority);
        return err!(MintGuardError::MissingRequiredSignature);
    }
    Ok(())
}

fn load_escrow(store: &dyn RecordStore, key: &Pubkey) -> Result<FreezeEscrow> {
    load_record::<FreezeEscrow>(store, key)?.ok_or_else(|| error!(MintGuardError::FreezeNotInitialized))
}

fn load_escrow_staged(evaluation: &EvaluationContext, key: &Pubkey) -> Result<FreezeEscrow> {
    evaluation
        .load_record::<FreezeEscrow>(key)?
        .ok_or_else(|| error!(MintGuardError::FreezeNotInitialized))
}

// ================================
// Freeze Sol Payment
// ================================

/// Guard that charges an amount in SOL (lamports) for the mint with a freeze period.
///
/// List of accounts required:
///
///   0. `[writable]` Freeze escrow PDA (seeds `["freeze_escrow", destination,
///                   candy guard, candy machine]`).
///   1. `[]` Associated token account of the minted NFT.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FreezeSolPayment {
    pub lamports: u64,
    pub destination: Pubkey,
}

impl FreezeSolPayment {
    fn target(&self) -> FreezeTarget<'_> {
        FreezeTarget {
            name: "freeze_sol_payment",
            destination: &self.destination,
            mint: None,
        }
    }
}

impl Guard for FreezeSolPayment {
    fn instruction(
        &self,
        ctx: &RouteContext,
        data: &[u8],
        store: &dyn RecordStore,
    ) -> Result<RouteResult> {
        self.target().route(ctx, data, store)
    }
}

impl Condition for FreezeSolPayment {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        self.target().validate(ctx, evaluation)?;

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
        let escrow = evaluation.account(ctx, "freeze_sol_payment")?;
        evaluation.emit(MintEffect::TransferLamports {
            from: *ctx.wallet(),
            to: escrow.key,
            lamports: self.lamports,
        });

        Ok(())
    }

    fn post_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        self.target().post_actions(ctx, evaluation)
    }
}

// ================================
// Freeze Token Payment
// ================================

/// Guard that charges an amount of a specified spl-token for the mint with a
/// freeze period.
///
/// List of accounts required:
///
///   0. `[writable]` Freeze escrow PDA (seeds `["freeze_escrow", destination_ata,
///                   candy guard, candy machine]`).
///   1. `[]` Associated token account of the minted NFT.
///   2. `[writable]` Token account holding the payment.
///   3. `[writable]` Associated token account of the escrow for `mint`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FreezeTokenPayment {
    pub amount: u64,
    pub mint: Pubkey,
    pub destination_ata: Pubkey,
}

impl FreezeTokenPayment {
    fn target(&self) -> FreezeTarget<'_> {
        FreezeTarget {
            name: "freeze_token_payment",
            destination: &self.destination_ata,
            mint: Some(self.mint),
        }
    }
}

impl Guard for FreezeTokenPayment {
    fn instruction(
        &self,
        ctx: &RouteContext,
        data: &[u8],
        store: &dyn RecordStore,
    ) -> Result<RouteResult> {
        self.target().route(ctx, data, store)
    }
}

impl Condition for FreezeTokenPayment {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let escrow_key = self.target().validate(ctx, evaluation)?;

        let token_account_info = evaluation.next_account(ctx)?;
        let token_account = assert_is_ata(token_account_info, ctx.wallet(), &self.mint)?;

        if token_account.amount < self.amount {
            msg!(
                "Require {} tokens, account has {} tokens",
                self.amount,
                token_account.amount,
            );
            return err!(MintGuardError::NotEnoughTokens);
        }

        let escrow_ata = evaluation.next_account(ctx)?;
        assert_keys_equal(
            &escrow_ata.key,
            &get_associated_token_address(&escrow_key, &self.mint),
        )?;

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let index = evaluation.index_of("freeze_token_payment")?;
        let source = EvaluationContext::get_account_info(ctx, index + 2)?;
        let escrow_ata = EvaluationContext::get_account_info(ctx, index + 3)?;

        evaluation.emit(MintEffect::TransferTokens {
            source: source.key,
            destination: escrow_ata.key,
            authority: *ctx.wallet(),
            amount: self.amount,
        });

        Ok(())
    }

    fn post_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        self.target().post_actions(ctx, evaluation)
    }
}
