// Guard catalog: conditions checked before a mint is authorized
//
// Every guard kind is a small fixed-width configuration struct implementing
// `Condition` (the check and its effects) and `Guard` (its codec and optional
// route instruction). `GuardConfig` is the tagged union over all kinds and is
// what a `GuardSet` stores; the variant list below must follow `GuardKind`.
//
// EVALUATION: Guards never touch the ledger. They read the attempt through
// `MintContext`, consume remaining accounts and mint arguments through the
// cursors in `EvaluationContext`, stage record writes, and describe transfers,
// burns and freezes as `MintEffect`s for the host to apply.
use std::collections::BTreeMap;

use crate::{
    context::{AccountView, MintContext, RouteContext},
    errors::MintGuardError,
    state::{GuardKind, RecordStore, StagedWrites},
};
use anchor_lang::prelude::*;

pub mod evaluator;

mod address_gate;
mod allow_list;
mod bot_tax;
mod dates;
mod freeze;
mod mint_limit;
mod nft;
mod payment;
mod program_gate;
mod redeemed_amount;
mod signer;
mod token;

pub use address_gate::AddressGate;
pub use allow_list::{AllowList, AllowListProof, MerkleProof};
pub use bot_tax::BotTax;
pub use dates::{EndDate, StartDate};
pub use evaluator::{GuardEvaluator, MintOutcome};
pub use freeze::{FreezeEscrow, FreezeInstruction, FreezeSolPayment, FreezeTokenPayment};
pub use mint_limit::{MintCounter, MintLimit};
pub use nft::{NftBurn, NftGate, NftPayment};
pub use payment::{SolPayment, TokenPayment};
pub use program_gate::{ProgramGate, DEFAULT_PROGRAMS};
pub use redeemed_amount::RedeemedAmount;
pub use signer::{Gatekeeper, ThirdPartySigner};
pub use token::{TokenBurn, TokenGate};

// ================================
// Guard Traits
// ================================

pub trait Condition {
    /// Checks the guard against the attempt. Must not produce effects or
    /// record writes: a later guard may still fail.
    ///
    /// Accounts and arguments consumed here are recorded in `evaluation` so
    /// the action steps can find them again.
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()>;

    /// Runs before the mint, once every guard validated.
    fn pre_actions(&self, _ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        Ok(())
    }

    /// Runs after the mint, once every pre-action succeeded.
    fn post_actions(&self, _ctx: &MintContext, _evaluation: &mut EvaluationContext) -> Result<()> {
        Ok(())
    }
}

/// Ties a guard struct to its kind and its `GuardConfig` variant
pub trait GuardVariant: Sized {
    const KIND: GuardKind;

    fn from_config(config: &GuardConfig) -> Option<&Self>;
}

pub trait Guard: Condition + AnchorSerialize + AnchorDeserialize + GuardVariant {
    /// Encoded width of the configuration
    fn size() -> usize {
        Self::KIND.size()
    }

    /// Structural check of a configuration value
    fn check(&self) -> Result<()> {
        Ok(())
    }

    /// Writes the configuration into `data`, zero-filling unused bytes
    fn save(&self, data: &mut [u8]) -> Result<()> {
        self.check()?;

        let mut encoded = Vec::with_capacity(Self::size());
        self.serialize(&mut encoded)
            .map_err(|_| error!(MintGuardError::InvalidAccountSize))?;

        if encoded.len() > Self::size() || data.len() < Self::size() {
            return err!(MintGuardError::InvalidAccountSize);
        }

        data[..encoded.len()].copy_from_slice(&encoded);
        data[encoded.len()..Self::size()].fill(0);
        Ok(())
    }

    /// Reads the configuration from its fixed-width slot; bytes after the
    /// encoded value must be zero padding
    fn load(data: &[u8]) -> Result<Self> {
        let mut slice = data
            .get(..Self::size())
            .ok_or_else(|| error!(MintGuardError::MalformedGuardSet))?;
        let guard = Self::deserialize(&mut slice).map_err(|_| {
            msg!("Invalid {} configuration", Self::KIND);
            error!(MintGuardError::DeserializationError)
        })?;
        if slice.iter().any(|byte| *byte != 0) {
            msg!("Non-zero padding in {} configuration", Self::KIND);
            return err!(MintGuardError::DeserializationError);
        }
        guard.check()?;
        Ok(guard)
    }

    /// Executes a route instruction for this guard.
    fn instruction(
        &self,
        _ctx: &RouteContext,
        _data: &[u8],
        _store: &dyn RecordStore,
    ) -> Result<RouteResult> {
        err!(MintGuardError::InstructionNotFound)
    }
}

// ================================
// Guard Configuration Union
// ================================

macro_rules! guard_configs {
    ($($kind:ident),+ $(,)?) => {
        /// A single guard configuration of any kind
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub enum GuardConfig {
            $($kind($kind),)+
        }

        impl GuardConfig {
            pub fn kind(&self) -> GuardKind {
                match self {
                    $(Self::$kind(_) => GuardKind::$kind,)+
                }
            }

            /// Decodes the payload of `kind` from its fixed-width slot
            pub fn load(kind: GuardKind, data: &[u8]) -> Result<Self> {
                match kind {
                    $(GuardKind::$kind => Ok(Self::$kind(<$kind as Guard>::load(data)?)),)+
                }
            }

            pub fn save(&self, data: &mut [u8]) -> Result<()> {
                match self {
                    $(Self::$kind(guard) => guard.save(data),)+
                }
            }

            pub fn condition(&self) -> &dyn Condition {
                match self {
                    $(Self::$kind(guard) => guard as &dyn Condition,)+
                }
            }

            pub fn instruction(
                &self,
                ctx: &RouteContext,
                data: &[u8],
                store: &dyn RecordStore,
            ) -> Result<RouteResult> {
                match self {
                    $(Self::$kind(guard) => guard.instruction(ctx, data, store),)+
                }
            }
        }

        $(
            impl From<$kind> for GuardConfig {
                fn from(guard: $kind) -> Self {
                    Self::$kind(guard)
                }
            }

            impl GuardVariant for $kind {
                const KIND: GuardKind = GuardKind::$kind;

                fn from_config(config: &GuardConfig) -> Option<&Self> {
                    match config {
                        GuardConfig::$kind(guard) => Some(guard),
                        _ => None,
                    }
                }
            }
        )+
    };
}

guard_configs!(
    BotTax,
    SolPayment,
    TokenPayment,
    StartDate,
    ThirdPartySigner,
    TokenGate,
    Gatekeeper,
    EndDate,
    AllowList,
    MintLimit,
    NftPayment,
    RedeemedAmount,
    AddressGate,
    NftGate,
    NftBurn,
    TokenBurn,
    FreezeSolPayment,
    FreezeTokenPayment,
    ProgramGate,
);

// ================================
// Effects
// ================================

/// Side effect of an authorized attempt, applied by the host in the same
/// transaction as the mint
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MintEffect {
    /// Bot tax charged instead of failing the transaction
    ChargeBotTax { payer: Pubkey, lamports: u64 },
    /// Lamport transfer from the payer
    TransferLamports {
        from: Pubkey,
        to: Pubkey,
        lamports: u64,
    },
    /// Fungible token transfer signed by `authority`
    TransferTokens {
        source: Pubkey,
        destination: Pubkey,
        authority: Pubkey,
        amount: u64,
    },
    /// Fungible token burn
    BurnTokens {
        account: Pubkey,
        mint: Pubkey,
        authority: Pubkey,
        amount: u64,
    },
    /// NFT moved to a new owner
    TransferNft {
        token_account: Pubkey,
        mint: Pubkey,
        destination: Pubkey,
    },
    /// NFT burned together with its metadata
    BurnNft {
        token_account: Pubkey,
        mint: Pubkey,
        metadata: Pubkey,
    },
    /// Gateway token consumed by the mint
    ExpireGatewayToken {
        gateway_token: Pubkey,
        gatekeeper_network: Pubkey,
    },
    /// Minted NFT frozen under the escrow's authority; the escrow is approved
    /// as the token account's delegate so only it can thaw the NFT later
    FreezeNft {
        escrow: Pubkey,
        token_account: Pubkey,
        mint: Pubkey,
    },
    /// NFT released from its freeze
    ThawNft {
        escrow: Pubkey,
        token_account: Pubkey,
        mint: Pubkey,
    },
    /// Escrowed funds released to the configured destination
    ReleaseFunds { escrow: Pubkey, destination: Pubkey },
}

/// Result of a route instruction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteResult {
    /// Record writes to commit when the route succeeded
    pub staged: StagedWrites,
    /// Effects for the host to apply
    pub effects: Vec<MintEffect>,
    /// Data returned to the caller (probe routes)
    pub return_data: Option<Vec<u8>>,
}

// ================================
// Evaluation Context
// ================================

/// State shared between guards while one attempt is evaluated
pub struct EvaluationContext<'s> {
    /// Next unread remaining account
    pub account_cursor: usize,
    /// Bytes of mint arguments already consumed
    pub args_cursor: usize,
    /// Remaining account positions recorded by guards during validation
    pub indices: BTreeMap<&'static str, usize>,
    /// Record writes applied only if the whole attempt succeeds
    pub staged: StagedWrites,
    /// Effects produced by the action steps
    pub effects: Vec<MintEffect>,
    store: &'s dyn RecordStore,
}

impl<'s> EvaluationContext<'s> {
    pub fn new(store: &'s dyn RecordStore) -> Self {
        Self {
            account_cursor: 0,
            args_cursor: 0,
            indices: BTreeMap::new(),
            staged: StagedWrites::default(),
            effects: Vec::new(),
            store,
        }
    }

    /// Remaining account at `index`
    pub fn get_account_info<'a>(ctx: &MintContext<'a>, index: usize) -> Result<&'a AccountView> {
        let accounts: &'a [AccountView] = ctx.remaining_accounts;
        accounts
            .get(index)
            .ok_or_else(|| error!(MintGuardError::MissingRemainingAccount))
    }

    /// Consumes the next remaining account
    pub fn next_account<'a>(&mut self, ctx: &MintContext<'a>) -> Result<&'a AccountView> {
        let account = Self::get_account_info(ctx, self.account_cursor)?;
        self.account_cursor += 1;
        Ok(account)
    }

    /// Consumes the next remaining account and remembers its position under `name`
    pub fn take_account<'a>(
        &mut self,
        ctx: &MintContext<'a>,
        name: &'static str,
    ) -> Result<&'a AccountView> {
        self.indices.insert(name, self.account_cursor);
        self.next_account(ctx)
    }

    /// Position recorded under `name` during validation
    pub fn index_of(&self, name: &'static str) -> Result<usize> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| error!(MintGuardError::MissingRemainingAccount))
    }

    /// Account recorded under `name` during validation
    pub fn account<'a>(&self, ctx: &MintContext<'a>, name: &'static str) -> Result<&'a AccountView> {
        Self::get_account_info(ctx, self.index_of(name)?)
    }

    /// Consumes `len` bytes of mint arguments
    pub fn read_args<'a>(&mut self, ctx: &MintContext<'a>, len: usize) -> Option<&'a [u8]> {
        let args: &'a [u8] = ctx.mint_args;
        let end = self.args_cursor.checked_add(len)?;
        let bytes = args.get(self.args_cursor..end)?;
        self.args_cursor = end;
        Some(bytes)
    }

    /// Loads a record, seeing writes staged earlier in this attempt
    pub fn load_record<T: AccountDeserialize>(&self, key: &Pubkey) -> Result<Option<T>> {
        self.staged.load(self.store, key)
    }

    pub fn stage<T: AccountSerialize>(&mut self, key: Pubkey, record: &T) -> Result<()> {
        self.staged.stage(key, record)
    }

    pub fn emit(&mut self, effect: MintEffect) {
        self.effects.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryRecordStore;

    #[test]
    fn config_variants_follow_kind_order() {
        for kind in GuardKind::ALL {
            let zeroed = vec![0u8; kind.size()];
            let config = GuardConfig::load(kind, &zeroed).unwrap();
            assert_eq!(config.kind(), kind);

            let mut encoded = vec![0xFFu8; kind.size()];
            config.save(&mut encoded).unwrap();
            assert_eq!(encoded, zeroed);
        }
    }

    #[test]
    fn short_slot_is_malformed() {
        assert_eq!(
            GuardConfig::load(GuardKind::SolPayment, &[0u8; 39]).unwrap_err(),
            MintGuardError::MalformedGuardSet.into()
        );
    }

    #[test]
    fn cursors_consume_accounts_and_args() {
        let store = MemoryRecordStore::new();
        let clock = Clock::default();
        let payer = AccountView::wallet(Pubkey::new_unique(), 0, true);
        let accounts = vec![AccountView::address(Pubkey::new_unique())];
        let args = [1u8, 2, 3];
        let ctx = MintContext {
            candy_guard: Pubkey::new_unique(),
            candy_machine: Pubkey::new_unique(),
            payer: &payer,
            nft_mint: Pubkey::new_unique(),
            clock: &clock,
            items_redeemed: 0,
            items_available: 10,
            remaining_accounts: &accounts,
            mint_args: &args,
            instructions: &[],
            current_instruction: 0,
        };

        let mut evaluation = EvaluationContext::new(&store);
        let first = evaluation.take_account(&ctx, "first").unwrap();
        assert_eq!(first.key, accounts[0].key);
        assert_eq!(evaluation.account(&ctx, "first").unwrap().key, accounts[0].key);
        assert_eq!(
            evaluation.next_account(&ctx).unwrap_err(),
            MintGuardError::MissingRemainingAccount.into()
        );

        assert_eq!(evaluation.read_args(&ctx, 2), Some(&args[..2]));
        assert_eq!(evaluation.read_args(&ctx, 2), None);
        assert_eq!(evaluation.read_args(&ctx, 1), Some(&args[2..]));
    }
}
