#![allow(deprecated, unexpected_cfgs)]
use anchor_lang::prelude::*;

// ================================
// Module Declarations
// ================================

pub mod context;
pub mod errors;
pub mod guards;
pub mod instructions;
pub mod state;
pub mod utils;

// ================================
// Public API Exports
// ================================

pub use context::*;
pub use guards::{
    Condition, EvaluationContext, Guard, GuardConfig, GuardEvaluator, GuardVariant, MintEffect,
    MintOutcome, RouteResult,
};
pub use instructions::*;
pub use state::*;

// ================================
// Program Constants
// ================================

/// Bytes in front of the encoded guard data inside a guard account:
/// 8 (discriminator) + 32 (base) + 1 (bump) + 32 (authority)
pub const DATA_OFFSET: usize = 8 + 32 + 1 + 32;

/// Fixed width of a group label on the wire
pub const MAX_LABEL_SIZE: usize = 6;

/// Maximum number of bytes an account may grow by in a single update
/// (platform realloc limit)
pub const MAX_PERMITTED_DATA_INCREASE: usize = 10_240;

/// Maximum number of extra programs the program gate can authorize
pub const MAX_PROGRAM_GATE_ADDRESSES: usize = 5;

/// Maximum freeze period in seconds (30 days)
pub const MAX_FREEZE_PERIOD: i64 = 60 * 60 * 24 * 30;

// ================================
// PDA Seeds
// ================================

/// PDA seed for guard accounts
pub const GUARD_SEED: &[u8] = b"mint_guard";

/// PDA seed for per-wallet mint counters
pub const MINT_LIMIT_SEED: &[u8] = b"mint_limit";

/// PDA seed for allow list proof markers
pub const ALLOW_LIST_SEED: &[u8] = b"allow_list";

/// PDA seed for freeze escrow accounts
pub const FREEZE_ESCROW_SEED: &[u8] = b"freeze_escrow";

// ================================
// Well-known Programs
// ================================

/// SPL token program
pub const TOKEN_PROGRAM_ID: Pubkey = anchor_spl::token::ID;

/// SPL associated token account program
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = anchor_spl::associated_token::ID;

/// Token metadata program (owner of NFT metadata accounts)
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    anchor_lang::solana_program::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Candy machine program that performs the actual mint
pub const CANDY_MACHINE_PROGRAM_ID: Pubkey =
    anchor_lang::solana_program::pubkey!("CndyV3LdqHUfDLmE5naZjVN8rBZz4tqhdefbAnjHG3JR");

// ================================
// Program ID Declaration
// ================================

declare_id!("MintGuard1111111111111111111111111111111111");

// Make ID accessible for tests
pub const PROGRAM_ID: Pubkey = ID;

// ================================
// Type Exports
// ================================

pub use crate::errors::MintGuardError;
pub use crate::guards::{
    AddressGate, AllowList, AllowListProof, BotTax, EndDate, FreezeEscrow, FreezeInstruction,
    FreezeSolPayment, FreezeTokenPayment, Gatekeeper, MerkleProof, MintCounter, MintLimit,
    NftBurn, NftGate, NftPayment, ProgramGate, RedeemedAmount, SolPayment, StartDate,
    ThirdPartySigner, TokenBurn, TokenGate, TokenPayment, DEFAULT_PROGRAMS,
};
