// Attempt context consumed by guard evaluation and route instructions
//
// The guard core never talks to the ledger directly. The host describes the
// current mint (or route) attempt through these views: the payer, the clock,
// the remaining accounts in the order the enabled guards expect them, the
// opaque mint arguments and the program ids of every instruction in the
// transaction. Account data is handed over already decoded.
//
// OWNERSHIP: Views are borrowed for the duration of one evaluation; the core
// never retains them and never mutates them.
use anchor_lang::prelude::*;

// ================================
// Account Views
// ================================

/// Decoded contents of an account relevant to guard checks
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AccountData {
    /// Account holds no data (not created yet or system-owned wallet)
    #[default]
    Empty,
    /// SPL token account
    Token(TokenAccountState),
    /// NFT metadata account
    Metadata(NftMetadata),
    /// Identity gateway token
    GatewayToken(GatewayTokenState),
}

/// State of an SPL token account
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountState {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    /// Delegate approved on the account (a freeze escrow for frozen NFTs)
    pub delegate: Option<Pubkey>,
    pub is_frozen: bool,
}

/// Collection reference stored on NFT metadata
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collection {
    pub key: Pubkey,
    pub verified: bool,
}

/// Subset of NFT metadata used by the NFT guards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NftMetadata {
    pub mint: Pubkey,
    pub update_authority: Pubkey,
    pub collection: Option<Collection>,
}

/// Gateway token issued by a gatekeeper network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GatewayTokenState {
    pub owner: Pubkey,
    pub gatekeeper_network: Pubkey,
    pub is_active: bool,
    pub expire_time: Option<i64>,
}

/// An account supplied to the attempt
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountView {
    pub key: Pubkey,
    pub owner: Pubkey,
    pub lamports: u64,
    pub is_signer: bool,
    pub is_writable: bool,
    pub data: AccountData,
}

impl AccountView {
    /// Wallet-style account owned by the system program
    #[must_use]
    pub fn wallet(key: Pubkey, lamports: u64, is_signer: bool) -> Self {
        Self {
            key,
            owner: anchor_lang::system_program::ID,
            lamports,
            is_signer,
            is_writable: true,
            data: AccountData::Empty,
        }
    }

    /// Bare address with no data (destination wallets, PDAs not yet created)
    #[must_use]
    pub fn address(key: Pubkey) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn data_is_empty(&self) -> bool {
        self.data == AccountData::Empty
    }

    pub fn token(&self) -> Option<&TokenAccountState> {
        match &self.data {
            AccountData::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn metadata(&self) -> Option<&NftMetadata> {
        match &self.data {
            AccountData::Metadata(metadata) => Some(metadata),
            _ => None,
        }
    }

    pub fn gateway_token(&self) -> Option<&GatewayTokenState> {
        match &self.data {
            AccountData::GatewayToken(token) => Some(token),
            _ => None,
        }
    }
}

// ================================
// Mint Attempt Context
// ================================

/// Everything guard evaluation needs to know about one mint attempt
pub struct MintContext<'a> {
    /// Guard account the attempt is evaluated against
    pub candy_guard: Pubkey,
    /// Candy machine (policy identity) being minted from
    pub candy_machine: Pubkey,
    /// Wallet paying for and receiving the mint
    pub payer: &'a AccountView,
    /// Mint account of the NFT being created
    pub nft_mint: Pubkey,
    /// Current clock state
    pub clock: &'a Clock,
    /// Items minted so far from the candy machine
    pub items_redeemed: u64,
    /// Total items the candy machine can mint
    pub items_available: u64,
    /// Guard-specific accounts in canonical guard order
    pub remaining_accounts: &'a [AccountView],
    /// Opaque guard arguments (e.g. allow list proof)
    pub mint_args: &'a [u8],
    /// Program id of every instruction in the transaction
    pub instructions: &'a [Pubkey],
    /// Position of the mint instruction inside `instructions`
    pub current_instruction: usize,
}

impl MintContext<'_> {
    /// Wallet identity of the attempt
    pub fn wallet(&self) -> &Pubkey {
        &self.payer.key
    }

    pub fn now(&self) -> i64 {
        self.clock.unix_timestamp
    }

    /// Whether the mint is the final instruction of its transaction
    pub fn is_last_instruction(&self) -> bool {
        self.current_instruction + 1 >= self.instructions.len()
    }
}

// ================================
// Route Context
// ================================

/// Context for a route instruction (outside the mint path)
pub struct RouteContext<'a> {
    /// Guard account the route targets
    pub candy_guard: Pubkey,
    /// Authority recorded on the guard account
    pub authority: Pubkey,
    /// Candy machine the guard is attached to
    pub candy_machine: Pubkey,
    /// Wallet issuing the route instruction
    pub payer: &'a AccountView,
    /// Current clock state
    pub clock: &'a Clock,
    /// Items minted so far from the candy machine
    pub items_redeemed: u64,
    /// Total items the candy machine can mint
    pub items_available: u64,
    /// Accounts required by the route instruction
    pub remaining_accounts: &'a [AccountView],
}

impl RouteContext<'_> {
    pub fn wallet(&self) -> &Pubkey {
        &self.payer.key
    }

    pub fn now(&self) -> i64 {
        self.clock.unix_timestamp
    }
}
