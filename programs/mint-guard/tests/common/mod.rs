// Shared fixtures for the mint guard integration tests
#![allow(dead_code)]

use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use mint_guard::{
    AccountData, AccountView, Collection, GuardAccount, GuardData, GuardKind, MemoryRecordStore,
    MerkleProof, MintContext, MintOutcome, NftMetadata, RouteArgs, RouteContext, RouteResult,
    TokenAccountState, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

pub const LAMPORTS: u64 = 10_000_000_000;

// ================================
// Accounts
// ================================

pub fn wallet() -> AccountView {
    AccountView::wallet(Pubkey::new_unique(), LAMPORTS, true)
}

/// Associated token account of `owner` for `mint`
pub fn token_account(owner: &Pubkey, mint: &Pubkey, amount: u64) -> AccountView {
    AccountView {
        key: get_associated_token_address(owner, mint),
        owner: TOKEN_PROGRAM_ID,
        lamports: 2_039_280,
        is_signer: false,
        is_writable: true,
        data: AccountData::Token(TokenAccountState {
            mint: *mint,
            owner: *owner,
            amount,
            delegate: None,
            is_frozen: false,
        }),
    }
}

/// Token and metadata accounts of an NFT held by `owner`
pub fn nft(owner: &Pubkey, collection: Pubkey, verified: bool) -> (AccountView, AccountView) {
    let mint = Pubkey::new_unique();
    let metadata = AccountView {
        key: Pubkey::new_unique(),
        owner: TOKEN_METADATA_PROGRAM_ID,
        data: AccountData::Metadata(NftMetadata {
            mint,
            update_authority: Pubkey::new_unique(),
            collection: Some(Collection {
                key: collection,
                verified,
            }),
        }),
        ..AccountView::default()
    };
    (token_account(owner, &mint, 1), metadata)
}

/// Builds a Merkle tree over `wallets`, returning the root and one proof per wallet
pub fn merkle_tree(wallets: &[Pubkey]) -> ([u8; 32], Vec<MerkleProof>) {
    let mut level: Vec<[u8; 32]> = wallets.iter().map(MerkleProof::leaf).collect();
    let mut positions: Vec<usize> = (0..wallets.len()).collect();
    let mut proofs = vec![Vec::new(); wallets.len()];

    while level.len() > 1 {
        for (proof, position) in proofs.iter_mut().zip(positions.iter_mut()) {
            let sibling = *position ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            *position /= 2;
        }
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => MerkleProof::hash_pair(left, right),
                [single] => *single,
                _ => unreachable!(),
            })
            .collect();
    }

    (level[0], proofs.into_iter().map(MerkleProof).collect())
}

// ================================
// Attempts
// ================================

/// One mint attempt as the host would describe it
pub struct Attempt {
    pub payer: AccountView,
    pub nft_mint: Pubkey,
    pub accounts: Vec<AccountView>,
    pub args: Vec<u8>,
    pub instructions: Vec<Pubkey>,
    pub current_instruction: usize,
    pub label: Option<String>,
}

impl Attempt {
    pub fn new(payer: &AccountView) -> Self {
        Self {
            payer: payer.clone(),
            nft_mint: Pubkey::new_unique(),
            accounts: Vec::new(),
            args: Vec::new(),
            instructions: vec![mint_guard::ID],
            current_instruction: 0,
            label: None,
        }
    }

    pub fn account(mut self, account: AccountView) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn args(mut self, args: Vec<u8>) -> Self {
        self.args = args;
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Associated token account that receives the minted NFT
    pub fn nft_ata(&self) -> AccountView {
        AccountView::address(get_associated_token_address(&self.payer.key, &self.nft_mint))
    }
}

// ================================
// Environment
// ================================

/// A guard account attached to a candy machine, with its record store
pub struct TestEnv {
    pub authority: AccountView,
    pub account: GuardAccount,
    pub candy_machine: Pubkey,
    pub store: MemoryRecordStore,
    pub clock: Clock,
    pub items_redeemed: u64,
    pub items_available: u64,
}

impl TestEnv {
    pub fn new() -> Self {
        let authority = wallet();
        let account = mint_guard::initialize(Pubkey::new_unique(), authority.key).unwrap();
        Self {
            authority,
            account,
            candy_machine: Pubkey::new_unique(),
            store: MemoryRecordStore::new(),
            clock: Clock {
                unix_timestamp: 1_700_000_000,
                ..Clock::default()
            },
            items_redeemed: 0,
            items_available: 100,
        }
    }

    pub fn with_config(data: GuardData) -> Self {
        let mut env = Self::new();
        env.configure(&data);
        env
    }

    pub fn configure(&mut self, data: &GuardData) {
        mint_guard::update(&mut self.account, &self.authority, data).unwrap();
    }

    pub fn now(&self) -> i64 {
        self.clock.unix_timestamp
    }

    pub fn set_time(&mut self, unix_timestamp: i64) {
        self.clock.unix_timestamp = unix_timestamp;
    }

    pub fn candy_guard(&self) -> Pubkey {
        self.account.key
    }

    pub fn mint(&mut self, attempt: &Attempt) -> Result<MintOutcome> {
        let ctx = MintContext {
            candy_guard: self.account.key,
            candy_machine: self.candy_machine,
            payer: &attempt.payer,
            nft_mint: attempt.nft_mint,
            clock: &self.clock,
            items_redeemed: self.items_redeemed,
            items_available: self.items_available,
            remaining_accounts: &attempt.accounts,
            mint_args: &attempt.args,
            instructions: &attempt.instructions,
            current_instruction: attempt.current_instruction,
        };

        let outcome = mint_guard::mint(
            &self.account,
            attempt.label.as_deref(),
            &ctx,
            &mut self.store,
        )?;
        if outcome.is_authorized() {
            self.items_redeemed += 1;
        }
        Ok(outcome)
    }

    pub fn route(
        &mut self,
        payer: &AccountView,
        guard: GuardKind,
        data: Vec<u8>,
        accounts: &[AccountView],
        label: Option<&str>,
    ) -> Result<RouteResult> {
        let ctx = RouteContext {
            candy_guard: self.account.key,
            authority: self.account.header.authority,
            candy_machine: self.candy_machine,
            payer,
            clock: &self.clock,
            items_redeemed: self.items_redeemed,
            items_available: self.items_available,
            remaining_accounts: accounts,
        };

        mint_guard::route(
            &self.account,
            &RouteArgs { guard, data },
            label,
            &ctx,
            &mut self.store,
        )
    }
}
