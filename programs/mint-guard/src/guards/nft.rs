// NFT guards: gate, payment and burn by collection membership
//
// All three share the same check: the payer presents a token account holding
// an NFT and the metadata account of that NFT, and the metadata must carry a
// verified collection equal to the configured one. Not supplying the metadata
// (or supplying an account that holds none) is reported separately from an
// NFT of the wrong collection.
use super::*;
use crate::{
    context::TokenAccountState,
    utils::{assert_keys_equal, assert_owned_by, cmp_pubkeys},
    TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

/// Validates that the token account holds an NFT of `required_collection`
/// owned by `owner`
pub fn verify_collection<'a>(
    token_account_info: &'a AccountView,
    metadata_info: &AccountView,
    required_collection: &Pubkey,
    owner: &Pubkey,
) -> Result<&'a TokenAccountState> {
    assert_owned_by(token_account_info, &TOKEN_PROGRAM_ID)?;
    let token_account = token_account_info
        .token()
        .ok_or_else(|| error!(MintGuardError::MissingNft))?;

    if !cmp_pubkeys(&token_account.owner, owner) {
        return err!(MintGuardError::IncorrectOwner);
    }
    if token_account.amount < 1 {
        return err!(MintGuardError::MissingNft);
    }

    let metadata = metadata_info
        .metadata()
        .ok_or_else(|| error!(MintGuardError::MissingCollectionAccounts))?;
    assert_owned_by(metadata_info, &TOKEN_METADATA_PROGRAM_ID)?;
    assert_keys_equal(&metadata.mint, &token_account.mint)?;

    match metadata.collection {
        Some(collection) if collection.verified => {
            if !cmp_pubkeys(&collection.key, required_collection) {
                msg!(
                    "Collection {} does not match required {}",
                    collection.key,
                    required_collection
                );
                return err!(MintGuardError::CollectionKeyMismatch);
            }
        }
        _ => return err!(MintGuardError::InvalidNftCollection),
    }

    Ok(token_account)
}

/// Guard that restricts the transaction to holders of a specified collection.
///
/// List of accounts required:
///
///   0. `[]` Token account of the NFT.
///   1. `[]` Metadata account of the NFT.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NftGate {
    pub required_collection: Pubkey,
}

impl Guard for NftGate {}

impl Condition for NftGate {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account = evaluation.next_account(ctx)?;
        let metadata = evaluation.next_account(ctx)?;

        verify_collection(token_account, metadata, &self.required_collection, ctx.wallet())?;

        Ok(())
    }
}

/// Guard that charges another NFT (token) from a specific collection as payment
/// for the mint.
///
/// List of accounts required:
///
///   0. `[writable]` Token account of the NFT.
///   1. `[]` Metadata account of the NFT.
///   2. `[]` Address to receive the NFT.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NftPayment {
    pub required_collection: Pubkey,
    pub destination: Pubkey,
}

impl Guard for NftPayment {}

impl Condition for NftPayment {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account = evaluation.take_account(ctx, "nft_payment")?;
        let metadata = evaluation.next_account(ctx)?;

        verify_collection(token_account, metadata, &self.required_collection, ctx.wallet())?;

        let destination = evaluation.next_account(ctx)?;
        assert_keys_equal(&destination.key, &self.destination)?;

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account = evaluation.account(ctx, "nft_payment")?;
        let mint = token_account
            .token()
            .map(|token| token.mint)
            .ok_or_else(|| error!(MintGuardError::MissingNft))?;

        evaluation.emit(MintEffect::TransferNft {
            token_account: token_account.key,
            mint,
            destination: self.destination,
        });

        Ok(())
    }
}

/// Guard that requires the payer to burn an NFT of a specified collection.
///
/// List of accounts required:
///
///   0. `[writable]` Token account of the NFT.
///   1. `[writable]` Metadata account of the NFT.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NftBurn {
    pub required_collection: Pubkey,
}

impl Guard for NftBurn {}

impl Condition for NftBurn {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let token_account = evaluation.take_account(ctx, "nft_burn")?;
        let metadata = evaluation.next_account(ctx)?;

        verify_collection(token_account, metadata, &self.required_collection, ctx.wallet())?;

        Ok(())
    }

    fn pre_actions(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let index = evaluation.index_of("nft_burn")?;
        let token_account = EvaluationContext::get_account_info(ctx, index)?;
        let metadata = EvaluationContext::get_account_info(ctx, index + 1)?;
        let mint = token_account
            .token()
            .map(|token| token.mint)
            .ok_or_else(|| error!(MintGuardError::MissingNft))?;

        evaluation.emit(MintEffect::BurnNft {
            token_account: token_account.key,
            mint,
            metadata: metadata.key,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AccountData, Collection, NftMetadata};

    fn nft(owner: Pubkey, collection: Option<Collection>) -> (AccountView, AccountView) {
        let mint = Pubkey::new_unique();
        let token_account = AccountView {
            key: Pubkey::new_unique(),
            owner: TOKEN_PROGRAM_ID,
            data: AccountData::Token(TokenAccountState {
                mint,
                owner,
                amount: 1,
                delegate: None,
                is_frozen: false,
            }),
            ..AccountView::default()
        };
        let metadata = AccountView {
            key: Pubkey::new_unique(),
            owner: TOKEN_METADATA_PROGRAM_ID,
            data: AccountData::Metadata(NftMetadata {
                mint,
                update_authority: Pubkey::new_unique(),
                collection,
            }),
            ..AccountView::default()
        };
        (token_account, metadata)
    }

    #[test]
    fn verified_collection_passes() {
        let owner = Pubkey::new_unique();
        let collection = Pubkey::new_unique();
        let (token, metadata) = nft(
            owner,
            Some(Collection {
                key: collection,
                verified: true,
            }),
        );

        assert!(verify_collection(&token, &metadata, &collection, &owner).is_ok());
    }

    #[test]
    fn wrong_or_unverified_collection_fails() {
        let owner = Pubkey::new_unique();
        let collection = Pubkey::new_unique();

        let (token, metadata) = nft(
            owner,
            Some(Collection {
                key: Pubkey::new_unique(),
                verified: true,
            }),
        );
        assert_eq!(
            verify_collection(&token, &metadata, &collection, &owner).unwrap_err(),
            MintGuardError::CollectionKeyMismatch.into()
        );

        let (token, metadata) = nft(
            owner,
            Some(Collection {
                key: collection,
                verified: false,
            }),
        );
        assert_eq!(
            verify_collection(&token, &metadata, &collection, &owner).unwrap_err(),
            MintGuardError::InvalidNftCollection.into()
        );
    }

    #[test]
    fn missing_metadata_is_distinct_from_wrong_collection() {
        let owner = Pubkey::new_unique();
        let (token, _) = nft(owner, None);
        let empty = AccountView::address(Pubkey::new_unique());

        assert_eq!(
            verify_collection(&token, &empty, &Pubkey::new_unique(), &owner).unwrap_err(),
            MintGuardError::MissingCollectionAccounts.into()
        );
    }
}
