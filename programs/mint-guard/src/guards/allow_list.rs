// Allow list: Merkle-tree membership of the payer wallet
//
// Leaves are keccak256 hashes of the base58 wallet address; inner nodes hash
// the sorted pair of their children, so a proof is just the list of siblings.
// A proof is supplied in the mint arguments, or checked ahead of time through
// the route instruction, which records an `AllowListProof` for the
// (root, wallet, guard, machine) tuple so later mints skip the proof.
//
// Wire form of a proof: u32 (little-endian) node count, then 32 bytes per node.
use super::*;
use crate::{utils::find_record_address, ALLOW_LIST_SEED};
use anchor_lang::solana_program::keccak;

/// Guard that uses a merkle tree to specify the addresses allowed to mint.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AllowList {
    /// Merkle root of the addresses allowed to mint.
    pub merkle_root: [u8; 32],
}

/// PDA to track whether an address has been validated or not.
#[account]
#[derive(Default, Debug, PartialEq, Eq)]
pub struct AllowListProof {
    pub timestamp: i64,
}

/// Sibling hashes from a leaf up to the root
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleProof(pub Vec<[u8; 32]>);

impl MerkleProof {
    const COUNT_SIZE: usize = 4;
    const NODE_SIZE: usize = 32;

    /// Decodes a proof at the start of `data`, returning it with the bytes read
    pub fn decode(data: &[u8]) -> Option<(Self, usize)> {
        let count = u32::from_le_bytes(data.get(..Self::COUNT_SIZE)?.try_into().ok()?) as usize;
        let end = count
            .checked_mul(Self::NODE_SIZE)?
            .checked_add(Self::COUNT_SIZE)?;
        let nodes = data.get(Self::COUNT_SIZE..end)?;

        let proof = nodes
            .chunks_exact(Self::NODE_SIZE)
            .filter_map(|node| node.try_into().ok())
            .collect();
        Some((Self(proof), end))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::COUNT_SIZE + self.0.len() * Self::NODE_SIZE);
        data.extend_from_slice(&(self.0.len() as u32).to_le_bytes());
        for node in &self.0 {
            data.extend_from_slice(node);
        }
        data
    }

    /// Leaf hash of a wallet address
    pub fn leaf(wallet: &Pubkey) -> [u8; 32] {
        keccak::hashv(&[wallet.to_string().as_bytes()]).to_bytes()
    }

    /// Hash of two sibling nodes (order independent)
    pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
        if a <= b {
            keccak::hashv(&[&a[..], &b[..]]).to_bytes()
        } else {
            keccak::hashv(&[&b[..], &a[..]]).to_bytes()
        }
    }

    /// Returns true if the proof leads from `leaf` to `root`
    pub fn verify(&self, root: &[u8; 32], leaf: &[u8; 32]) -> bool {
        let computed = self
            .0
            .iter()
            .fold(*leaf, |hash, node| Self::hash_pair(&hash, node));
        computed == *root
    }
}

impl AllowList {
    /// Address of the proof record for `wallet`
    pub fn proof_address(
        &self,
        wallet: &Pubkey,
        candy_guard: &Pubkey,
        candy_machine: &Pubkey,
    ) -> Pubkey {
        find_record_address(&[
            ALLOW_LIST_SEED,
            self.merkle_root.as_ref(),
            wallet.as_ref(),
            candy_guard.as_ref(),
            candy_machine.as_ref(),
        ])
    }

    fn verify(&self, proof: &MerkleProof, wallet: &Pubkey) -> Result<()> {
        if !proof.verify(&self.merkle_root, &MerkleProof::leaf(wallet)) {
            msg!("Address {} not found in the allow list", wallet);
            return err!(MintGuardError::AddressNotFoundInAllowedList);
        }
        Ok(())
    }
}

impl Guard for AllowList {
    /// Validates the proof ahead of the mint and records the result.
    ///
    /// The route data is the serialized proof.
    fn instruction(
        &self,
        ctx: &RouteContext,
        data: &[u8],
        _store: &dyn RecordStore,
    ) -> Result<RouteResult> {
        msg!("AllowList: validate proof");

        let (proof, _) =
            MerkleProof::decode(data).ok_or_else(|| error!(MintGuardError::MissingAllowedListProof))?;
        self.verify(&proof, ctx.wallet())?;

        let mut result = RouteResult::default();
        let key = self.proof_address(ctx.wallet(), &ctx.candy_guard, &ctx.candy_machine);
        result.staged.stage(
            key,
            &AllowListProof {
                timestamp: ctx.now(),
            },
        )?;

        Ok(result)
    }
}

impl Condition for AllowList {
    fn validate(&self, ctx: &MintContext, evaluation: &mut EvaluationContext) -> Result<()> {
        let key = self.proof_address(ctx.wallet(), &ctx.candy_guard, &ctx.candy_machine);
        if evaluation.load_record::<AllowListProof>(&key)?.is_some() {
            // proof already validated through the route instruction
            return Ok(());
        }

        let args: &[u8] = ctx.mint_args;
        let remaining = args.get(evaluation.args_cursor..).unwrap_or_default();
        let (proof, consumed) =
            MerkleProof::decode(remaining).ok_or_else(|| error!(MintGuardError::MissingAllowedListProof))?;
        evaluation.args_cursor += consumed;

        self.verify(&proof, ctx.wallet())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proof_wire_form() {
        let proof = MerkleProof(vec![[1; 32], [2; 32]]);
        let bytes = proof.to_bytes();
        assert_eq!(&bytes[..4], &2u32.to_le_bytes());
        assert_eq!(bytes.len(), 4 + 64);

        let mut padded = bytes.clone();
        padded.extend([9; 3]);
        assert_eq!(MerkleProof::decode(&padded), Some((proof, 68)));

        assert!(MerkleProof::decode(&bytes[..67]).is_none());
        assert!(MerkleProof::decode(&[1, 0]).is_none());
    }

    #[test]
    fn two_leaf_tree() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let (leaf_a, leaf_b) = (MerkleProof::leaf(&a), MerkleProof::leaf(&b));
        let root = MerkleProof::hash_pair(&leaf_a, &leaf_b);

        assert!(MerkleProof(vec![leaf_b]).verify(&root, &leaf_a));
        assert!(MerkleProof(vec![leaf_a]).verify(&root, &leaf_b));
        // the proof for `a` does not prove `b`
        assert!(!MerkleProof(vec![leaf_b]).verify(&root, &leaf_b));
    }
}
