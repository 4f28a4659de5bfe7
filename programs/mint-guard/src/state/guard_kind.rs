// Static catalog of guard kinds
//
// The position of a kind in `GuardKind::ALL` is its bit in the feature mask and
// its slot in the canonical encoding/evaluation order. The list is append-only:
// reordering or removing a kind changes the wire format of every stored guard
// account. New kinds go at the end and must bring their payload width along.
use anchor_lang::prelude::*;

/// Available guard kinds, in canonical wire order
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GuardKind {
    BotTax,             // 0
    SolPayment,         // 1
    TokenPayment,       // 2
    StartDate,          // 3
    ThirdPartySigner,   // 4
    TokenGate,          // 5
    Gatekeeper,         // 6
    EndDate,            // 7
    AllowList,          // 8
    MintLimit,          // 9
    NftPayment,         // 10
    RedeemedAmount,     // 11
    AddressGate,        // 12
    NftGate,            // 13
    NftBurn,            // 14
    TokenBurn,          // 15
    FreezeSolPayment,   // 16
    FreezeTokenPayment, // 17
    ProgramGate,        // 18
}

impl GuardKind {
    /// Number of known guard kinds
    pub const COUNT: usize = 19;

    /// Every kind in canonical order
    pub const ALL: [GuardKind; Self::COUNT] = [
        GuardKind::BotTax,
        GuardKind::SolPayment,
        GuardKind::TokenPayment,
        GuardKind::StartDate,
        GuardKind::ThirdPartySigner,
        GuardKind::TokenGate,
        GuardKind::Gatekeeper,
        GuardKind::EndDate,
        GuardKind::AllowList,
        GuardKind::MintLimit,
        GuardKind::NftPayment,
        GuardKind::RedeemedAmount,
        GuardKind::AddressGate,
        GuardKind::NftGate,
        GuardKind::NftBurn,
        GuardKind::TokenBurn,
        GuardKind::FreezeSolPayment,
        GuardKind::FreezeTokenPayment,
        GuardKind::ProgramGate,
    ];

    /// Position in the canonical order (and bit in the feature mask)
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Feature mask bit for this kind
    pub const fn mask(self) -> u64 {
        1u64 << (self as u64)
    }

    /// Encoded width of the kind's configuration in bytes
    pub const fn size(self) -> usize {
        match self {
            GuardKind::BotTax => 8 + 1,
            GuardKind::SolPayment => 8 + 32,
            GuardKind::TokenPayment => 8 + 32 + 32,
            GuardKind::StartDate => 8,
            GuardKind::ThirdPartySigner => 32,
            GuardKind::TokenGate => 8 + 32,
            GuardKind::Gatekeeper => 32 + 1,
            GuardKind::EndDate => 8,
            GuardKind::AllowList => 32,
            GuardKind::MintLimit => 1 + 2,
            GuardKind::NftPayment => 32 + 32,
            GuardKind::RedeemedAmount => 8,
            GuardKind::AddressGate => 32,
            GuardKind::NftGate => 32,
            GuardKind::NftBurn => 32,
            GuardKind::TokenBurn => 8 + 32,
            GuardKind::FreezeSolPayment => 8 + 32,
            GuardKind::FreezeTokenPayment => 8 + 32 + 32,
            GuardKind::ProgramGate => 4 + 32 * crate::MAX_PROGRAM_GATE_ADDRESSES,
        }
    }

    /// Whether the kind answers route instructions
    pub const fn has_route(self) -> bool {
        matches!(
            self,
            GuardKind::AllowList
                | GuardKind::MintLimit
                | GuardKind::FreezeSolPayment
                | GuardKind::FreezeTokenPayment
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            GuardKind::BotTax => "botTax",
            GuardKind::SolPayment => "solPayment",
            GuardKind::TokenPayment => "tokenPayment",
            GuardKind::StartDate => "startDate",
            GuardKind::ThirdPartySigner => "thirdPartySigner",
            GuardKind::TokenGate => "tokenGate",
            GuardKind::Gatekeeper => "gatekeeper",
            GuardKind::EndDate => "endDate",
            GuardKind::AllowList => "allowList",
            GuardKind::MintLimit => "mintLimit",
            GuardKind::NftPayment => "nftPayment",
            GuardKind::RedeemedAmount => "redeemedAmount",
            GuardKind::AddressGate => "addressGate",
            GuardKind::NftGate => "nftGate",
            GuardKind::NftBurn => "nftBurn",
            GuardKind::TokenBurn => "tokenBurn",
            GuardKind::FreezeSolPayment => "freezeSolPayment",
            GuardKind::FreezeTokenPayment => "freezeTokenPayment",
            GuardKind::ProgramGate => "programGate",
        }
    }
}

impl std::fmt::Display for GuardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_index() {
        for (index, kind) in GuardKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), index);
            assert_eq!(GuardKind::from_index(index), Some(*kind));
        }
        assert_eq!(GuardKind::from_index(GuardKind::COUNT), None);
    }

    #[test]
    fn width_table() {
        assert_eq!(GuardKind::StartDate.size(), 8);
        assert_eq!(GuardKind::AllowList.size(), 32);
        assert_eq!(GuardKind::NftPayment.size(), 64);
        assert_eq!(GuardKind::ProgramGate.size(), 164);
        assert_eq!(GuardKind::Gatekeeper.size(), 33);
        assert_eq!(GuardKind::MintLimit.size(), 3);
    }

    #[test]
    fn masks_are_single_bits() {
        assert_eq!(GuardKind::BotTax.mask(), 1);
        assert_eq!(GuardKind::MintLimit.mask(), 1 << 9);
        assert_eq!(GuardKind::ProgramGate.mask(), 1 << 18);
    }
}
