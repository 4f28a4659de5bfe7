// Error system for the mint guard program
//
// Every failure surfaced by the codecs, the group resolver, the guard evaluator
// and the route dispatcher is one of these codes. Evaluation is fail-fast: the
// first violated guard in canonical order produces the error returned to the
// caller, and nothing staged by the attempt is persisted.
//
// ERROR CATEGORIZATION: Codes are grouped by domain (encoding, authorization,
// policy, resource, structural, freeze). Anchor numbers them sequentially from
// 6000 in declaration order, so new codes are only ever appended.

use anchor_lang::prelude::*;

#[error_code]
pub enum MintGuardError {
    // ===== Encoding Errors =====
    #[msg("Could not save guard to account")]
    InvalidAccountSize, // 6000

    #[msg("Could not deserialize guard")]
    DeserializationError, // 6001

    #[msg("Guard set data is malformed")]
    MalformedGuardSet, // 6002

    // ===== Authorization Errors =====
    #[msg("Public key mismatch")]
    PublicKeyMismatch, // 6003

    #[msg("Account does not have correct owner")]
    IncorrectOwner, // 6004

    #[msg("A signature was required but not found")]
    MissingRequiredSignature, // 6005

    #[msg("Account is not initialized")]
    Uninitialized, // 6006

    // ===== Resource Errors =====
    #[msg("Exceeded account increase limit")]
    DataIncrementLimitExceeded, // 6007

    #[msg("Missing expected remaining account")]
    MissingRemainingAccount, // 6008

    #[msg("Numerical overflow error")]
    NumericalOverflowError, // 6009

    #[msg("Group label exceeded maximum length")]
    LabelExceededLength, // 6010

    #[msg("Group label contains invalid characters")]
    InvalidGroupLabel, // 6011

    // ===== Group Errors =====
    #[msg("Missing required group label")]
    RequiredGroupLabelNotFound, // 6012

    #[msg("Group not found")]
    GroupNotFound, // 6013

    #[msg("Duplicated group label")]
    DuplicatedGroupLabel, // 6014

    #[msg("No instruction was found")]
    InstructionNotFound, // 6015

    // ===== Collection Errors =====
    #[msg("Collection public key mismatch")]
    CollectionKeyMismatch, // 6016

    #[msg("Missing collection accounts")]
    MissingCollectionAccounts, // 6017

    #[msg("Collection update authority public key mismatch")]
    CollectionUpdateAuthorityKeyMismatch, // 6018

    // ===== Policy Errors =====
    #[msg("Mint must be the last instructions of the transaction")]
    MintNotLastTransaction, // 6019

    #[msg("Mint is not live")]
    MintNotLive, // 6020

    #[msg("Not enough SOL to pay for the mint")]
    NotEnoughSOL, // 6021

    #[msg("Not enough tokens on the account")]
    NotEnoughTokens, // 6022

    #[msg("Gateway token is not valid")]
    GatewayTokenInvalid, // 6023

    #[msg("Current time is after the set end date")]
    AfterEndDate, // 6024

    #[msg("Current time is not within the allowed mint time")]
    InvalidMintTime, // 6025

    #[msg("Address not found on the allowed list")]
    AddressNotFoundInAllowedList, // 6026

    #[msg("Missing allowed list proof")]
    MissingAllowedListProof, // 6027

    #[msg("Allow list guard is not enabled")]
    AllowedListNotEnabled, // 6028

    #[msg("The maximum number of allowed mints was reached")]
    AllowedMintLimitReached, // 6029

    #[msg("Invalid NFT collection")]
    InvalidNftCollection, // 6030

    #[msg("Missing NFT on the account")]
    MissingNft, // 6031

    #[msg("Current redemeed items is at the set maximum amount")]
    MaximumRedeemedAmount, // 6032

    #[msg("Address not authorized")]
    AddressNotAuthorized, // 6033

    #[msg("An unauthorized program was found in the transaction")]
    UnauthorizedProgramFound, // 6034

    #[msg("Exceeded the maximum number of programs in the additional list")]
    ExceededProgramListSize, // 6035

    // ===== Freeze Errors =====
    #[msg("Missing freeze instruction data")]
    MissingFreezeInstruction, // 6036

    #[msg("Freeze guard must be enabled")]
    FreezeGuardNotEnabled, // 6037

    #[msg("Freeze must be initialized")]
    FreezeNotInitialized, // 6038

    #[msg("Missing freeze period")]
    MissingFreezePeriod, // 6039

    #[msg("The freeze escrow account already exists")]
    FreezeEscrowAlreadyExists, // 6040

    #[msg("Maximum freeze period exceeded")]
    ExceededMaximumFreezePeriod, // 6041

    #[msg("Thaw is not enabled")]
    ThawNotEnabled, // 6042

    #[msg("Unlock is not enabled (not all NFTs are thawed)")]
    UnlockNotEnabled, // 6043
}
