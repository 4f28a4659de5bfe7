// State management modules for the mint guard

// Account types (persisted state)
pub mod guard_account;
pub mod record_store;

// Codecs for the guard configuration
pub mod guard_kind;
pub mod guard_set;
pub mod guard_data;

// Utility types
pub mod bitmap;

// Re-exports
pub use bitmap::FeatureMask;
pub use guard_account::{CandyGuard, GuardAccount};
pub use guard_data::{Group, GuardData, Label};
pub use guard_kind::GuardKind;
pub use guard_set::GuardSet;
pub use record_store::{
    decode_record, encode_record, load_record, MemoryRecordStore, RecordStore, StagedWrites,
};
