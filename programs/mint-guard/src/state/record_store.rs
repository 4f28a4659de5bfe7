// Persistence for guard-specific auxiliary records
//
// Per-wallet mint counters, allow list proof markers and freeze escrows live in
// their own records, addressed by a PDA derived from (guard identity, wallet,
// policy). The guard core reads them through `RecordStore` and never writes
// during validation: evaluation stages its writes and hands them to the store
// only after the whole attempt succeeded.
//
// CONCURRENCY: The store is expected to give single-writer-per-record semantics
// for one evaluate-then-commit cycle (the ledger's account write locks). The
// core does no locking of its own.
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::MintGuardError;
use anchor_lang::prelude::*;

/// Keyed storage for auxiliary records
pub trait RecordStore {
    /// Raw bytes of the record at `key`, if it exists
    fn load(&self, key: &Pubkey) -> Option<&[u8]>;

    /// Creates or replaces the record at `key`
    fn store(&mut self, key: Pubkey, data: Vec<u8>);

    /// Deletes the record at `key`, returning its last contents
    fn remove(&mut self, key: &Pubkey) -> Option<Vec<u8>>;

    fn contains(&self, key: &Pubkey) -> bool {
        self.load(key).is_some()
    }
}

/// In-process record store backed by an ordered map
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: BTreeMap<Pubkey, Vec<u8>>,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self, key: &Pubkey) -> Option<&[u8]> {
        self.records.get(key).map(Vec::as_slice)
    }

    fn store(&mut self, key: Pubkey, data: Vec<u8>) {
        self.records.insert(key, data);
    }

    fn remove(&mut self, key: &Pubkey) -> Option<Vec<u8>> {
        self.records.remove(key)
    }
}

// ================================
// Typed Record Access
// ================================

/// Deserializes an Anchor account record (discriminator checked)
pub fn decode_record<T: AccountDeserialize>(data: &[u8]) -> Result<T> {
    let mut slice = data;
    T::try_deserialize(&mut slice).map_err(|_| error!(MintGuardError::DeserializationError))
}

/// Serializes an Anchor account record with its discriminator
pub fn encode_record<T: AccountSerialize>(record: &T) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    record
        .try_serialize(&mut data)
        .map_err(|_| error!(MintGuardError::InvalidAccountSize))?;
    Ok(data)
}

/// Loads and decodes the record at `key`, if present
pub fn load_record<T: AccountDeserialize>(
    store: &dyn RecordStore,
    key: &Pubkey,
) -> Result<Option<T>> {
    store.load(key).map(decode_record::<T>).transpose()
}

/// Record writes collected during an attempt and committed all at once
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StagedWrites {
    writes: BTreeMap<Pubkey, Vec<u8>>,
    removals: BTreeSet<Pubkey>,
}

impl StagedWrites {
    pub fn stage<T: AccountSerialize>(&mut self, key: Pubkey, record: &T) -> Result<()> {
        self.removals.remove(&key);
        self.writes.insert(key, encode_record(record)?);
        Ok(())
    }

    /// Schedules the record at `key` for deletion
    pub fn remove(&mut self, key: Pubkey) {
        self.writes.remove(&key);
        self.removals.insert(key);
    }

    pub fn get(&self, key: &Pubkey) -> Option<&[u8]> {
        self.writes.get(key).map(Vec::as_slice)
    }

    pub fn is_removed(&self, key: &Pubkey) -> bool {
        self.removals.contains(key)
    }

    /// Reads a record as it would look after commit
    pub fn load<T: AccountDeserialize>(
        &self,
        store: &dyn RecordStore,
        key: &Pubkey,
    ) -> Result<Option<T>> {
        if self.is_removed(key) {
            return Ok(None);
        }
        match self.get(key) {
            Some(data) => decode_record(data).map(Some),
            None => load_record(store, key),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &Pubkey> {
        self.writes.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.removals.is_empty()
    }

    /// Applies every staged write and removal to `store`
    pub fn commit(self, store: &mut dyn RecordStore) {
        for key in &self.removals {
            store.remove(key);
        }
        for (key, data) in self.writes {
            store.store(key, data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::MintCounter;

    #[test]
    fn staged_writes_only_land_on_commit() {
        let mut store = MemoryRecordStore::new();
        let key = Pubkey::new_unique();

        let mut staged = StagedWrites::default();
        staged.stage(key, &MintCounter { count: 3 }).unwrap();
        assert!(store.is_empty());
        assert!(staged.get(&key).is_some());

        staged.commit(&mut store);
        let counter: MintCounter = load_record(&store, &key).unwrap().unwrap();
        assert_eq!(counter.count, 3);
    }

    #[test]
    fn staged_removal_hides_record() {
        let mut store = MemoryRecordStore::new();
        let key = Pubkey::new_unique();
        store.store(key, encode_record(&MintCounter { count: 1 }).unwrap());

        let mut staged = StagedWrites::default();
        staged.remove(key);
        assert!(staged
            .load::<MintCounter>(&store, &key)
            .unwrap()
            .is_none());
        assert!(store.contains(&key));

        staged.commit(&mut store);
        assert!(!store.contains(&key));
    }

    #[test]
    fn wrong_discriminator_fails_to_decode() {
        let mut store = MemoryRecordStore::new();
        let key = Pubkey::new_unique();
        store.store(key, vec![0u8; 16]);

        assert_eq!(
            load_record::<MintCounter>(&store, &key).unwrap_err(),
            MintGuardError::DeserializationError.into()
        );
        assert!(load_record::<MintCounter>(&store, &Pubkey::new_unique())
            .unwrap()
            .is_none());
    }
}
