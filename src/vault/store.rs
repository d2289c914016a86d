//! In-memory credential collection.
//!
//! `CredentialStore` keeps a map of id -> entry plus a separate
//! `entries_order` list that defines display order.  The id set of the
//! order list always equals the key set of the map, with no duplicates.
//! Every mutation validates its input completely before touching either
//! collection, so a failed call leaves the store exactly as it was.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;
use zeroize::Zeroize;

use super::entry::CredentialEntry;
use crate::errors::{VaultError, Result};

/// The decrypted contents of a vault.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CredentialStore {
    /// id -> entry.
    entries: HashMap<Uuid, CredentialEntry>,

    /// Display order.
    order: Vec<Uuid>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a decrypted entry map and the stored order.
    ///
    /// Used when opening a vault; any inconsistency means the container
    /// is structurally broken and is reported as `VaultError::Format`.
    pub fn from_parts(entries: HashMap<Uuid, CredentialEntry>, order: Vec<Uuid>) -> Result<Self> {
        for (id, entry) in &entries {
            if *id != entry.id() {
                return Err(VaultError::Format(format!(
                    "entry stored under {id} carries id {}",
                    entry.id()
                )));
            }
            entry
                .validate()
                .map_err(|e| VaultError::Format(format!("entry {id}: {e}")))?;
        }

        let mut seen = HashSet::with_capacity(order.len());
        for id in &order {
            if !seen.insert(*id) {
                return Err(VaultError::Format(format!(
                    "entries_order lists {id} more than once"
                )));
            }
            if !entries.contains_key(id) {
                return Err(VaultError::Format(format!(
                    "entries_order lists {id} but no such entry exists"
                )));
            }
        }
        if seen.len() != entries.len() {
            return Err(VaultError::Format(format!(
                "entries_order has {} ids but the vault holds {} entries",
                seen.len(),
                entries.len()
            )));
        }

        Ok(Self { entries, order })
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append a new entry at the end of the order.
    pub fn add(&mut self, entry: CredentialEntry) -> Result<Uuid> {
        entry.validate()?;
        let id = entry.id();
        if self.entries.contains_key(&id) {
            return Err(VaultError::DuplicateEntry(id));
        }

        self.order.push(id);
        self.entries.insert(id, entry);
        self.debug_check();
        Ok(id)
    }

    /// Append several entries (e.g. a batch import) as one operation.
    ///
    /// Either all entries are added or none are.
    pub fn extend<I>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = CredentialEntry>,
    {
        let batch: Vec<CredentialEntry> = entries.into_iter().collect();

        let mut ids = HashSet::with_capacity(batch.len());
        for entry in &batch {
            entry.validate()?;
            if self.entries.contains_key(&entry.id()) || !ids.insert(entry.id()) {
                return Err(VaultError::DuplicateEntry(entry.id()));
            }
        }

        let count = batch.len();
        for entry in batch {
            self.order.push(entry.id());
            self.entries.insert(entry.id(), entry);
        }
        self.debug_check();
        Ok(count)
    }

    /// Replace an existing entry wholesale.
    ///
    /// The stored `created_at` is kept, `updated_at` is bumped, and the
    /// entry keeps its position.
    pub fn update(&mut self, mut entry: CredentialEntry) -> Result<()> {
        entry.validate()?;
        let id = entry.id();
        let created_at = self
            .entries
            .get(&id)
            .map(CredentialEntry::created_at)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;

        entry.touch(created_at);
        if let Some(mut old) = self.entries.insert(id, entry) {
            old.zeroize();
        }
        Ok(())
    }

    /// Remove a set of entries from both the map and the order.
    ///
    /// Every id must exist; otherwise nothing is removed.
    pub fn remove(&mut self, ids: &HashSet<Uuid>) -> Result<usize> {
        if let Some(missing) = ids.iter().find(|id| !self.entries.contains_key(*id)) {
            return Err(VaultError::EntryNotFound(missing.to_string()));
        }

        self.order.retain(|id| !ids.contains(id));
        for id in ids {
            if let Some(mut old) = self.entries.remove(id) {
                old.zeroize();
            }
        }
        self.debug_check();
        Ok(ids.len())
    }

    /// Replace the display order.  `new_order` must be a permutation of
    /// the current ids.
    pub fn reorder(&mut self, new_order: Vec<Uuid>) -> Result<()> {
        if new_order.len() != self.order.len() {
            return Err(VaultError::Validation(format!(
                "new order has {} ids, store has {}",
                new_order.len(),
                self.order.len()
            )));
        }

        let mut seen = HashSet::with_capacity(new_order.len());
        for id in &new_order {
            if !self.entries.contains_key(id) {
                return Err(VaultError::Validation(format!(
                    "new order contains unknown id {id}"
                )));
            }
            if !seen.insert(*id) {
                return Err(VaultError::Validation(format!(
                    "new order contains {id} more than once"
                )));
            }
        }

        self.order = new_order;
        self.debug_check();
        Ok(())
    }

    /// Move one entry to `to_index` (clamped to the end of the list).
    pub fn move_entry(&mut self, id: Uuid, to_index: usize) -> Result<()> {
        let from = self
            .position(id)
            .ok_or_else(|| VaultError::EntryNotFound(id.to_string()))?;

        let mut new_order = self.order.clone();
        let moved = new_order.remove(from);
        let to = to_index.min(new_order.len());
        new_order.insert(to, moved);
        self.reorder(new_order)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get(&self, id: Uuid) -> Option<&CredentialEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The display order.
    pub fn order(&self) -> &[Uuid] {
        &self.order
    }

    /// Index of `id` in the display order.
    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CredentialEntry> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Entries whose website name or username contains `query`
    /// (case-insensitive), in display order.  An empty query matches all.
    pub fn filter(&self, query: &str) -> Vec<&CredentialEntry> {
        let needle = query.trim().to_lowercase();
        self.iter()
            .filter(|e| {
                needle.is_empty()
                    || e.website_name().to_lowercase().contains(&needle)
                    || e.username().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Resolve a full id or a unique hex prefix of one.
    pub fn resolve(&self, prefix: &str) -> Result<Uuid> {
        let needle: String = prefix
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        if needle.is_empty() {
            return Err(VaultError::EntryNotFound(prefix.to_string()));
        }

        let mut matches = self
            .order
            .iter()
            .filter(|id| id.simple().to_string().starts_with(&needle));

        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(*id),
            (Some(_), Some(_)) => Err(VaultError::AmbiguousId(prefix.to_string())),
            (None, _) => Err(VaultError::EntryNotFound(prefix.to_string())),
        }
    }

    /// The id -> entry map, for serialization.
    pub(crate) fn entries(&self) -> &HashMap<Uuid, CredentialEntry> {
        &self.entries
    }

    fn debug_check(&self) {
        debug_assert_eq!(self.order.len(), self.entries.len());
        debug_assert!(self.order.iter().all(|id| self.entries.contains_key(id)));
    }
}

impl Drop for CredentialStore {
    fn drop(&mut self) {
        for entry in self.entries.values_mut() {
            entry.zeroize();
        }
    }
}
