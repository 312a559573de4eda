use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use lexiclass_types::WordRecord;

use crate::{DefinitionStore, UnknownStore};

/// In-memory positive cache. `flushes` counts what a file store would have
/// written.
#[derive(Clone, Debug, Default)]
pub struct MemoryDefinitionStore {
    entries: BTreeMap<String, WordRecord>,
    flushes: usize,
}

impl MemoryDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

impl DefinitionStore for MemoryDefinitionStore {
    fn get(&self, word: &str) -> Option<&WordRecord> {
        self.entries.get(word)
    }

    fn insert(&mut self, word: &str, record: WordRecord) -> Result<()> {
        self.entries.insert(word.to_string(), record);
        self.flushes += 1;
        Ok(())
    }

    fn remove(&mut self, word: &str) -> Result<bool> {
        let removed = self.entries.remove(word).is_some();
        if removed {
            self.flushes += 1;
        }
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// In-memory negative cache.
#[derive(Clone, Debug, Default)]
pub struct MemoryUnknownStore {
    words: BTreeSet<String>,
    flushes: usize,
}

impl MemoryUnknownStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }
}

impl UnknownStore for MemoryUnknownStore {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn insert(&mut self, word: &str) -> Result<()> {
        self.words.insert(word.to_string());
        self.flushes += 1;
        Ok(())
    }

    fn remove(&mut self, word: &str) -> Result<bool> {
        let removed = self.words.remove(word);
        if removed {
            self.flushes += 1;
        }
        Ok(removed)
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}
