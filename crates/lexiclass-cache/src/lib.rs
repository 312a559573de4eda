//! Repositories for resolved dictionary lookups.
//!
//! Two stores back the word resolver:
//! - a [`DefinitionStore`] holding a [`WordRecord`] per word with at least one
//!   sense (the positive cache), and
//! - an [`UnknownStore`] holding words known to have no definition (the
//!   negative cache).
//!
//! Every mutating call persists before returning, so a crash loses at most
//! the lookup in flight. Keys are stored exactly as given; callers lowercase.
//! Keeping a word out of both stores at once is the caller's job.
//!
//! [`JsonDefinitionStore`] and [`JsonUnknownStore`] rewrite their whole file on
//! each mutation (pretty-printed, sorted keys, atomic rename).
//! [`MemoryDefinitionStore`] and [`MemoryUnknownStore`] keep everything in
//! memory and count flushes, which is what tests want.
//!
//! # Example
//! ```no_run
//! use lexiclass_cache::{DefinitionStore, JsonDefinitionStore, JsonUnknownStore, UnknownStore};
//!
//! # fn main() -> anyhow::Result<()> {
//! let definitions = JsonDefinitionStore::open("word_cache.json")?;
//! let mut unknown = JsonUnknownStore::open("word_unknown.json")?;
//! if !definitions.contains("xyzzy") {
//!     unknown.insert("xyzzy")?;
//! }
//! println!("{} known, {} unknown", definitions.len(), unknown.len());
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p lexiclass-cache --example inspect -- <cache> <unknown>`.

use anyhow::Result;
use lexiclass_types::WordRecord;

mod json;
mod memory;

pub use json::{JsonDefinitionStore, JsonUnknownStore};
pub use memory::{MemoryDefinitionStore, MemoryUnknownStore};

/// Positive cache: words with at least one sense.
pub trait DefinitionStore {
    fn get(&self, word: &str) -> Option<&WordRecord>;

    fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    /// Insert or replace `word` and persist.
    fn insert(&mut self, word: &str, record: WordRecord) -> Result<()>;

    /// Remove `word`, persisting only when something was removed.
    fn remove(&mut self, word: &str) -> Result<bool>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Negative cache: words with no resolvable definition.
pub trait UnknownStore {
    fn contains(&self, word: &str) -> bool;

    /// Add `word` and persist.
    fn insert(&mut self, word: &str) -> Result<()>;

    /// Remove `word`, persisting only when something was removed.
    fn remove(&mut self, word: &str) -> Result<bool>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
