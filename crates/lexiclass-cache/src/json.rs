use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lexiclass_types::WordRecord;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{DefinitionStore, UnknownStore};

/// Positive cache persisted as `{ "word": WordRecord, ... }`.
#[derive(Debug)]
pub struct JsonDefinitionStore {
    path: PathBuf,
    entries: BTreeMap<String, WordRecord>,
}

impl JsonDefinitionStore {
    /// Load the cache at `path`. A missing file starts an empty cache; an
    /// unparsable one is moved aside to `<path>.bak` and the cache starts
    /// empty. Entries without senses are dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries: BTreeMap<String, WordRecord> = load_or_default(&path)?;
        entries.retain(|word, record| {
            if !record.has_senses() {
                warn!("dropping cached entry for {word}: no definitions");
            }
            record.has_senses()
        });
        debug!("loaded {} cached words from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WordRecord)> + '_ {
        self.entries.iter().map(|(word, record)| (word.as_str(), record))
    }

    pub fn flush(&self) -> Result<()> {
        write_atomic(&self.path, &self.entries)
    }
}

impl DefinitionStore for JsonDefinitionStore {
    fn get(&self, word: &str) -> Option<&WordRecord> {
        self.entries.get(word)
    }

    fn insert(&mut self, word: &str, record: WordRecord) -> Result<()> {
        self.entries.insert(word.to_string(), record);
        self.flush()
    }

    fn remove(&mut self, word: &str) -> Result<bool> {
        if self.entries.remove(word).is_none() {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Negative cache persisted as `{ "word": true, ... }`.
#[derive(Debug)]
pub struct JsonUnknownStore {
    path: PathBuf,
    words: BTreeSet<String>,
}

impl JsonUnknownStore {
    /// Load the set at `path`; same missing/corrupt handling as
    /// [`JsonDefinitionStore::open`]. Every key counts, whatever its value.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw: BTreeMap<String, bool> = load_or_default(&path)?;
        let words: BTreeSet<String> = raw.into_keys().collect();
        debug!("loaded {} unknown words from {}", words.len(), path.display());
        Ok(Self { path, words })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.words.iter().map(String::as_str)
    }

    pub fn flush(&self) -> Result<()> {
        let raw: BTreeMap<&str, bool> = self.words.iter().map(|w| (w.as_str(), true)).collect();
        write_atomic(&self.path, &raw)
    }
}

impl UnknownStore for JsonUnknownStore {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn insert(&mut self, word: &str) -> Result<()> {
        self.words.insert(word.to_string());
        self.flush()
    }

    fn remove(&mut self, word: &str) -> Result<bool> {
        if !self.words.remove(word) {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}

fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("open cache file {}", path.display()));
        }
    };
    match serde_json::from_reader(BufReader::new(file)) {
        Ok(value) => Ok(value),
        Err(err) => {
            let backup = backup_path(path);
            warn!(
                "cache file {} is not valid JSON ({err}); moving it to {} and starting empty",
                path.display(),
                backup.display()
            );
            fs::rename(path, &backup)
                .with_context(|| format!("move {} aside", path.display()))?;
            Ok(T::default())
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("create cache directory {}", parent.display()))?;

    let temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)
            .with_context(|| format!("serialize {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("write {}", path.display()))?;
    }
    temp.persist(path)
        .with_context(|| format!("replace cache file {}", path.display()))?;
    Ok(())
}
