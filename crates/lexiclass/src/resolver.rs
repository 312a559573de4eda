use lexiclass_cache::{DefinitionStore, UnknownStore};
use lexiclass_types::{Resolution, Sense, WordRecord};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{ApiEntry, DictionaryClient};

/// Only cache persistence can fail a resolution; lookup failures become
/// [`Resolution::Unknown`].
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Cache(#[from] anyhow::Error),
}

/// Resolves words against the two caches and, on a miss, the dictionary.
///
/// A word is never in both stores: a successful lookup removes it from the
/// unknown set and a failed one only happens for words missing from the
/// definition store.
pub struct Resolver<C, D, U> {
    client: C,
    definitions: D,
    unknown: U,
    query_unknown: bool,
    remote_lookups: usize,
}

impl<C, D, U> Resolver<C, D, U>
where
    C: DictionaryClient,
    D: DefinitionStore,
    U: UnknownStore,
{
    pub fn new(client: C, definitions: D, unknown: U) -> Self {
        Self {
            client,
            definitions,
            unknown,
            query_unknown: false,
            remote_lookups: 0,
        }
    }

    /// Ask the dictionary again for words recorded as unknown.
    pub fn query_unknown(mut self, enabled: bool) -> Self {
        self.query_unknown = enabled;
        self
    }

    pub async fn resolve(&mut self, word: &str) -> Result<Resolution, ResolveError> {
        let word = word.trim().to_lowercase();

        if !self.query_unknown && self.unknown.contains(&word) {
            debug!("{word} is a known unknown; skipping lookup");
            return Ok(Resolution::Unknown);
        }
        if let Some(record) = self.definitions.get(&word)
            && record.has_senses()
        {
            debug!("{word} found in definition cache");
            return Ok(Resolution::Known(record.clone()));
        }
        if self.definitions.remove(&word)? {
            warn!("cached entry for {word} has no definitions; looking it up again");
        }

        self.remote_lookups += 1;
        let entries = match self.client.lookup(&word).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!("no definition for {word}: {err}");
                return self.mark_unknown(&word);
            }
        };
        let Some(entry) = entries.into_iter().next() else {
            warn!("no definition for {word}: empty entry list");
            return self.mark_unknown(&word);
        };
        let record = record_from_entry(entry);
        if !record.has_senses() {
            warn!("dictionary entry for {word} has no definitions");
            return self.mark_unknown(&word);
        }

        self.definitions.insert(&word, record.clone())?;
        if self.unknown.remove(&word)? {
            info!("{word} is no longer unknown");
        }
        Ok(Resolution::Known(record))
    }

    fn mark_unknown(&mut self, word: &str) -> Result<Resolution, ResolveError> {
        if !self.unknown.contains(word) {
            self.unknown.insert(word)?;
        }
        Ok(Resolution::Unknown)
    }

    /// Dictionary requests made so far.
    pub fn remote_lookups(&self) -> usize {
        self.remote_lookups
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn definitions(&self) -> &D {
        &self.definitions
    }

    pub fn unknown(&self) -> &U {
        &self.unknown
    }

    pub fn into_stores(self) -> (D, U) {
        (self.definitions, self.unknown)
    }
}

/// Flatten the first dictionary entry into a cache record: every definition
/// of every meaning becomes a sense, in response order.
pub fn record_from_entry(entry: ApiEntry) -> WordRecord {
    let phonetic = entry
        .phonetic
        .filter(|p| !p.is_empty())
        .or_else(|| {
            entry
                .phonetics
                .into_iter()
                .filter_map(|p| p.text)
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default();

    let mut record = WordRecord {
        phonetic,
        origin: entry.origin.unwrap_or_default(),
        ..WordRecord::default()
    };
    for meaning in entry.meanings {
        for definition in meaning.definitions {
            let sense = Sense::new(meaning.part_of_speech.as_str(), definition.definition)
                .with_example(definition.example.unwrap_or_default())
                .with_synonyms(definition.synonyms)
                .with_antonyms(definition.antonyms);
            record.push_sense(sense);
        }
    }
    record
}
