//! Shared types for classifying words and caching their dictionary entries.
//!
//! A document is turned into [`TaggedToken`]s by a part-of-speech tagger,
//! each accepted word becomes a [`Token`] in one of five [`Category`]
//! buckets, and every distinct word is resolved to a [`Resolution`]: either a
//! [`WordRecord`] with at least one [`Sense`], or `Unknown`.
//!
//! [`WordRecord`] serializes with the same PascalCase field names the cache
//! files have always used, so existing `word_cache.json` files load as-is.
//!
//! ```rust
//! use lexiclass_types::{Category, Sense, WordRecord};
//!
//! assert_eq!(Category::from_tag("VBZ"), Category::Verbs);
//! assert_eq!(Category::from_tag("."), Category::OtherWords);
//!
//! let mut record = WordRecord::default();
//! record.push_sense(Sense::new("noun", "a heavy metal").with_synonyms(["plumbum"]));
//! assert_eq!(record.synonyms, vec!["plumbum"]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Output bucket a word is filed under, derived from its Penn Treebank tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Category {
    Nouns,
    Verbs,
    Adjectives,
    Adverbs,
    OtherWords,
}

impl Category {
    /// Every category, in the order output files are produced.
    pub const ALL: [Category; 5] = [
        Category::Nouns,
        Category::Verbs,
        Category::Adjectives,
        Category::Adverbs,
        Category::OtherWords,
    ];

    /// Map a part-of-speech tag to its bucket.
    ///
    /// Total: punctuation, unknown and empty tags all land in
    /// [`Category::OtherWords`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "NN" | "NNS" | "NNP" | "NNPS" => Category::Nouns,
            "VB" | "VBD" | "VBP" | "VBZ" | "VBG" => Category::Verbs,
            "JJ" | "JJR" | "JJS" => Category::Adjectives,
            "RB" | "RBR" | "RBS" => Category::Adverbs,
            _ => Category::OtherWords,
        }
    }

    /// Label used for file names and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Category::Nouns => "Nouns",
            Category::Verbs => "Verbs",
            Category::Adjectives => "Adjectives",
            Category::Adverbs => "Adverbs",
            Category::OtherWords => "OtherWords",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw tagger output: surface text plus its tag.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TaggedToken {
    pub text: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }
}

/// A normalized word or phrase filed under its category.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub phrase: String,
    pub category: Category,
}

/// One part-of-speech-tagged definition of a word.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sense {
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default, with = "empty_as_none")]
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

impl Sense {
    pub fn new(part_of_speech: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            part_of_speech: part_of_speech.into(),
            definition: definition.into(),
            ..Self::default()
        }
    }

    /// Attach an example sentence; empty strings count as no example.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        let example = example.into();
        self.example = (!example.is_empty()).then_some(example);
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_antonyms<I, S>(mut self, antonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.antonyms = antonyms.into_iter().map(Into::into).collect();
        self
    }
}

/// Full dictionary entry for one word, as stored in the positive cache.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WordRecord {
    #[serde(rename = "Definitions", default)]
    pub senses: Vec<Sense>,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub origin: String,
    /// Synonyms of every sense, in discovery order, without repeats.
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Antonyms of every sense, in discovery order, without repeats.
    #[serde(default)]
    pub antonyms: Vec<String>,
}

impl WordRecord {
    /// Append a sense and fold its synonyms/antonyms into the record-level sets.
    pub fn push_sense(&mut self, sense: Sense) {
        extend_unique(&mut self.synonyms, &sense.synonyms);
        extend_unique(&mut self.antonyms, &sense.antonyms);
        self.senses.push(sense);
    }

    pub fn has_senses(&self) -> bool {
        !self.senses.is_empty()
    }

    /// Non-empty example sentences in sense order.
    pub fn examples(&self) -> impl Iterator<Item = &str> + '_ {
        self.senses
            .iter()
            .filter_map(|sense| sense.example.as_deref())
            .filter(|example| !example.is_empty())
    }
}

/// Outcome of resolving one word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    Known(WordRecord),
    Unknown,
}

impl Resolution {
    pub fn is_known(&self) -> bool {
        matches!(self, Resolution::Known(_))
    }

    pub fn record(&self) -> Option<&WordRecord> {
        match self {
            Resolution::Known(record) => Some(record),
            Resolution::Unknown => None,
        }
    }
}

fn extend_unique(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

/// Cache files store a missing example as `""`.
mod empty_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}
