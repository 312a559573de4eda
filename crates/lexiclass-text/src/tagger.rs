use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use lexiclass_types::TaggedToken;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("document could not be tagged: {0}")]
    Failed(String),
}

/// Part-of-speech tagger producing Penn Treebank tags.
pub trait Tagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TagError>;
}

/// Split text into words and punctuation on Unicode word boundaries.
///
/// Words joined by `-` or `/` with no space between them stay one token, so
/// `well-known` and `and/or` survive. English clitics (`'s`, `n't`, `'re`,
/// `'ll`, `'ve`, `'d`, `'m`) become tokens of their own: `don't` is `do` +
/// `n't`.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut spans: Vec<Span> = Vec::new();
    // Start of a `-` or `/` directly after a word, waiting for the next word.
    let mut joiner: Option<usize> = None;

    for (start, segment) in text.split_word_bound_indices() {
        let end = start + segment.len();
        let is_word = segment.chars().any(char::is_alphanumeric);
        if let Some(at) = joiner.take() {
            if is_word && let Some(last) = spans.last_mut() {
                last.end = end;
                continue;
            }
            spans.push(Span::punct(at, at + 1));
        }
        if segment.chars().all(char::is_whitespace) {
            continue;
        }
        if matches!(segment, "-" | "/")
            && spans.last().is_some_and(|last| last.word && last.end == start)
        {
            joiner = Some(start);
            continue;
        }
        spans.push(Span {
            start,
            end,
            word: is_word,
        });
    }
    if let Some(at) = joiner {
        spans.push(Span::punct(at, at + 1));
    }

    let mut tokens = Vec::with_capacity(spans.len());
    for span in spans {
        let token = &text[span.start..span.end];
        match span.word.then(|| clitic_start(token)).flatten() {
            Some(at) => {
                tokens.push(&token[..at]);
                tokens.push(&token[at..]);
            }
            None => tokens.push(token),
        }
    }
    tokens
}

#[derive(Debug)]
struct Span {
    start: usize,
    end: usize,
    word: bool,
}

impl Span {
    fn punct(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            word: false,
        }
    }
}

/// Byte offset where a trailing clitic begins, if the word has one and
/// something is left in front of it.
fn clitic_start(word: &str) -> Option<usize> {
    // ASCII lowercasing keeps byte offsets intact.
    let lower = word.to_ascii_lowercase();
    for negation in ["n't", "n\u{2019}t"] {
        if lower.len() > negation.len() && lower.ends_with(negation) {
            return Some(lower.len() - negation.len());
        }
    }
    let (at, apostrophe) = lower
        .char_indices()
        .rfind(|&(_, c)| c == '\'' || c == '\u{2019}')?;
    let rest = &lower[at + apostrophe.len_utf8()..];
    (at > 0 && matches!(rest, "s" | "re" | "ll" | "ve" | "d" | "m")).then_some(at)
}

const CLOSED_CLASS: &[(&str, &str)] = &[
    ("the", "DT"),
    ("a", "DT"),
    ("an", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("every", "DT"),
    ("each", "DT"),
    ("some", "DT"),
    ("any", "DT"),
    ("no", "DT"),
    ("another", "DT"),
    ("all", "DT"),
    ("both", "DT"),
    ("either", "DT"),
    ("neither", "DT"),
    ("i", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("me", "PRP"),
    ("him", "PRP"),
    ("us", "PRP"),
    ("them", "PRP"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("his", "PRP$"),
    ("her", "PRP$"),
    ("its", "PRP$"),
    ("our", "PRP$"),
    ("their", "PRP$"),
    ("who", "WP"),
    ("whom", "WP"),
    ("what", "WP"),
    ("which", "WDT"),
    ("when", "WRB"),
    ("where", "WRB"),
    ("why", "WRB"),
    ("how", "WRB"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("of", "IN"),
    ("for", "IN"),
    ("with", "IN"),
    ("by", "IN"),
    ("from", "IN"),
    ("about", "IN"),
    ("into", "IN"),
    ("over", "IN"),
    ("under", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("between", "IN"),
    ("through", "IN"),
    ("during", "IN"),
    ("without", "IN"),
    ("against", "IN"),
    ("among", "IN"),
    ("upon", "IN"),
    ("since", "IN"),
    ("until", "IN"),
    ("because", "IN"),
    ("if", "IN"),
    ("although", "IN"),
    ("while", "IN"),
    ("than", "IN"),
    ("as", "IN"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    ("yet", "CC"),
    ("to", "TO"),
    ("can", "MD"),
    ("could", "MD"),
    ("will", "MD"),
    ("would", "MD"),
    ("shall", "MD"),
    ("should", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("is", "VBZ"),
    ("has", "VBZ"),
    ("does", "VBZ"),
    ("are", "VBP"),
    ("am", "VBP"),
    ("have", "VBP"),
    ("do", "VBP"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("had", "VBD"),
    ("did", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("being", "VBG"),
    ("there", "EX"),
    ("'s", "POS"),
    ("n't", "RB"),
    ("'re", "VBP"),
    ("'ll", "MD"),
    ("'ve", "VBP"),
    ("'d", "MD"),
    ("'m", "VBP"),
    ("not", "RB"),
    ("very", "RB"),
    ("too", "RB"),
    ("also", "RB"),
    ("never", "RB"),
    ("always", "RB"),
    ("often", "RB"),
    ("just", "RB"),
    ("only", "RB"),
    ("even", "RB"),
    ("still", "RB"),
    ("already", "RB"),
    ("here", "RB"),
    ("now", "RB"),
    ("then", "RB"),
    ("soon", "RB"),
    ("good", "JJ"),
    ("new", "JJ"),
    ("old", "JJ"),
    ("great", "JJ"),
    ("big", "JJ"),
    ("small", "JJ"),
    ("large", "JJ"),
    ("little", "JJ"),
    ("long", "JJ"),
    ("short", "JJ"),
    ("high", "JJ"),
    ("low", "JJ"),
    ("young", "JJ"),
    ("quick", "JJ"),
    ("slow", "JJ"),
    ("lazy", "JJ"),
    ("bad", "JJ"),
    ("other", "JJ"),
    ("same", "JJ"),
    ("different", "JJ"),
    ("early", "JJ"),
    ("late", "JJ"),
    ("black", "JJ"),
    ("white", "JJ"),
    ("red", "JJ"),
    ("green", "JJ"),
    ("blue", "JJ"),
    ("brown", "JJ"),
    ("yellow", "JJ"),
    ("grey", "JJ"),
    ("gray", "JJ"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "able", "ible", "ive", "less", "ical"];

/// Lexicon-driven tagger with suffix and context fallbacks for words the
/// lexicon does not list.
///
/// Lookup order: user lexicon, built-in closed-class table, punctuation and
/// numbers, then heuristics on the lowercased word and the previous tag.
#[derive(Clone, Debug)]
pub struct LexiconTagger {
    lexicon: HashMap<String, String>,
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconTagger {
    pub fn new() -> Self {
        let lexicon = CLOSED_CLASS
            .iter()
            .map(|(word, tag)| (word.to_string(), tag.to_string()))
            .collect();
        Self { lexicon }
    }

    /// Built-in table plus entries from a `word<TAB>TAG` file. File entries
    /// win over built-in ones; blank lines and `#` comments are skipped.
    pub fn with_lexicon_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("open lexicon file {}", path.display()))?;
        let mut tagger = Self::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line =
                line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(word), Some(tag)) => tagger.insert(word, tag),
                _ => anyhow::bail!(
                    "{}:{}: expected `word<TAB>TAG`",
                    path.display(),
                    lineno + 1
                ),
            }
        }
        Ok(tagger)
    }

    pub fn insert(&mut self, word: &str, tag: &str) {
        self.lexicon.insert(word.to_lowercase(), tag.to_string());
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn tag_word(&self, surface: &str, prev: Option<&str>) -> String {
        let lower = surface.to_lowercase().replace('\u{2019}', "'");
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.clone();
        }
        if !surface.chars().any(char::is_alphanumeric) {
            return surface.to_string();
        }
        if surface
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | ':'))
        {
            return "CD".to_string();
        }

        let sentence_start = matches!(prev, None | Some(".") | Some("!") | Some("?"));
        let capitalized = surface.chars().next().is_some_and(char::is_uppercase);
        if capitalized && !sentence_start {
            return "NNP".to_string();
        }

        let prev = prev.unwrap_or("");
        let tag = if matches!(prev, "MD" | "TO") {
            "VB"
        } else if lower.len() > 3 && lower.ends_with("ly") {
            "RB"
        } else if lower.len() > 4 && lower.ends_with("ing") {
            "VBG"
        } else if lower.len() > 3 && lower.ends_with("ed") {
            if matches!(prev, "VBZ" | "VBP" | "VBD") {
                "VBN"
            } else {
                "VBD"
            }
        } else if ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| lower.len() > suffix.len() + 1 && lower.ends_with(suffix))
        {
            "JJ"
        } else if lower.len() > 2 && lower.ends_with('s') && !lower.ends_with("ss") {
            if matches!(prev, "PRP" | "NN" | "NNP") {
                "VBZ"
            } else {
                "NNS"
            }
        } else if prev == "PRP" {
            "VBP"
        } else {
            "NN"
        };
        tag.to_string()
    }
}

impl Tagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TagError> {
        if let Some(offset) = text.find('\0') {
            return Err(TagError::Failed(format!(
                "NUL byte at offset {offset}; not a text document"
            )));
        }
        let mut out: Vec<TaggedToken> = Vec::new();
        for surface in tokenize(text) {
            let prev = out.last().map(|t| t.tag.as_str());
            let tag = self.tag_word(surface, prev);
            out.push(TaggedToken::new(surface, tag));
        }
        Ok(out)
    }
}
