use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use crate::normalize::title_case;

/// Occurrence counts per phrase. Counts only ever grow.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, phrase: &str) {
        self.add_count(phrase, 1);
    }

    pub fn add_count(&mut self, phrase: &str, count: usize) {
        if let Some(existing) = self.counts.get_mut(phrase) {
            *existing += count;
        } else {
            self.counts.insert(phrase.to_string(), count);
        }
    }

    /// Fold another table into this one, summing shared phrases.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (phrase, count) in &other.counts {
            self.add_count(phrase, *count);
        }
    }

    pub fn count(&self, phrase: &str) -> usize {
        self.counts.get(phrase).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Phrases by descending count; ties broken by the lowercased phrase,
    /// then the phrase itself, so the order never depends on hashing.
    pub fn ranked(&self) -> Vec<String> {
        let mut entries: Vec<(&String, usize, String)> = self
            .counts
            .iter()
            .map(|(phrase, count)| (phrase, *count, phrase.to_lowercase()))
            .collect();
        entries.sort_by(|a, b| {
            (Reverse(a.1), &a.2, a.0).cmp(&(Reverse(b.1), &b.2, b.0))
        });
        entries
            .into_iter()
            .map(|(phrase, _, _)| phrase.clone())
            .collect()
    }
}

/// Count phrases under their title-cased display form and return them by
/// descending frequency.
pub fn rank<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut table = FrequencyTable::new();
    for item in items {
        table.add(&title_case(item.as_ref()));
    }
    table.ranked()
}

/// Drop repeated entries, keeping the first occurrence of each.
pub fn deduplicate<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = item.into();
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}
