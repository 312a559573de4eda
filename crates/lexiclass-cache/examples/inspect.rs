use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use lexiclass_cache::{DefinitionStore, JsonDefinitionStore, JsonUnknownStore, UnknownStore};

fn main() -> Result<()> {
    let mut args = env::args().skip(1).map(PathBuf::from);
    let usage = "usage: cargo run -p lexiclass-cache --example inspect -- <word_cache.json> <word_unknown.json>";
    let cache_path = args.next().context(usage)?;
    let unknown_path = args.next().context(usage)?;

    let defs = JsonDefinitionStore::open(&cache_path)
        .with_context(|| format!("loading {}", cache_path.display()))?;
    let unknown = JsonUnknownStore::open(&unknown_path)
        .with_context(|| format!("loading {}", unknown_path.display()))?;

    let mut sense_count = 0usize;
    let mut example_count = 0usize;
    let mut with_phonetic = 0usize;
    let mut overlap = Vec::new();

    for (word, record) in defs.iter() {
        sense_count += record.senses.len();
        example_count += record.examples().count();
        if !record.phonetic.is_empty() {
            with_phonetic += 1;
        }
        if unknown.contains(word) {
            overlap.push(word.to_string());
        }
    }

    println!("Cached words: {}", defs.len());
    println!("Senses: {sense_count}");
    println!("Example sentences: {example_count}");
    println!("Words with phonetics: {with_phonetic}");
    println!("Unknown words: {}", unknown.len());
    if !overlap.is_empty() {
        println!("In both caches (should be empty): {}", overlap.join(", "));
    }

    Ok(())
}
