//! Text rendering for the explanation and example-sentence files.

use std::fmt::Write;

use lexiclass_text::{capitalize_sentence, title_case};
use lexiclass_types::WordRecord;
use rand::Rng;

use crate::config::OutputSettings;

/// Render a record as a header line, an optional origin line and one
/// numbered block per sense.
///
/// Sense numbers are positions in the record, so filtering out senses
/// without examples leaves gaps in the numbering.
pub fn format_definitions(word: &str, record: &WordRecord, options: &OutputSettings) -> String {
    let name = title_case(word);
    let mut out = String::new();

    if options.include_phonetic && !record.phonetic.is_empty() {
        let _ = writeln!(out, "{name} {}", record.phonetic);
    } else {
        let _ = writeln!(out, "{name}");
    }
    if options.include_origin && !record.origin.is_empty() {
        let _ = writeln!(out, "\tOrigin: {}", record.origin);
    }
    if !record.has_senses() {
        let _ = writeln!(out, "\t{name}: No details available.");
        return out;
    }

    for (index, sense) in record.senses.iter().enumerate() {
        if options.filter_without_examples && sense.example.is_none() {
            continue;
        }
        let n = index + 1;
        let _ = writeln!(
            out,
            "\t{name} {n}, {}: {}",
            sense.part_of_speech, sense.definition
        );
        if let Some(example) = &sense.example {
            let _ = writeln!(out, "\t\t{name} {n} Example: {example}");
        }
        if options.include_synonyms && !sense.synonyms.is_empty() {
            let _ = writeln!(out, "\t\t{name} {n} Synonyms: {}", sense.synonyms.join(", "));
        }
        if options.include_antonyms && !sense.antonyms.is_empty() {
            let _ = writeln!(out, "\t\t{name} {n} Antonyms: {}", sense.antonyms.join(", "));
        }
    }

    remove_empty_lines(&out)
}

/// Drop lines that are empty or whitespace only. Keeps a trailing newline
/// so consecutive entries never run together.
pub fn remove_empty_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Every example sentence in the record, first letter capitalized.
pub fn collect_examples(record: &WordRecord) -> Vec<String> {
    record.examples().map(capitalize_sentence).collect()
}

/// Keep everything when `max_count` is 0 or covers the whole list; otherwise
/// draw `max_count` entries without replacement, in draw order.
pub fn sample_examples<R: Rng + ?Sized>(
    mut examples: Vec<String>,
    max_count: usize,
    rng: &mut R,
) -> Vec<String> {
    if max_count == 0 || max_count >= examples.len() {
        return examples;
    }
    let mut picked = Vec::with_capacity(max_count);
    for _ in 0..max_count {
        let index = rng.random_range(0..examples.len());
        picked.push(examples.remove(index));
    }
    picked
}

/// Example-sentence block for one word, or an empty string when the record
/// has no examples.
pub fn format_examples<R: Rng + ?Sized>(
    word: &str,
    record: &WordRecord,
    max_count: usize,
    rng: &mut R,
) -> String {
    let examples = sample_examples(collect_examples(record), max_count, rng);
    if examples.is_empty() {
        return String::new();
    }
    let mut out = format!("{}\n", title_case(word));
    for example in examples {
        let _ = writeln!(out, "\t{example}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use lexiclass_types::Sense;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn lead() -> WordRecord {
        let mut record = WordRecord {
            phonetic: "/liːd/".into(),
            origin: "Old English lǣdan".into(),
            ..WordRecord::default()
        };
        record.push_sense(
            Sense::new("verb", "To guide or conduct.")
                .with_example("she led the team.")
                .with_synonyms(["guide", "conduct"])
                .with_antonyms(["follow"]),
        );
        record.push_sense(Sense::new("noun", "A heavy metal.").with_synonyms(["plumbum"]));
        record.push_sense(Sense::new("noun", "The front position.").with_example("Take the lead."));
        record
    }

    #[test]
    fn full_layout() {
        let text = format_definitions("lead", &lead(), &OutputSettings::default());
        let want = "\
Lead /liːd/
\tOrigin: Old English lǣdan
\tLead 1, verb: To guide or conduct.
\t\tLead 1 Example: she led the team.
\t\tLead 1 Synonyms: guide, conduct
\t\tLead 1 Antonyms: follow
\tLead 2, noun: A heavy metal.
\t\tLead 2 Synonyms: plumbum
\tLead 3, noun: The front position.
\t\tLead 3 Example: Take the lead.
";
        assert_eq!(text, want);
    }

    #[test]
    fn toggles_remove_optional_lines() {
        let options = OutputSettings {
            include_phonetic: false,
            include_origin: false,
            include_synonyms: false,
            include_antonyms: false,
            ..OutputSettings::default()
        };
        let text = format_definitions("lead", &lead(), &options);
        assert!(text.starts_with("Lead\n\tLead 1, verb"));
        assert!(!text.contains("Origin"));
        assert!(!text.contains("Synonyms"));
        assert!(!text.contains("Antonyms"));
        assert!(text.contains("Lead 1 Example"));
    }

    #[test]
    fn filtering_keeps_original_numbers() {
        let options = OutputSettings {
            filter_without_examples: true,
            ..OutputSettings::default()
        };
        let text = format_definitions("lead", &lead(), &options);
        assert!(text.contains("\tLead 1, verb"));
        assert!(!text.contains("Lead 2"));
        assert!(text.contains("\tLead 3, noun"));
    }

    #[test]
    fn record_without_senses() {
        let record = WordRecord::default();
        let text = format_definitions("ice cream", &record, &OutputSettings::default());
        assert_eq!(text, "Ice Cream\n\tIce Cream: No details available.\n");
    }

    #[test]
    fn blank_lines_are_removed() {
        assert_eq!(remove_empty_lines("a\n\n  \nb\n\t\n"), "a\nb\n");
        assert_eq!(remove_empty_lines(""), "");
    }

    #[test]
    fn examples_are_capitalized_in_order() {
        assert_eq!(
            collect_examples(&lead()),
            vec!["She led the team.", "Take the lead."]
        );
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(
            format_examples("lead", &lead(), 0, &mut rng),
            "Lead\n\tShe led the team.\n\tTake the lead.\n"
        );
        assert_eq!(format_examples("lead", &WordRecord::default(), 0, &mut rng), "");
    }

    #[test]
    fn sampling_returns_everything_when_not_limited() {
        let examples: Vec<String> = (0..5).map(|i| format!("example {i}")).collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_examples(examples.clone(), 0, &mut rng), examples);
        assert_eq!(sample_examples(examples.clone(), 5, &mut rng), examples);
        assert_eq!(sample_examples(examples.clone(), 9, &mut rng), examples);
    }

    #[test]
    fn sampling_draws_distinct_examples() {
        let examples: Vec<String> = (0..10).map(|i| format!("example {i}")).collect();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for max in 1..examples.len() {
                let picked = sample_examples(examples.clone(), max, &mut rng);
                assert_eq!(picked.len(), max);
                let distinct: HashSet<&String> = picked.iter().collect();
                assert_eq!(distinct.len(), max);
                assert!(picked.iter().all(|p| examples.contains(p)));
            }
        }
    }

    #[test]
    fn sampling_is_reproducible_with_a_seed() {
        let examples: Vec<String> = (0..10).map(|i| format!("example {i}")).collect();
        let first = sample_examples(examples.clone(), 3, &mut StdRng::seed_from_u64(42));
        let second = sample_examples(examples, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
