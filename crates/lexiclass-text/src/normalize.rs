/// Lowercase a raw token and split slash-joined compounds into trimmed parts.
///
/// Parts are returned even when empty; [`is_eligible`] rejects those.
pub fn normalize(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split('/')
        .map(|part| part.trim().to_string())
        .collect()
}

/// True when every character is a Latin letter, space, hyphen or slash and at
/// least one Latin letter is present.
pub fn is_eligible(word: &str) -> bool {
    let mut saw_letter = false;
    for c in word.chars() {
        if is_latin_letter(c) {
            saw_letter = true;
        } else if !matches!(c, ' ' | '-' | '/') {
            return false;
        }
    }
    saw_letter
}

/// Alphabetic characters from the Latin script blocks.
pub fn is_latin_letter(c: char) -> bool {
    if !c.is_alphabetic() {
        return false;
    }
    matches!(c,
        'a'..='z'
        | 'A'..='Z'
        | '\u{00AA}'
        | '\u{00BA}'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{02AF}'
        | '\u{1D00}'..='\u{1D25}'
        | '\u{1E00}'..='\u{1EFF}'
        | '\u{2C60}'..='\u{2C7F}'
        | '\u{A722}'..='\u{A7FF}'
        | '\u{AB30}'..='\u{AB5A}'
        | '\u{FB00}'..='\u{FB06}'
        | '\u{FF21}'..='\u{FF3A}'
        | '\u{FF41}'..='\u{FF5A}'
    )
}

/// Uppercase the first letter of every whitespace-separated word and
/// lowercase the rest, collapsing runs of whitespace.
pub fn title_case(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase only the first character, leaving the rest untouched.
pub fn capitalize_sentence(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_slash_compounds() {
        assert_eq!(normalize("And/Or"), vec!["and", "or"]);
        assert_eq!(normalize(" input / output "), vec!["input", "output"]);
        assert_eq!(normalize("/"), vec!["", ""]);
        assert_eq!(normalize("Fox"), vec!["fox"]);
    }

    #[test]
    fn eligibility_requires_latin_letters() {
        assert!(is_eligible("fox"));
        assert!(is_eligible("well-known"));
        assert!(is_eligible("ice cream"));
        assert!(is_eligible("café"));
        assert!(is_eligible("naïve"));

        assert!(!is_eligible(""));
        assert!(!is_eligible("."));
        assert!(!is_eligible("-"));
        assert!(!is_eligible("  "));
        assert!(!is_eligible("fox2"));
        assert!(!is_eligible("don't"));
        assert!(!is_eligible("собака"));
        assert!(!is_eligible("犬"));
        assert!(!is_eligible("fox犬"));
        assert!(!is_eligible("λόγος"));
    }

    #[test]
    fn title_cases_each_word() {
        assert_eq!(title_case("quick"), "Quick");
        assert_eq!(title_case("ICE  cream"), "Ice Cream");
        assert_eq!(title_case("well-KNOWN"), "Well-known");
        assert_eq!(title_case("élan"), "Élan");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn capitalizes_first_character_only() {
        assert_eq!(capitalize_sentence("lead the way."), "Lead the way.");
        assert_eq!(capitalize_sentence("Already fine"), "Already fine");
        assert_eq!(capitalize_sentence("iPhone users"), "IPhone users");
        assert_eq!(capitalize_sentence(""), "");
    }
}
