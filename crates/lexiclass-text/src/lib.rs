//! Text handling for word classification: everything between raw document
//! text and a frequency-ordered list of unique words.
//!
//! # How it works
//! 1. [`Tagger`] turns a document into tagged tokens. [`LexiconTagger`] is the
//!    built-in implementation; anything else can be plugged in.
//! 2. [`normalize`] lowercases each token and splits slash compounds.
//! 3. [`is_eligible`] keeps only Latin-script words.
//! 4. [`FrequencyTable`] counts phrases, [`rank`] and [`deduplicate`] produce
//!    the final ordering.
//!
//! # Example
//! ```
//! use lexiclass_text::{LexiconTagger, Tagger, deduplicate, is_eligible, normalize, rank};
//!
//! # fn main() -> Result<(), lexiclass_text::TagError> {
//! let tagger = LexiconTagger::new();
//! let mut words = Vec::new();
//! for token in tagger.tag("The fox and/or the Fox.")? {
//!     words.extend(normalize(&token.text).into_iter().filter(|w| is_eligible(w)));
//! }
//! assert_eq!(deduplicate(rank(&words)), vec!["Fox", "The", "And", "Or"]);
//! # Ok(()) }
//! ```

mod normalize;
mod rank;
mod tagger;

pub use normalize::{capitalize_sentence, is_eligible, is_latin_letter, normalize, title_case};
pub use rank::{FrequencyTable, deduplicate, rank};
pub use tagger::{LexiconTagger, TagError, Tagger, tokenize};
