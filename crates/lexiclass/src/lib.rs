//! Part-of-speech word lists with dictionary definitions.
//!
//! [`Pipeline`] reads a directory of text files, files every eligible word
//! under a [`Category`](lexiclass_types::Category), and resolves each distinct
//! word once through a [`Resolver`]. The resolver answers from the definition
//! cache or the unknown-word cache when it can and only asks the
//! [`DictionaryClient`] on a miss.

pub mod client;
pub mod config;
pub mod format;
pub mod pipeline;
pub mod resolver;
pub mod throttle;

pub use client::{ApiEntry, DictionaryClient, HttpDictionary, LookupError};
pub use config::{ConfigError, OutputSettings, Settings};
pub use format::{format_definitions, format_examples, sample_examples};
pub use pipeline::{Pipeline, PipelineError, RunSummary, default_output_dir};
pub use resolver::{ResolveError, Resolver};
