//! `lexiclass.yml`: output toggles, lookup behaviour, proxy and cache paths.
//!
//! Every key is optional. A missing file is written out with the defaults so
//! users have something to edit; a file that exists but does not parse is an
//! error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::client::DEFAULT_ENDPOINT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("failed to write default config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub output: OutputSettings,
    pub query: QuerySettings,
    pub proxy: ProxySettings,
    pub input: InputSettings,
    pub dictionary: DictionarySettings,
    pub cache: CacheSettings,
}

/// What goes into the explanation and example files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputSettings {
    pub include_phonetic: bool,
    pub include_origin: bool,
    pub include_synonyms: bool,
    pub include_antonyms: bool,
    /// Drop senses that carry no example sentence from explanations.
    #[serde(rename = "filterDefinitionsWithoutExamples")]
    pub filter_without_examples: bool,
    pub generate_explanations: bool,
    pub generate_example_sentences: bool,
    /// 0 keeps every example.
    pub max_example_sentences: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            include_phonetic: true,
            include_origin: true,
            include_synonyms: true,
            include_antonyms: true,
            filter_without_examples: false,
            generate_explanations: true,
            generate_example_sentences: true,
            max_example_sentences: 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuerySettings {
    /// Ask the dictionary again for words already recorded as unknown.
    pub query_for_unknown_words: bool,
}

/// Empty strings mean no proxy. `httpsProxy` wins when both are set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProxySettings {
    pub http_proxy: String,
    pub https_proxy: String,
}

impl ProxySettings {
    pub fn effective(&self) -> Option<&str> {
        [self.https_proxy.trim(), self.http_proxy.trim()]
            .into_iter()
            .find(|url| !url.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputSettings {
    pub input_directory: PathBuf,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            input_directory: PathBuf::from("inputs"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DictionarySettings {
    /// Lookup URL; `{word}` is replaced by the word being resolved.
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Sustained request rate; 0 disables throttling.
    pub requests_per_second: u32,
    pub burst: u32,
}

impl Default for DictionarySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
            requests_per_second: 0,
            burst: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheSettings {
    pub definitions_path: PathBuf,
    pub unknown_path: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            definitions_path: PathBuf::from("word_cache.json"),
            unknown_path: PathBuf::from("word_unknown.json"),
        }
    }
}

impl Settings {
    /// Read `path`, or write the defaults there and return them when the file
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let settings = Self::default();
                settings.write(path)?;
                info!("wrote default config to {}", path.display());
                Ok(settings)
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.to_yaml()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
