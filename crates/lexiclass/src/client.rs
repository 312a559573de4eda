use std::future::Future;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{DictionarySettings, ProxySettings};
use crate::throttle::Throttle;

pub const DEFAULT_ENDPOINT: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/{word}";

const USER_AGENT: &str = concat!("lexiclass/", env!("CARGO_PKG_VERSION"));

/// Why a lookup produced no entries. The resolver treats every variant the
/// same way; the distinction is for logs.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid dictionary endpoint {0:?}")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("dictionary answered {0}")]
    Status(StatusCode),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("dictionary returned no entries")]
    Empty,
}

/// One element of the dictionary's JSON array.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ApiEntry {
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phonetics: Vec<ApiPhonetic>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meanings: Vec<ApiMeaning>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ApiPhonetic {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeaning {
    #[serde(default, deserialize_with = "null_as_default")]
    pub part_of_speech: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub definitions: Vec<ApiDefinition>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ApiDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub antonyms: Vec<String>,
}

/// `null` reads as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Remote dictionary returning the raw entries for a lowercase word.
///
/// Implementations return at least one entry on success.
pub trait DictionaryClient {
    fn lookup(&self, word: &str) -> impl Future<Output = Result<Vec<ApiEntry>, LookupError>>;
}

/// HTTP client for dictionaryapi.dev-compatible services.
#[derive(Debug)]
pub struct HttpDictionary {
    client: reqwest::Client,
    endpoint: String,
    throttle: Option<Throttle>,
}

impl HttpDictionary {
    pub fn new(settings: &DictionarySettings, proxy: &ProxySettings) -> Result<Self, LookupError> {
        if !settings.endpoint.contains("{word}") {
            return Err(LookupError::InvalidEndpoint(settings.endpoint.clone()));
        }
        Url::parse(&settings.endpoint.replace("{word}", "sample"))
            .map_err(|_| LookupError::InvalidEndpoint(settings.endpoint.clone()))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)));
        builder = match proxy.effective() {
            Some(url) => match reqwest::Proxy::all(url) {
                Ok(proxy) => {
                    debug!("routing dictionary lookups through {url}");
                    builder.proxy(proxy)
                }
                Err(err) => {
                    warn!("ignoring invalid proxy url {url:?}: {err}");
                    builder.no_proxy()
                }
            },
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
            endpoint: settings.endpoint.clone(),
            throttle: Throttle::new(settings.requests_per_second, settings.burst),
        })
    }

    /// Request URL for `word`; spaces and non-ASCII letters are
    /// percent-encoded by the URL parser.
    pub fn url_for(&self, word: &str) -> Result<Url, LookupError> {
        Url::parse(&self.endpoint.replace("{word}", word))
            .map_err(|_| LookupError::InvalidEndpoint(self.endpoint.clone()))
    }
}

impl DictionaryClient for HttpDictionary {
    async fn lookup(&self, word: &str) -> Result<Vec<ApiEntry>, LookupError> {
        let url = self.url_for(word)?;
        if let Some(throttle) = &self.throttle {
            throttle.acquire().await;
        }
        debug!("looking up {word}");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }
        let body = response.bytes().await?;
        let entries: Vec<ApiEntry> = serde_json::from_slice(&body)?;
        if entries.is_empty() {
            return Err(LookupError::Empty);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoint: &str) -> DictionarySettings {
        DictionarySettings {
            endpoint: endpoint.to_string(),
            ..DictionarySettings::default()
        }
    }

    #[test]
    fn decodes_a_dictionary_response() {
        let body = r#"[{
            "word": "lead",
            "phonetic": "/liːd/",
            "phonetics": [{"text": "/liːd/", "audio": ""}],
            "origin": "Old English lǣdan",
            "meanings": [{
                "partOfSpeech": "verb",
                "definitions": [{
                    "definition": "To guide or conduct.",
                    "example": "She led the team.",
                    "synonyms": ["guide"],
                    "antonyms": null
                }]
            }],
            "license": {"name": "CC BY-SA 3.0"}
        }]"#;
        let entries: Vec<ApiEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.phonetic.as_deref(), Some("/liːd/"));
        assert_eq!(entry.meanings[0].part_of_speech, "verb");
        let definition = &entry.meanings[0].definitions[0];
        assert_eq!(definition.example.as_deref(), Some("She led the team."));
        assert_eq!(definition.synonyms, vec!["guide"]);
        assert!(definition.antonyms.is_empty());
    }

    #[test]
    fn missing_fields_default() {
        let entries: Vec<ApiEntry> = serde_json::from_str(r#"[{"word": "x"}]"#).unwrap();
        assert_eq!(entries[0], ApiEntry::default());
    }

    #[test]
    fn null_fields_read_as_empty() {
        let body = r#"[{"meanings": [{"partOfSpeech": null, "definitions": [
            {"definition": null, "example": "a null sense", "synonyms": null, "antonyms": null}
        ]}]}]"#;
        let entries: Vec<ApiEntry> = serde_json::from_str(body).unwrap();
        let meaning = &entries[0].meanings[0];
        assert_eq!(meaning.part_of_speech, "");
        assert_eq!(meaning.definitions[0].definition, "");
        assert_eq!(meaning.definitions[0].example.as_deref(), Some("a null sense"));
        assert!(meaning.definitions[0].synonyms.is_empty());
    }

    #[test]
    fn error_object_is_not_an_entry_list() {
        let body = r#"{"title": "No Definitions Found", "message": "Sorry pal"}"#;
        assert!(serde_json::from_str::<Vec<ApiEntry>>(body).is_err());
    }

    #[test]
    fn endpoint_needs_a_word_placeholder() {
        let err = HttpDictionary::new(
            &settings("https://example.com/define"),
            &ProxySettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LookupError::InvalidEndpoint(_)));

        let err = HttpDictionary::new(&settings("not a url/{word}"), &ProxySettings::default())
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidEndpoint(_)));
    }

    #[test]
    fn url_encodes_phrases() {
        let client =
            HttpDictionary::new(&DictionarySettings::default(), &ProxySettings::default()).unwrap();
        let url = client.url_for("ice cream").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/ice%20cream"
        );
        let url = client.url_for("café").unwrap();
        assert!(url.path().ends_with("/caf%C3%A9"));
    }

    #[test]
    fn invalid_proxy_is_ignored() {
        let proxy = ProxySettings {
            http_proxy: String::new(),
            https_proxy: "::not a proxy::".into(),
        };
        assert!(HttpDictionary::new(&DictionarySettings::default(), &proxy).is_ok());
    }

    #[test]
    fn throttle_follows_settings() {
        let throttled = DictionarySettings {
            requests_per_second: 5,
            ..DictionarySettings::default()
        };
        let client = HttpDictionary::new(&throttled, &ProxySettings::default()).unwrap();
        assert!(client.throttle.is_some());
        let client =
            HttpDictionary::new(&DictionarySettings::default(), &ProxySettings::default()).unwrap();
        assert!(client.throttle.is_none());
    }
}
