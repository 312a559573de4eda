#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use lexiclass::HttpDictionary;
use lexiclass::config::{DictionarySettings, ProxySettings};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Dictionary service on a loopback port that knows a handful of words.
#[derive(Clone, Default)]
pub struct FakeDictionary {
    hits: Arc<Mutex<HashMap<String, usize>>>,
    accept_headers: Arc<Mutex<Vec<String>>>,
}

impl FakeDictionary {
    pub fn hits(&self, word: &str) -> usize {
        self.hits.lock().unwrap().get(word).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }

    pub fn hit_counts(&self) -> HashMap<String, usize> {
        self.hits.lock().unwrap().clone()
    }

    pub fn accept_headers(&self) -> Vec<String> {
        self.accept_headers.lock().unwrap().clone()
    }
}

pub fn entry(word: &str, part_of_speech: &str, definition: &str, example: Option<&str>) -> Value {
    let mut def = json!({
        "definition": definition,
        "synonyms": [],
        "antonyms": []
    });
    if let Some(example) = example {
        def["example"] = json!(example);
    }
    json!([{
        "word": word,
        "phonetics": [{"audio": ""}, {"text": format!("/{word}/")}],
        "meanings": [{"partOfSpeech": part_of_speech, "definitions": [def]}]
    }])
}

fn lookup_body(word: &str) -> Option<Response> {
    let body = match word {
        "the" => entry("the", "article", "Definite article.", None),
        "quick" => entry("quick", "adjective", "Moving fast.", Some("a quick look")),
        "brown" => entry("brown", "adjective", "A dark colour.", None),
        "fox" => entry("fox", "noun", "A small wild canine.", Some("the fox ran off")),
        "dog" => entry("dog", "noun", "A domesticated canine.", None),
        "jumps" => entry("jumps", "verb", "Leaps.", Some("he jumps high")),
        "lead" => json!([{
            "word": "lead",
            "phonetic": "/liːd/",
            "origin": "Old English lǣdan",
            "meanings": [
                {"partOfSpeech": "verb", "definitions": [
                    {"definition": "To guide or conduct.", "example": "she led the team",
                     "synonyms": ["guide", "conduct"], "antonyms": ["follow"]}
                ]},
                {"partOfSpeech": "noun", "definitions": [
                    {"definition": "A heavy metal.", "synonyms": ["plumbum"], "antonyms": []}
                ]}
            ]
        }]),
        "lazy" => return Some((StatusCode::OK, "<html>maintenance</html>").into_response()),
        "over" => json!([]),
        "hollow" => json!([{"word": "hollow", "meanings": []}]),
        _ => return None,
    };
    Some(Json(body).into_response())
}

async fn lookup(
    State(fake): State<FakeDictionary>,
    Path(word): Path<String>,
    headers: HeaderMap,
) -> Response {
    *fake.hits.lock().unwrap().entry(word.clone()).or_default() += 1;
    if let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) {
        fake.accept_headers.lock().unwrap().push(accept.to_string());
    }
    match lookup_body(&word) {
        Some(response) => response,
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"title": "No Definitions Found"})),
        )
            .into_response(),
    }
}

/// Start the fake service and return it with an endpoint template pointing
/// at it.
pub async fn spawn_dictionary() -> (FakeDictionary, String) {
    let fake = FakeDictionary::default();
    let app = Router::new()
        .route("/api/v2/entries/en/{word}", get(lookup))
        .with_state(fake.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (fake, format!("http://{addr}/api/v2/entries/en/{{word}}"))
}

pub fn http_client(endpoint: &str) -> HttpDictionary {
    let settings = DictionarySettings {
        endpoint: endpoint.to_string(),
        timeout_secs: 5,
        ..DictionarySettings::default()
    };
    HttpDictionary::new(&settings, &ProxySettings::default()).unwrap()
}
