mod common;

use lexiclass::{DictionaryClient, LookupError, Resolver};
use lexiclass_cache::{DefinitionStore, JsonDefinitionStore, JsonUnknownStore, UnknownStore};
use lexiclass_types::Resolution;

use common::{http_client, spawn_dictionary};

#[tokio::test]
async fn lookup_sends_json_accept_header() {
    let (fake, endpoint) = spawn_dictionary().await;
    let client = http_client(&endpoint);
    let entries = client.lookup("lead").await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].phonetic.as_deref(), Some("/liːd/"));
    assert_eq!(fake.accept_headers(), vec!["application/json"]);
}

#[tokio::test]
async fn lookup_failures_are_classified() {
    let (_fake, endpoint) = spawn_dictionary().await;
    let client = http_client(&endpoint);
    assert!(matches!(
        client.lookup("xyzzynotaword").await,
        Err(LookupError::Status(status)) if status.as_u16() == 404
    ));
    assert!(matches!(
        client.lookup("lazy").await,
        Err(LookupError::Decode(_))
    ));
    assert!(matches!(client.lookup("over").await, Err(LookupError::Empty)));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = http_client(&format!("http://{addr}/{{word}}"));
    assert!(matches!(
        client.lookup("lead").await,
        Err(LookupError::Transport(_))
    ));
}

#[tokio::test]
async fn not_found_word_is_cached_as_unknown() {
    let (fake, endpoint) = spawn_dictionary().await;
    let dir = tempfile::tempdir().unwrap();
    let unknown_path = dir.path().join("word_unknown.json");
    let mut resolver = Resolver::new(
        http_client(&endpoint),
        JsonDefinitionStore::open(dir.path().join("word_cache.json")).unwrap(),
        JsonUnknownStore::open(&unknown_path).unwrap(),
    );

    assert_eq!(
        resolver.resolve("xyzzynotaword").await.unwrap(),
        Resolution::Unknown
    );
    assert_eq!(
        resolver.resolve("xyzzynotaword").await.unwrap(),
        Resolution::Unknown
    );
    assert_eq!(fake.hits("xyzzynotaword"), 1);

    let reopened = JsonUnknownStore::open(&unknown_path).unwrap();
    assert!(reopened.contains("xyzzynotaword"));
}

#[tokio::test]
async fn known_word_is_fetched_once_and_persisted() {
    let (fake, endpoint) = spawn_dictionary().await;
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("word_cache.json");
    let mut resolver = Resolver::new(
        http_client(&endpoint),
        JsonDefinitionStore::open(&cache_path).unwrap(),
        JsonUnknownStore::open(dir.path().join("word_unknown.json")).unwrap(),
    );

    let first = resolver.resolve("lead").await.unwrap();
    let second = resolver.resolve("lead").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(fake.hits("lead"), 1);

    let record = first.record().unwrap();
    assert_eq!(record.senses.len(), 2);
    assert_eq!(record.origin, "Old English lǣdan");
    assert_eq!(record.synonyms, vec!["guide", "conduct", "plumbum"]);

    let reopened = JsonDefinitionStore::open(&cache_path).unwrap();
    assert_eq!(reopened.get("lead"), Some(record));
}

#[tokio::test]
async fn entry_without_meanings_is_unknown() {
    let (_fake, endpoint) = spawn_dictionary().await;
    let dir = tempfile::tempdir().unwrap();
    let mut resolver = Resolver::new(
        http_client(&endpoint),
        JsonDefinitionStore::open(dir.path().join("word_cache.json")).unwrap(),
        JsonUnknownStore::open(dir.path().join("word_unknown.json")).unwrap(),
    );
    for word in ["hollow", "over", "lazy"] {
        assert_eq!(resolver.resolve(word).await.unwrap(), Resolution::Unknown);
    }
    assert_eq!(resolver.unknown().len(), 3);
    assert!(resolver.definitions().is_empty());
}

#[tokio::test]
async fn phrases_are_sent_url_encoded() {
    let (fake, endpoint) = spawn_dictionary().await;
    let client = http_client(&endpoint);
    assert!(client.lookup("ice cream").await.is_err());
    assert_eq!(fake.hits("ice cream"), 1);
}
