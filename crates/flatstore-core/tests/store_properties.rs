//! End-to-end behaviour of the store against real files

mod common;

use std::sync::atomic::Ordering;

use common::{CountingReader, doc, missing_store, store_with, temp_files};
use flatstore::{
    Filter, JsonStore, ObjectStream, StoreError,
    reader::first_match,
};
use serde_json::json;
use tokio::io::BufReader;

#[tokio::test]
async fn empty_or_absent_store_loads_nothing() {
    let store = JsonStore::default();

    let (_dir, path) = store_with("[]").await;
    assert!(store.load_all(&path).await.unwrap().is_empty());

    let (_dir, path) = store_with("").await;
    assert!(store.load_all(&path).await.unwrap().is_empty());

    let (_dir, path) = missing_store();
    let err = store.load_all(&path).await.unwrap_err();
    assert!(err.is_recoverable());
    assert!(err.is_missing_store());
}

#[tokio::test]
async fn initialize_then_load_round_trips() {
    let (_dir, path) = missing_store();
    let store = JsonStore::default();
    let course = doc(json!({
        "id": "c1",
        "title": "Rust {braces}",
        "duration": 90,
        "authors": ["a1", "a2"],
    }));

    store.initialize(&path, &course).await.unwrap();
    assert_eq!(store.load_all(&path).await.unwrap(), vec![course]);
}

#[tokio::test]
async fn append_preserves_insertion_order() {
    let (_dir, path) = missing_store();
    let store = JsonStore::default();
    let first = doc(json!({"id": "1"}));
    let second = doc(json!({"id": "2"}));

    store.initialize(&path, &first).await.unwrap();
    store.append(&path, &second).await.unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: Vec<flatstore::Document> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, vec![first.clone(), second.clone()]);
    assert_eq!(store.load_all(&path).await.unwrap(), vec![first, second]);
}

#[tokio::test]
async fn first_match_does_not_read_past_match() {
    let elements: Vec<String> = (0..50)
        .map(|i| format!(r#"{{"id":"{i}","payload":"{}"}}"#, "x".repeat(40)))
        .collect();
    let content = format!("[{}]", elements.join(","));
    let (source, consumed) = CountingReader::new(content.as_bytes());
    let mut stream = ObjectStream::new(BufReader::with_capacity(1, source));

    let found = first_match(&mut stream, &doc(json!({"id": "7"})))
        .await
        .unwrap()
        .expect("element 7 is present");

    assert_eq!(found.index, 7);
    assert_eq!(consumed.load(Ordering::SeqCst), found.span.end);
    assert!(found.span.end < content.len() as u64);
}

#[tokio::test]
async fn match_modes_on_title() {
    let (_dir, path) = store_with(r#"[{"id":"1","title":"Foobar"}]"#).await;
    let store = JsonStore::default();

    let contains = store
        .find_all(&path, &Filter::new().contains("title", "Foo"))
        .await
        .unwrap();
    let exact_prefix = store
        .find_all(&path, &Filter::new().exact("title", "Foo"))
        .await
        .unwrap();
    let exact_full = store
        .find_all(&path, &Filter::from_query([("title", "Foobar,true")]))
        .await
        .unwrap();

    assert_eq!(contains.len(), 1);
    assert!(exact_prefix.is_empty());
    assert_eq!(exact_full.len(), 1);
}

#[tokio::test]
async fn replace_of_missing_id_leaves_bytes_unchanged() {
    let original = "[\n  {\"id\": \"1\", \"title\": \"A\"},\n  {\"id\": \"2\"}\n]\n";
    let (_dir, path) = store_with(original).await;
    let store = JsonStore::default();

    let err = store
        .replace(&path, &doc(json!({"id": "missing-id"})), "missing-id")
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::TargetNotFound { ref id, .. } if id == "missing-id"));
    assert!(err.is_recoverable());
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), original);
}

#[tokio::test]
async fn removing_middle_element_keeps_array_valid() {
    let (_dir, path) = store_with(
        "[ {\"id\":\"1\"} , {\"id\":\"2\"} , {\"id\":\"3\"} ]",
    )
    .await;
    let store = JsonStore::default();

    store.remove(&path, "2").await.unwrap();

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    let parsed: Vec<flatstore::Document> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, vec![doc(json!({"id": "1"})), doc(json!({"id": "3"}))]);
}

#[tokio::test]
async fn removing_every_element_in_any_order() {
    let (_dir, path) = store_with(r#"[{"id":"a"},{"id":"b"},{"id":"c"},{"id":"d"}]"#).await;
    let store = JsonStore::default();

    for id in ["c", "a", "d", "b"] {
        store.remove(&path, id).await.unwrap();
        let remaining = store.load_all(&path).await.unwrap();
        assert!(remaining.iter().all(|d| d["id"] != json!(id)));
    }
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "[]");
}

#[tokio::test]
async fn corrupt_store_fails_every_read() {
    let store = JsonStore::default();
    let filter = Filter::new().exact("id", "1");

    for content in [
        r#"[{"id":"1"},{"id":}]"#,
        r#"[{"id":"0"},{"id":"1"]"#,
        r#"[{"id":"2"} {"id":"1"}]"#,
        r#"{"id":"1"}"#,
        r#"[{"id":"2"},"#,
    ] {
        let (_dir, path) = store_with(content).await;

        let load = store.load_all(&path).await.unwrap_err();
        assert!(matches!(load, StoreError::Corrupt { .. }), "load_all on {content}");

        let many = store.find_all(&path, &filter).await.unwrap_err();
        assert!(matches!(many, StoreError::Corrupt { .. }), "find_all on {content}");

        let miss = store.find_one(&path, &doc(json!({"id": "9"}))).await.unwrap_err();
        assert!(matches!(miss, StoreError::Corrupt { .. }), "find_one on {content}");
    }
}

#[tokio::test]
async fn braces_inside_strings_survive_mutations() {
    let (_dir, path) = missing_store();
    let store = JsonStore::default();
    let tricky = doc(json!({"id": "1", "title": "}{ \"quoted\" ]["}));
    let plain = doc(json!({"id": "2", "title": "plain"}));

    store.insert(&path, &tricky).await.unwrap();
    store.insert(&path, &plain).await.unwrap();

    let found = store.find_one(&path, &doc(json!({"id": "2"}))).await.unwrap();
    assert_eq!(found, Some(plain.clone()));

    store.remove(&path, "1").await.unwrap();
    assert_eq!(store.load_all(&path).await.unwrap(), vec![plain]);
}

#[tokio::test]
async fn no_staging_files_remain() {
    let (dir, path) = missing_store();
    let store = JsonStore::default();

    store.insert(&path, &doc(json!({"id": "1"}))).await.unwrap();
    store.insert(&path, &doc(json!({"id": "2"}))).await.unwrap();
    store
        .replace(&path, &doc(json!({"id": "2", "v": 1})), "2")
        .await
        .unwrap();
    let _ = store.replace(&path, &doc(json!({"id": "x"})), "x").await;
    store.remove(&path, "1").await.unwrap();
    let _ = store.remove(&path, "1").await;

    assert!(temp_files(dir.path()).is_empty());
}

#[tokio::test]
async fn concurrent_inserts_lose_nothing() {
    let (_dir, path) = missing_store();
    let store = JsonStore::default();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let store = store.clone();
            let path = path.clone();
            tokio::spawn(async move {
                store
                    .insert(&path, &doc(json!({"id": i.to_string()})))
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut ids: Vec<u32> = store
        .load_all(&path)
        .await
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap().parse().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..32).collect::<Vec<_>>());
}

#[tokio::test]
async fn concurrent_replace_and_append_keep_both() {
    let (_dir, path) = store_with(r#"[{"id":"1","v":0}]"#).await;
    let store = JsonStore::default();

    let replacing = {
        let store = store.clone();
        let path = path.clone();
        tokio::spawn(async move {
            store
                .replace(&path, &doc(json!({"id": "1", "v": 1})), "1")
                .await
        })
    };
    let appending = {
        let store = store.clone();
        let path = path.clone();
        tokio::spawn(async move { store.append(&path, &doc(json!({"id": "2"}))).await })
    };

    replacing.await.unwrap().unwrap();
    appending.await.unwrap().unwrap();

    let all = store.load_all(&path).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&doc(json!({"id": "1", "v": 1}))));
    assert!(all.contains(&doc(json!({"id": "2"}))));
}
