//! Admin HTTP transport integration tests.
//!
//! Starts an axum server over an in-memory store and exercises it with reqwest.

use std::sync::Arc;
use std::time::Duration;

use filter_cms::catalog::{append_option, OnboardingSlide, PromptCategory, PromptOption};
use filter_cms::http::{self, AdminState};
use filter_cms::{append, CmsConfig, DocumentStore, InMemoryDocumentStore};
use serde_json::{json, Value};

fn seeded_store() -> InMemoryDocumentStore {
    let store = InMemoryDocumentStore::new();
    for (id, title) in [("welcome", "Welcome"), ("filters", "Filters"), ("share", "Share")] {
        append(&store, OnboardingSlide::new(id, title), None).unwrap();
    }
    append(&store, PromptCategory::new("lighting", "Lighting"), None).unwrap();
    for (id, label) in [("soft", "Soft"), ("neon", "Neon")] {
        append_option(&store, "lighting", PromptOption::new(id, label, id), None).unwrap();
    }
    store
}

async fn start_server() -> (String, InMemoryDocumentStore) {
    start_server_with(CmsConfig::default()).await
}

/// Bind to port 0 and return the base URL plus a handle on the store.
async fn start_server_with(config: CmsConfig) -> (String, InMemoryDocumentStore) {
    let store = seeded_store();
    let state = Arc::new(AdminState::new(store.clone(), config));
    let app = http::router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), store)
}

fn slide_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|slide| slide["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_check() {
    let (base, _) = start_server().await;

    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn slides_are_listed_in_order() {
    let (base, _) = start_server().await;

    let body: Value = reqwest::get(format!("{base}/onboarding"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(slide_ids(&body), vec!["welcome", "filters", "share"]);
}

#[tokio::test]
async fn created_slide_goes_last() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/onboarding"))
        .json(&json!({ "title": "Premium", "description": "Unlock everything" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["order"], 3);
    assert_eq!(body["id"].as_str().unwrap().len(), 26);
}

#[tokio::test]
async fn reorder_endpoint_commits_the_batch() {
    let (base, store) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/onboarding/reorder"))
        .json(&json!({ "active_id": "share", "over_id": "welcome" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "committed");
    assert_eq!(body["changes"].as_array().unwrap().len(), 3);

    let share = store
        .get_document::<OnboardingSlide>("share")
        .unwrap()
        .unwrap();
    assert_eq!(share.data.order, 0);
}

#[tokio::test]
async fn cancelled_drag_is_skipped() {
    let (base, store) = start_server().await;
    let before = store.sequence().unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/onboarding/reorder"))
        .json(&json!({ "active_id": "share" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "status": "skipped", "reason": "cancelled" }));
    assert_eq!(store.sequence().unwrap(), before);
}

#[tokio::test]
async fn nested_options_reorder() {
    let (base, store) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/prompt-categories/lighting/options/reorder"))
        .json(&json!({ "active_id": "neon", "over_id": "soft" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let category = store
        .get_document::<PromptCategory>("lighting")
        .unwrap()
        .unwrap()
        .data;
    assert_eq!(category.option("neon").map(|o| o.order), Some(0));
    assert_eq!(category.option("soft").map(|o| o.order), Some(1));
}

#[tokio::test]
async fn unknown_parent_is_not_found() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/prompt-categories/ghost/options/reorder"))
        .json(&json!({ "active_id": "a", "over_id": "b" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_slide_then_missing() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .delete(format!("{base}/onboarding/filters"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client
        .delete(format!("{base}/onboarding/filters"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn metrics_on_empty_user_base() {
    let (base, _) = start_server().await;

    let body: Value = reqwest::get(format!("{base}/metrics"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total_users"], 0);
    assert_eq!(body["active_subscribers"], 0);
}

#[tokio::test]
async fn reorder_answers_without_waiting_for_the_echo() {
    let config = CmsConfig {
        poll_timeout_ms: 30_000,
        ..CmsConfig::default()
    };
    let (base, _) = start_server_with(config).await;
    let client = reqwest::Client::new();

    let request = client
        .post(format!("{base}/onboarding/reorder"))
        .json(&json!({ "active_id": "filters", "over_id": "welcome" }))
        .send();
    let resp = tokio::time::timeout(Duration::from_secs(5), request)
        .await
        .expect("reorder response within 5s")
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "committed");
}
