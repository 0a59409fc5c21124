use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use vibeverse::{
    AppState, FileStorage, MemoryStorage, StorageKey, catalog::Catalog, models::now_millis,
    routes::router,
};

fn app_with(storage: Arc<MemoryStorage>) -> Router {
    router(AppState::new(storage, Catalog::generate(8, 3, now_millis())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    send_request(app, request.body(body).unwrap()).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn import(app: &Router, text: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/state/import")
        .body(Body::from(text.to_string()))
        .unwrap();
    send_request(app, request).await
}

#[tokio::test]
async fn health_reports_healthy() {
    let app = app_with(Arc::new(MemoryStorage::new()));
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["createdPosts"], 0);
}

#[tokio::test]
async fn like_toggles_and_persists_each_time() {
    let storage = Arc::new(MemoryStorage::new());
    let app = app_with(storage.clone());

    let (status, body) = send(&app, Method::POST, "/posts/f-u1-1/like", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": "f-u1-1", "value": true}));

    let (_, body) = send(&app, Method::POST, "/posts/f-u1-1/like", None).await;
    assert_eq!(body["value"], false);
    assert_eq!(storage.write_count(StorageKey::Likes), 2);

    let (_, feed) = send(&app, Method::GET, "/feed", None).await;
    assert_eq!(feed["items"][0]["id"], "f-u1-1");
    assert_eq!(feed["items"][0]["liked"], false);
}

#[tokio::test]
async fn feed_pages_and_reflects_saves() {
    let app = app_with(Arc::new(MemoryStorage::new()));
    send(&app, Method::POST, "/posts/f-u2-1/save", None).await;

    let (_, first) = send(&app, Method::GET, "/feed?page=1", None).await;
    assert_eq!(first["items"].as_array().unwrap().len(), 5);
    assert_eq!(first["hasMore"], true);
    assert_eq!(first["items"][1]["saved"], true);

    let (_, second) = send(&app, Method::GET, "/feed?page=2", None).await;
    assert_eq!(second["items"].as_array().unwrap().len(), 8);
    assert_eq!(second["hasMore"], false);
}

#[tokio::test]
async fn huge_page_number_reveals_every_profile() {
    let app = app_with(Arc::new(MemoryStorage::new()));

    let (status, body) = send(&app, Method::GET, "/feed?page=18446744073709551615", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 8);
    assert_eq!(body["hasMore"], false);

    // The state lock is still usable afterwards
    let (status, _) = send(&app, Method::POST, "/posts/p1/like", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn comments_keep_last_five_and_ignore_blanks() {
    let app = app_with(Arc::new(MemoryStorage::new()));

    for i in 1..=6 {
        let (status, _) = send(
            &app,
            Method::POST,
            "/posts/p1/comments",
            Some(json!({"text": format!("t{}", i)})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(&app, Method::POST, "/posts/p1/comments", Some(json!({"text": "   "}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, Method::GET, "/posts/p1/comments", None).await;
    let texts: Vec<&str> = body["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["t2", "t3", "t4", "t5", "t6"]);
}

#[tokio::test]
async fn oversized_comment_is_rejected() {
    let app = app_with(Arc::new(MemoryStorage::new()));
    let (status, body) = send(
        &app,
        Method::POST,
        "/posts/p1/comments",
        Some(json!({"text": "x".repeat(1001)})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn created_posts_lead_the_feed() {
    let app = app_with(Arc::new(MemoryStorage::new()));

    let (status, meta) = send(
        &app,
        Method::POST,
        "/posts",
        Some(json!({"caption": "hello", "colorPair": ["#aaa", "#bbb"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(meta["caption"], "hello");
    assert_eq!(meta["colorPair"], json!(["#aaa", "#bbb"]));
    assert_eq!(meta["authorId"], "me");

    let (_, uploaded) = send(&app, Method::POST, "/posts", Some(json!({"uploadedImage": true}))).await;
    assert_eq!(uploaded["caption"], "(image)");
    assert_eq!(uploaded["colorPair"], Value::Null);

    let (_, feed) = send(&app, Method::GET, "/feed", None).await;
    assert_eq!(feed["items"][0]["id"], uploaded["id"]);
    assert_eq!(feed["items"][1]["id"], meta["id"]);
}

#[tokio::test]
async fn users_search_profile_and_follow() {
    let app = app_with(Arc::new(MemoryStorage::new()));

    let (_, hits) = send(&app, Method::GET, "/users?q=user", None).await;
    assert_eq!(hits.as_array().unwrap().len(), 6);

    let (_, toggled) = send(&app, Method::POST, "/users/u3/follow", None).await;
    assert_eq!(toggled["value"], true);

    let (status, profile) = send(&app, Method::GET, "/users/u3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["following"], true);
    assert_eq!(profile["postCount"], 3);

    let (status, _) = send(&app, Method::GET, "/users/nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn messages_round_trip() {
    let app = app_with(Arc::new(MemoryStorage::new()));

    let (status, msg) = send(&app, Method::POST, "/messages/u2", Some(json!({"text": " hi "}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(msg["text"], "hi");
    assert_eq!(msg["from"], "you");

    let (status, _) = send(&app, Method::POST, "/messages/u2", Some(json!({"text": ""}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, convo) = send(&app, Method::GET, "/messages/u2", None).await;
    assert_eq!(convo["messages"].as_array().unwrap().len(), 1);

    let (_, list) = send(&app, Method::GET, "/messages", None).await;
    assert_eq!(list, json!([{"peerId": "u2", "messageCount": 1}]));
}

#[tokio::test]
async fn export_is_an_attachment_and_reimports_as_no_op() {
    let storage = Arc::new(MemoryStorage::new());
    let app = app_with(storage.clone());
    send(&app, Method::POST, "/posts/p1/like", None).await;
    send(&app, Method::POST, "/posts", Some(json!({"caption": "mine"}))).await;

    let request = Request::builder().uri("/state/export").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("vibeverse_state_small.json")
    );
    let exported = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let exported = String::from_utf8(exported.to_vec()).unwrap();

    let (status, body) = import(&app, &exported).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], json!([]));
    assert_eq!(storage.write_count(StorageKey::CreatedMeta), 1);
}

#[tokio::test]
async fn import_merges_and_rejects_malformed() {
    let storage = Arc::new(MemoryStorage::new());
    storage.insert_raw(StorageKey::Follows, r#"{"u3":false,"u5":true}"#);
    let app = app_with(storage.clone());

    let (status, body) = import(&app, r#"{"followsMap": {"u3": true}}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], json!(["vv_follows"]));
    assert_eq!(
        storage.raw(StorageKey::Follows).as_deref(),
        Some(r#"{"u3":true,"u5":true}"#)
    );

    let before: Vec<Option<String>> = StorageKey::ALL.iter().map(|k| storage.raw(*k)).collect();
    let (status, body) = import(&app, "definitely not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid file"));
    let after: Vec<Option<String>> = StorageKey::ALL.iter().map(|k| storage.raw(*k)).collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn imported_extreme_timestamps_still_render() {
    let app = app_with(Arc::new(MemoryStorage::new()));
    let doc = json!({"createdMeta": [
        {"id": "cmeta-old", "caption": "ancient", "colorPair": null, "createdAt": i64::MIN, "authorId": "me"},
        {"id": "cmeta-new", "caption": "future", "colorPair": null, "createdAt": i64::MAX, "authorId": "me"}
    ]});

    let (status, _) = import(&app, &doc.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, feed) = send(&app, Method::GET, "/feed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(feed["items"][0]["id"], "cmeta-new");
    assert_eq!(feed["items"][0]["age"], "0s");

    let (status, _) = send(&app, Method::GET, "/messages", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn imported_threads_are_capped() {
    let app = app_with(Arc::new(MemoryStorage::new()));
    let thread: Vec<Value> = (1..=7)
        .map(|i| json!({"id": format!("c{}", i), "user": "u2", "text": format!("t{}", i), "at": i}))
        .collect();

    let (status, body) = import(&app, &json!({"commentsSmall": {"p1": thread}}).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], json!(["vv_comments_small"]));

    let (_, body) = send(&app, Method::GET, "/posts/p1/comments", None).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 5);
    assert_eq!(comments[0]["text"], "t3");
}

#[tokio::test]
async fn file_storage_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
        let app = router(AppState::new(storage, Catalog::generate(3, 1, now_millis())));
        send(&app, Method::POST, "/users/u1/follow", None).await;
        send(&app, Method::POST, "/messages/u1", Some(json!({"text": "saved"}))).await;
    }

    let storage = Arc::new(FileStorage::open(dir.path()).unwrap());
    let app = router(AppState::new(storage, Catalog::generate(3, 1, now_millis())));

    let (_, profile) = send(&app, Method::GET, "/users/u1", None).await;
    assert_eq!(profile["following"], true);
    let (_, convo) = send(&app, Method::GET, "/messages/u1", None).await;
    assert_eq!(convo["messages"][0]["text"], "saved");
}
