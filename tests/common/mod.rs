#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;
use trivia_api::db::{
    self,
    queries::{categories::create_category, questions::create_question},
    NewQuestion,
};
use trivia_api::server::app::{router, AppState};
use trivia_api::settings::DatabaseSettings;

/// A fresh in-memory database. One connection, so every query sees the same
/// database.
pub async fn create_test_pool() -> SqlitePool {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_owned(),
        max_connections: 1,
        create_if_missing: true,
    };
    let pool = db::establish_connection(&settings)
        .await
        .expect("failed to open test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to migrate test database");
    pool
}

pub struct Seeded {
    pub science: i64,
    pub art: i64,
    pub history: i64,
    /// "Title X", Science
    pub title_question: i64,
    /// "other", Art
    pub other_question: i64,
    /// "Who painted the Mona Lisa?", Art
    pub painter_question: i64,
}

pub async fn add_question(pool: &SqlitePool, question: &str, category: i64) -> i64 {
    create_question(
        pool,
        &NewQuestion {
            question: question.to_owned(),
            answer: format!("answer to {question}"),
            category: category.to_string(),
            difficulty: 2,
        },
    )
    .await
    .expect("failed to insert question")
}

pub async fn seed(pool: &SqlitePool) -> Seeded {
    let science = create_category(pool, "Science").await.unwrap();
    let art = create_category(pool, "Art").await.unwrap();
    let history = create_category(pool, "History").await.unwrap();
    Seeded {
        science,
        art,
        history,
        title_question: add_question(pool, "Title X", science).await,
        other_question: add_question(pool, "other", art).await,
        painter_question: add_question(pool, "Who painted the Mona Lisa?", art).await,
    }
}

pub async fn seeded_app() -> (Router, SqlitePool, Seeded) {
    let pool = create_test_pool().await;
    let seeded = seed(&pool).await;
    (router(AppState::new(pool.clone())), pool, seeded)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, raw) = send_raw(
        app,
        method,
        uri,
        body.map(|b| b.to_string()).unwrap_or_default(),
    )
    .await;
    let json = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw).expect("response should be json")
    };
    (status, json)
}

pub async fn send_raw(app: &Router, method: Method, uri: &str, body: String) -> (StatusCode, String) {
    let mut req = Request::builder().method(method).uri(uri);
    if !body.is_empty() {
        req = req.header("content-type", "application/json");
    }
    let resp = app
        .clone()
        .oneshot(req.body(Body::from(body)).expect("request build should succeed"))
        .await
        .expect("router should respond");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, String::from_utf8(bytes.to_vec()).expect("body should be utf-8"))
}

pub fn question_ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .expect("questions should be an array")
        .iter()
        .map(|q| q["id"].as_i64().expect("question id"))
        .collect()
}
