mod common;

use axum::http::{Method, StatusCode};
use common::{seeded_app, send, send_raw};
use serde_json::json;

#[tokio::test]
async fn never_repeats_previous_questions() {
    let (app, _pool, seeded) = seeded_app().await;
    let previous = [seeded.title_question, seeded.other_question];

    for _ in 0..20 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({
                "previous_questions": previous,
                "quiz_category": {"type": "click", "id": 0}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["question"]["id"], json!(seeded.painter_question));
    }
}

#[tokio::test]
async fn stays_within_category() {
    let (app, _pool, seeded) = seeded_app().await;

    for _ in 0..20 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({
                "previous_questions": [],
                "quiz_category": {"type": "Art", "id": seeded.art.to_string()}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["question"]["id"].as_i64().unwrap();
        assert!(
            [seeded.other_question, seeded.painter_question].contains(&id),
            "question {id} is not an Art question"
        );
        assert_eq!(body["question"]["category"], json!(seeded.art.to_string()));
    }
}

#[tokio::test]
async fn walks_a_whole_quiz_then_returns_null() {
    let (app, _pool, seeded) = seeded_app().await;
    let mut previous: Vec<i64> = Vec::new();

    loop {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({
                "previous_questions": previous,
                "quiz_category": {"id": 0}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        match body["question"]["id"].as_i64() {
            Some(id) => {
                assert!(!previous.contains(&id));
                previous.push(id);
            }
            None => {
                assert_eq!(body, json!({"success": true, "question": null}));
                break;
            }
        }
    }

    previous.sort_unstable();
    assert_eq!(
        previous,
        vec![
            seeded.title_question,
            seeded.other_question,
            seeded.painter_question
        ]
    );
}

#[tokio::test]
async fn unknown_category_has_no_question() {
    let (app, _pool, seeded) = seeded_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({
            "previous_questions": [],
            "quiz_category": {"id": seeded.history}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], json!(null));
}

#[tokio::test]
async fn requires_both_fields() {
    let (app, _pool, _seeded) = seeded_app().await;
    let cases = [
        json!({"quiz_category": {"id": 0}}),
        json!({"previous_questions": []}),
        json!({"previous_questions": null, "quiz_category": {"id": 0}}),
        json!({"previous_questions": [], "quiz_category": {}}),
        json!({"previous_questions": "1,2", "quiz_category": {"id": 0}}),
    ];

    for body in cases {
        let (status, response) = send(&app, Method::POST, "/quizzes", Some(body.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert_eq!(response["message"], json!("unprocessable"));
    }
}

#[tokio::test]
async fn served_questions_are_counted() {
    let (app, _pool, _seeded) = seeded_app().await;

    send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": [], "quiz_category": {"id": 0}})),
    )
    .await;

    let (status, raw) = send_raw(&app, Method::GET, "/metrics", String::new()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(raw.contains("quiz_questions_served_total"), "{raw}");
}

#[tokio::test]
async fn unreadable_body_is_unprocessable() {
    let (app, _pool, _seeded) = seeded_app().await;

    for raw in ["{not json", ""] {
        let (status, body) = send_raw(&app, Method::POST, "/quizzes", raw.to_owned()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body {raw:?}");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&body).unwrap(),
            json!({"success": false, "error": 422, "message": "unprocessable"})
        );
    }
}
