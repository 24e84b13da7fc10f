use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_quiz_candidates, Question},
    server::{app::AppState, error::ApiError},
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

/// Category id meaning "any category".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategory>,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> ApiResponse<QuizQuestion> {
    // every body rejection renders as 422 on this route
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!("Rejected quiz body: {rejection}");
        ApiError::Unprocessable
    })?;
    let (Some(previous_questions), Some(quiz_category)) =
        (body.previous_questions, body.quiz_category)
    else {
        return Err(ApiError::Unprocessable);
    };

    let category = (quiz_category.id != ALL_CATEGORIES).then(|| quiz_category.id.to_string());
    let candidates = get_quiz_candidates(&pool, category.as_deref(), &previous_questions)
        .await
        .map_err(|err| {
            tracing::error!("Failed to load quiz candidates: {err}");
            ApiError::Unprocessable
        })?;
    let question = candidates.choose(&mut rand::thread_rng()).cloned();

    tracing::debug!(
        candidates = candidates.len(),
        seen = previous_questions.len(),
        "Picked quiz question"
    );
    if question.is_some() {
        let label = category.as_deref().unwrap_or("all");
        QUIZ_QUESTIONS_SERVED.with_label_values(&[label]).inc();
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}
