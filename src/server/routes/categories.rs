use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Category, Question,
    },
    server::{app::AppState, error::ApiError, extractors::ApiPath},
};

use super::{row_id, ApiResponse};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: i64,
}

/// id -> type, iterated in id order.
pub(super) fn categories_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesResponse> {
    let categories = get_all_categories(&pool).await?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories: categories_map(categories),
    }))
}

async fn questions_for_category(
    State(pool): State<SqlitePool>,
    ApiPath(category_id): ApiPath<u64>,
) -> ApiResponse<CategoryQuestionsResponse> {
    let category_id = row_id(category_id)?;
    let questions = get_questions_for_category(&pool, &category_id.to_string())
        .await
        .map_err(ApiError::not_found)?;
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: category_id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
