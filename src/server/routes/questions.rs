use std::collections::BTreeMap;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::LooseText,
        error::ApiError,
        extractors::{ApiJson, ApiPath, ApiQuery},
    },
};

use super::{categories::categories_map, row_id, ApiResponse};

const QUESTIONS_PER_PAGE: u32 = 10;

#[derive(Deserialize)]
struct ListQuery {
    page: Option<u32>,
}

/// Body of `POST /questions`: either a search or a new question.
#[derive(Debug, Default, Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
    question: Option<String>,
    answer: Option<String>,
    category: Option<LooseText>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl QuestionsBody {
    fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|term| !term.is_empty())
    }

    /// Every field has to be present and non-empty/non-zero.
    fn validate(self) -> Result<NewQuestion, ApiError> {
        let question = self.question.filter(|q| !q.is_empty());
        let answer = self.answer.filter(|a| !a.is_empty());
        let category = self.category.filter(LooseText::is_truthy);
        let difficulty = self.difficulty.filter(|d| *d != 0);

        match (question, answer, category, difficulty) {
            (Some(question), Some(answer), Some(category), Some(difficulty)) => Ok(NewQuestion {
                question,
                answer,
                category: category.into_text(),
                difficulty,
            }),
            _ => Err(ApiError::Unprocessable),
        }
    }
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(ListQuery { page }): ApiQuery<ListQuery>,
) -> ApiResponse<QuestionsPage> {
    let (questions, total_questions) = match page {
        None => {
            let questions = questions::get_all_questions(&pool).await?;
            let total = questions.len() as i64;
            (questions, total)
        }
        Some(0) => return Err(ApiError::NotFound),
        Some(page) => {
            let questions =
                questions::get_questions_page(&pool, page - 1, QUESTIONS_PER_PAGE).await?;
            if questions.is_empty() {
                return Err(ApiError::NotFound);
            }
            (questions, questions::count_questions(&pool).await?)
        }
    };
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: categories_map(categories),
        current_category: None,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    ApiPath(question_id): ApiPath<u64>,
) -> ApiResponse<Deleted> {
    let question_id = row_id(question_id)?;
    questions::delete_question(&pool, question_id).await?;
    tracing::info!(question_id, "Deleted question");
    Ok(Json(Deleted {
        success: true,
        deleted: question_id,
    }))
}

async fn post_question(
    State(pool): State<SqlitePool>,
    ApiJson(body): ApiJson<QuestionsBody>,
) -> Result<Response, ApiError> {
    if body.search_term().is_some() {
        Ok(search_questions(&pool, &body).await?.into_response())
    } else {
        Ok(create_question(&pool, body).await?.into_response())
    }
}

async fn search_questions(pool: &SqlitePool, body: &QuestionsBody) -> ApiResponse<SearchResults> {
    let term = body.search_term().ok_or(ApiError::NotFound)?;
    let questions = questions::search_questions(pool, term).await?;
    Ok(Json(SearchResults {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: None,
    }))
}

async fn create_question(pool: &SqlitePool, body: QuestionsBody) -> ApiResponse<Created> {
    let new_question = body.validate()?;
    let id = questions::create_question(pool, &new_question)
        .await
        .map_err(|err| {
            tracing::error!("Failed to create question: {err}");
            ApiError::Unprocessable
        })?;
    tracing::info!(question_id = id, "Created question");
    Ok(Json(Created {
        success: true,
        created: id,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(post_question))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
