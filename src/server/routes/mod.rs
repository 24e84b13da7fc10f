mod categories;
mod questions;
mod quizzes;

use axum::Json;

use super::error::ApiError;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

pub type ApiResponse<T> = Result<Json<T>, ApiError>;

/// Row ids in paths are non-negative integers; anything else names no row.
fn row_id(id: u64) -> Result<i64, ApiError> {
    i64::try_from(id).map_err(|_| ApiError::NotFound)
}
