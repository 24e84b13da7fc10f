use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

/// The only failures a client ever sees. Each renders as a fixed JSON body,
/// internal details are logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: &'static str,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::BadRequest => "bad request",
            ApiError::NotFound => "resource not found",
            ApiError::Unprocessable => "unprocessable",
        }
    }

    /// For handlers where any store failure means "nothing here".
    pub fn not_found(err: StoreError) -> Self {
        log_store_error(&err);
        ApiError::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Default store mapping: a missing row is 404, anything else is 422.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        log_store_error(&err);
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Query(_) => ApiError::Unprocessable,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected json body: {rejection}");
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable,
            _ => ApiError::BadRequest,
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path: {rejection}");
        ApiError::NotFound
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Rejected query string: {rejection}");
        ApiError::BadRequest
    }
}

fn log_store_error(err: &StoreError) {
    match err {
        StoreError::NotFound => tracing::debug!("{err}"),
        StoreError::Query(_) => tracing::error!("Store failure: {err}"),
    }
}
