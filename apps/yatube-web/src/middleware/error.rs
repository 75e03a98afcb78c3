//! Error handling - maps failures to HTML error pages and redirects.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};

use yatube_core::error::{DomainError, RepoError};

use crate::render;

pub(crate) const HTML: &str = "text/html; charset=utf-8";

/// Application-level error type rendered as an HTML page.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Forbidden,
    /// Not logged in; carries the login URL to redirect to.
    LoginRequired(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::LoginRequired(_) => write!(f, "Login required"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::LoginRequired(_) => StatusCode::FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let page = match self {
            AppError::LoginRequired(location) => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, location.as_str()))
                    .finish();
            }
            AppError::NotFound(what) => {
                tracing::debug!(what = %what, "Not found");
                render::errors::not_found()
            }
            AppError::BadRequest(detail) => {
                tracing::debug!(detail = %detail, "Bad request");
                render::errors::bad_request()
            }
            AppError::Forbidden => render::errors::forbidden(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                render::errors::server_error()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(HTML)
            .body(page)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {}", entity_type, key))
            }
            DomainError::Validation { field, messages } => {
                AppError::BadRequest(format!("{}: {}", field, messages.join(" ")))
            }
            DomainError::Duplicate(msg) => AppError::BadRequest(msg),
            DomainError::Unauthorized | DomainError::Forbidden(_) => AppError::Forbidden,
            DomainError::Internal(msg) => AppError::Internal(msg),
            DomainError::Repo(err) => err.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::BadRequest(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
