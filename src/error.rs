use axum::{
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::session::SessionError;
use crate::views;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_)
            | AppError::Session(_)
            | AppError::Password(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Infrastructure details stay in the logs, not in the page
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_) | AppError::BadRequest(_) => self.to_string(),
            _ => "Something went wrong while loading this content. Please try again.".to_string(),
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }
    }

    fn page_title(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "Not found",
            AppError::BadRequest(_) => "Bad request",
            _ => "Error",
        }
    }
}

// Full pages: banner inside the site layout
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let banner = views::error_banner(&self.public_message());
        let html = views::layout(self.page_title(), None, &[], &banner);
        (self.status(), Html(html)).into_response()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error for fragment endpoints: only the banner, swapped into the page
/// container by the fragment loader.
#[derive(Debug)]
pub struct FragmentError(pub AppError);

impl From<AppError> for FragmentError {
    fn from(err: AppError) -> Self {
        FragmentError(err)
    }
}

impl From<QueryRejection> for FragmentError {
    fn from(rejection: QueryRejection) -> Self {
        FragmentError(rejection.into())
    }
}

impl IntoResponse for FragmentError {
    fn into_response(self) -> Response {
        let FragmentError(err) = self;
        err.log();
        (err.status(), Html(views::error_banner(&err.public_message()))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
pub type FragmentResult<T> = Result<T, FragmentError>;
