//! Web-facing error taxonomy.
//!
//! Every handler returns `Result<_, AppError>`; the variants map directly to
//! the responses the client sees.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use thiserror::Error;

use crate::pages;
use crate::util::urlencode;

#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown id or username in a lookup.
    #[error("not found: {0}")]
    NotFound(String),

    /// Unauthenticated access to a login-gated action. Carries the path to
    /// return to after login.
    #[error("login required")]
    LoginRequired { next: String },

    /// Authenticated but not the owner or a superuser.
    #[error("permission denied: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn login_required(next: impl Into<String>) -> Self {
        Self::LoginRequired { next: next.into() }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Html(pages::error_page("Not found", &msg)),
            )
                .into_response(),
            Self::LoginRequired { next } => {
                Redirect::to(&format!("/login?next={}", urlencode(&next))).into_response()
            }
            Self::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                Html(pages::error_page("Permission denied", &msg)),
            )
                .into_response(),
            Self::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(pages::error_page(
                        "Internal server error",
                        "Something went wrong. The error has been logged.",
                    )),
                )
                    .into_response()
            }
        }
    }
}
