//! HTTP surface: router assembly, shared response helpers, and the server
//! loop.

pub mod auth;
pub mod home;
pub mod plans;
pub mod tasks;

use anyhow::Context;
use axum::Router;
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;

use crate::session::{SessionKey, clear_flash_cookie, flash_cookie};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub session_key: SessionKey,
}

/// Wrap a rendered page, clearing the flash cookie if this render consumed
/// one.
pub(crate) fn page_response(had_flash: bool, html: String) -> Response {
    if had_flash {
        ([(header::SET_COOKIE, clear_flash_cookie())], Html(html)).into_response()
    } else {
        Html(html).into_response()
    }
}

/// Redirect after a successful mutation, with a flash message for the next
/// page render.
pub(crate) fn flash_redirect(message: &str, to: &str) -> Response {
    (
        [(header::SET_COOKIE, flash_cookie(message))],
        Redirect::to(to),
    )
        .into_response()
}

pub fn build_router(pool: PgPool, session_key: SessionKey) -> Router {
    let state = AppState { pool, session_key };

    Router::new()
        .route("/", get(home::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/plans", get(plans::list))
        .route("/plans/new", get(plans::create_form).post(plans::create))
        .route("/plans/{id}", get(plans::detail))
        .route("/plans/{id}/edit", get(plans::edit_form).post(plans::edit))
        .route(
            "/plans/{id}/delete",
            get(plans::delete_form).post(plans::delete),
        )
        .route("/tasks", get(tasks::list))
        .route("/tasks/{id}", get(tasks::detail))
        // The toggle answers GET as well so plain links keep working.
        .route(
            "/tasks/{id}/done",
            get(tasks::toggle_done).post(tasks::toggle_done),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn run_serve(
    pool: PgPool,
    session_key: SessionKey,
    bind: &str,
    port: u16,
) -> anyhow::Result<()> {
    let app = build_router(pool, session_key);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
