//! Login and logout.
//!
//! There is no password store; accounts are provisioned over the CLI and the
//! login form only asks for a username. The session cookie is still signed,
//! so a cookie cannot be forged without the server secret.

use axum::Form;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use plantrack_db::queries::users;

use crate::error::AppError;
use crate::pages;
use crate::routes::{AppState, page_response};
use crate::session::{
    AuthSession, clear_session_cookie, flash_cookie, session_cookie, take_flash,
};

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    #[serde(default)]
    pub next: Option<String>,
}

pub async fn login_form(
    session: AuthSession,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> Response {
    let flash = take_flash(&headers);
    let html = pages::login_page(
        session.user.as_ref(),
        flash.as_deref(),
        query.next.as_deref(),
        None,
    );
    page_response(flash.is_some(), html)
}

pub async fn login(
    State(state): State<AppState>,
    session: AuthSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    let Some(user) = users::get_user_by_username(&state.pool, username).await? else {
        let html = pages::login_page(
            session.user.as_ref(),
            None,
            form.next.as_deref(),
            Some(&format!("No user named {username:?}.")),
        );
        return Ok(Html(html).into_response());
    };

    let target = form
        .next
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("/");

    tracing::info!(username = %user.username, "login");
    Ok((
        [
            (
                header::SET_COOKIE,
                session_cookie(&state.session_key, user.id),
            ),
            (
                header::SET_COOKIE,
                flash_cookie(&format!("Logged in as {}", user.username)),
            ),
        ],
        Redirect::to(target),
    )
        .into_response())
}

pub async fn logout() -> Response {
    (
        [
            (header::SET_COOKIE, clear_session_cookie()),
            (header::SET_COOKIE, flash_cookie("Logged out")),
        ],
        Redirect::to("/"),
    )
        .into_response()
}
