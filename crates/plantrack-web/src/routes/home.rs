//! Landing page.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;

use plantrack_db::queries::{plans, tasks, users};

use crate::error::AppError;
use crate::pages;
use crate::routes::{AppState, page_response};
use crate::session::{AuthSession, take_flash};

pub async fn index(
    State(state): State<AppState>,
    session: AuthSession,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let users_count = users::count_users(&state.pool).await?;
    let plans_count = plans::count_plans(&state.pool).await?;
    let tasks_count = tasks::count_tasks(&state.pool).await?;

    let flash = take_flash(&headers);
    let html = pages::index_page(
        session.user.as_ref(),
        flash.as_deref(),
        users_count,
        plans_count,
        tasks_count,
    );
    Ok(page_response(flash.is_some(), html))
}
