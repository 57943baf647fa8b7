//! Task views: the filterable list, detail, and the done toggle.
//!
//! Unlike the plan list, an unknown `owner` or `plan` filter value here is a
//! 404. The task filters name a specific object to scope by; asking for tasks
//! of a nonexistent object is a dead link, not an empty result.

use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;
use uuid::Uuid;

use plantrack_db::queries::{plans, tasks, users};

use crate::error::AppError;
use crate::pages;
use crate::routes::{AppState, flash_redirect, page_response};
use crate::session::{AuthSession, take_flash};

#[derive(Deserialize)]
pub struct TaskListQuery {
    pub owner: Option<String>,
    pub plan: Option<String>,
    pub search_name: Option<String>,
}

#[derive(Deserialize)]
pub struct ToggleQuery {
    pub next: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    session: AuthSession,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<TaskListQuery>,
) -> Result<Response, AppError> {
    let owner_name = query.owner.as_deref().filter(|s| !s.is_empty());
    let plan_param = query.plan.as_deref().filter(|s| !s.is_empty());
    let search = query.search_name.as_deref().filter(|s| !s.is_empty());

    let mut filter = tasks::TaskFilter::default();

    let owner = match owner_name {
        Some(username) => {
            let user = users::get_user_by_username(&state.pool, username)
                .await?
                .ok_or_else(|| AppError::not_found(format!("no user named {username:?}")))?;
            filter.owner_id = Some(user.id);
            Some(user)
        }
        None => None,
    };

    if let Some(raw) = plan_param {
        // A malformed id cannot name any plan, so it gets the same 404.
        let plan_id = Uuid::parse_str(raw)
            .map_err(|_| AppError::not_found(format!("no plan with id {raw:?}")))?;
        let plan = plans::get_plan(&state.pool, plan_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("no plan with id {plan_id}")))?;
        filter.plan_id = Some(plan.id);
    }

    filter.search_name = search.map(str::to_owned);

    let task_rows = tasks::list_tasks(&state.pool, &filter).await?;

    // The plan dropdown narrows to the selected owner's plans so the two
    // filters stay consistent with each other.
    let plan_choices = match &owner {
        Some(user) => plans::list_plans_for_owner(&state.pool, user.id).await?,
        None => plans::list_plans(&state.pool).await?,
    };
    let user_rows = users::list_users(&state.pool).await?;

    // Toggles on this page return to this exact URI, filters included.
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| "/tasks".to_owned());

    let flash = take_flash(&headers);
    let html = pages::task_list_page(
        session.user.as_ref(),
        flash.as_deref(),
        &task_rows,
        &plan_choices,
        &user_rows,
        owner_name,
        plan_param,
        search,
        &next,
    );
    Ok(page_response(flash.is_some(), html))
}

pub async fn detail(
    State(state): State<AppState>,
    session: AuthSession,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let task = tasks::get_task_with_names(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

    let flash = take_flash(&headers);
    let html = pages::task_detail_page(session.user.as_ref(), flash.as_deref(), &task);
    Ok(page_response(flash.is_some(), html))
}

// TODO: decide whether toggling should require login and ownership like the
// plan mutations; today any visitor can flip any task.
pub async fn toggle_done(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ToggleQuery>,
) -> Result<Response, AppError> {
    let task = tasks::toggle_task_done(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;

    let state_word = if task.is_done { "done" } else { "undone" };
    let message = format!("Task {:?} marked as {state_word}", task.name);

    let target = query
        .next
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or("/tasks");
    Ok(flash_redirect(&message, target))
}
