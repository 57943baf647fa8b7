//! Plan views: list with owner filter, detail, and the login-gated
//! create/edit/delete mutations.
//!
//! Mutation checks run in a fixed order: login first, then existence (404),
//! then ownership (403). A stranger probing ids learns a plan exists before
//! learning they may not touch it, which matches what the list page already
//! shows everyone.

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use plantrack_db::models::Plan;
use plantrack_db::queries::{plans, users};

use crate::error::AppError;
use crate::pages;
use crate::permissions::can_modify_plan;
use crate::routes::{AppState, flash_redirect, page_response};
use crate::session::{AuthSession, take_flash};

#[derive(Deserialize)]
pub struct PlanListQuery {
    pub owner: Option<String>,
}

#[derive(Deserialize)]
pub struct PlanForm {
    pub name: String,
}

pub async fn list(
    State(state): State<AppState>,
    session: AuthSession,
    headers: HeaderMap,
    Query(query): Query<PlanListQuery>,
) -> Result<Response, AppError> {
    let owner = query.owner.as_deref().filter(|s| !s.is_empty());

    // An unknown owner is not an error here; the filter just matches nothing.
    let plan_rows = match owner {
        Some(username) => match users::get_user_by_username(&state.pool, username).await? {
            Some(user) => plans::list_plans_for_owner(&state.pool, user.id).await?,
            None => Vec::new(),
        },
        None => plans::list_plans(&state.pool).await?,
    };
    let user_rows = users::list_users(&state.pool).await?;

    let flash = take_flash(&headers);
    let html = pages::plan_list_page(
        session.user.as_ref(),
        flash.as_deref(),
        &plan_rows,
        &user_rows,
        owner,
    );
    Ok(page_response(flash.is_some(), html))
}

pub async fn detail(
    State(state): State<AppState>,
    session: AuthSession,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let plan = plans::get_plan_with_owner(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no plan with id {id}")))?;

    let flash = take_flash(&headers);
    let html = pages::plan_detail_page(session.user.as_ref(), flash.as_deref(), &plan);
    Ok(page_response(flash.is_some(), html))
}

pub async fn create_form(
    session: AuthSession,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user = session.require("/plans/new")?;

    let flash = take_flash(&headers);
    let html = pages::plan_form_page(
        Some(&user),
        flash.as_deref(),
        "New plan",
        "/plans/new",
        None,
        None,
    );
    Ok(page_response(flash.is_some(), html))
}

pub async fn create(
    State(state): State<AppState>,
    session: AuthSession,
    Form(form): Form<PlanForm>,
) -> Result<Response, AppError> {
    let user = session.require("/plans/new")?;

    let name = form.name.trim();
    if name.is_empty() {
        let html = pages::plan_form_page(
            Some(&user),
            None,
            "New plan",
            "/plans/new",
            None,
            Some("Plan name must not be empty."),
        );
        return Ok(Html(html).into_response());
    }

    // The owner is always the logged-in user, never a form field.
    plans::insert_plan(&state.pool, name, user.id).await?;
    Ok(flash_redirect("Plan created successfully", "/plans"))
}

/// Load a plan and check that `session`'s user may modify it. Shared by the
/// edit and delete routes.
async fn plan_for_modification(
    state: &AppState,
    session: AuthSession,
    id: Uuid,
    next: &str,
    verb: &str,
) -> Result<(plantrack_db::models::User, Plan), AppError> {
    let user = session.require(next)?;

    let plan = plans::get_plan(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("no plan with id {id}")))?;

    if !can_modify_plan(&user, &plan) {
        return Err(AppError::forbidden(format!(
            "only the plan owner or a superuser may {verb} a plan"
        )));
    }

    Ok((user, plan))
}

pub async fn edit_form(
    State(state): State<AppState>,
    session: AuthSession,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let next = format!("/plans/{id}/edit");
    let (user, plan) = plan_for_modification(&state, session, id, &next, "edit").await?;

    let flash = take_flash(&headers);
    let html = pages::plan_form_page(
        Some(&user),
        flash.as_deref(),
        "Edit plan",
        &next,
        Some(&plan.name),
        None,
    );
    Ok(page_response(flash.is_some(), html))
}

pub async fn edit(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Form(form): Form<PlanForm>,
) -> Result<Response, AppError> {
    let next = format!("/plans/{id}/edit");
    let (user, plan) = plan_for_modification(&state, session, id, &next, "edit").await?;

    let name = form.name.trim();
    if name.is_empty() {
        let html = pages::plan_form_page(
            Some(&user),
            None,
            "Edit plan",
            &next,
            Some(&plan.name),
            Some("Plan name must not be empty."),
        );
        return Ok(Html(html).into_response());
    }

    plans::rename_plan(&state.pool, plan.id, name).await?;
    Ok(flash_redirect("Plan updated successfully", "/plans"))
}

pub async fn delete_form(
    State(state): State<AppState>,
    session: AuthSession,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let next = format!("/plans/{id}/delete");
    let (user, plan) = plan_for_modification(&state, session, id, &next, "delete").await?;

    let flash = take_flash(&headers);
    let html = pages::plan_delete_page(Some(&user), flash.as_deref(), &plan);
    Ok(page_response(flash.is_some(), html))
}

pub async fn delete(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let next = format!("/plans/{id}/delete");
    let (_user, plan) = plan_for_modification(&state, session, id, &next, "delete").await?;

    plans::delete_plan(&state.pool, plan.id).await?;
    Ok(flash_redirect("Plan deleted successfully", "/plans"))
}
