//! Database query functions for the `plans` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Plan, PlanWithOwner};

const PLAN_WITH_OWNER: &str = "SELECT p.id, p.name, p.owner_id, p.created_at, \
     u.username AS owner_username \
     FROM plans p \
     JOIN users u ON u.id = p.owner_id";

/// Insert a new plan row. Returns the inserted plan with server-generated
/// defaults (id, created_at). The caller supplies the owner; handlers always
/// pass the requesting user's id.
pub async fn insert_plan(pool: &PgPool, name: &str, owner_id: Uuid) -> Result<Plan> {
    let plan = sqlx::query_as::<_, Plan>(
        "INSERT INTO plans (name, owner_id) \
         VALUES ($1, $2) \
         RETURNING *",
    )
    .bind(name)
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .context("failed to insert plan")?;

    Ok(plan)
}

/// Fetch a plan by its ID.
pub async fn get_plan(pool: &PgPool, id: Uuid) -> Result<Option<Plan>> {
    let plan = sqlx::query_as::<_, Plan>("SELECT * FROM plans WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch plan")?;

    Ok(plan)
}

/// Fetch a plan by ID with its owner's username joined in.
pub async fn get_plan_with_owner(pool: &PgPool, id: Uuid) -> Result<Option<PlanWithOwner>> {
    let plan = sqlx::query_as::<_, PlanWithOwner>(&format!("{PLAN_WITH_OWNER} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch plan with owner")?;

    Ok(plan)
}

/// List all plans, ordered by creation time.
pub async fn list_plans(pool: &PgPool) -> Result<Vec<PlanWithOwner>> {
    let plans =
        sqlx::query_as::<_, PlanWithOwner>(&format!("{PLAN_WITH_OWNER} ORDER BY p.created_at ASC"))
            .fetch_all(pool)
            .await
            .context("failed to list plans")?;

    Ok(plans)
}

/// List all plans belonging to one owner, ordered by creation time.
pub async fn list_plans_for_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<PlanWithOwner>> {
    let plans = sqlx::query_as::<_, PlanWithOwner>(&format!(
        "{PLAN_WITH_OWNER} WHERE p.owner_id = $1 ORDER BY p.created_at ASC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .context("failed to list plans for owner")?;

    Ok(plans)
}

/// Rename a plan. The owner is immutable; `name` is the only mutable field.
pub async fn rename_plan(pool: &PgPool, id: Uuid, name: &str) -> Result<()> {
    let result = sqlx::query("UPDATE plans SET name = $1 WHERE id = $2")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to rename plan")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("plan {id} not found");
    }

    Ok(())
}

/// Delete a plan. Its tasks are removed by the FK cascade.
pub async fn delete_plan(pool: &PgPool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("failed to delete plan")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("plan {id} not found");
    }

    Ok(())
}

/// Count all plans.
pub async fn count_plans(pool: &PgPool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans")
        .fetch_one(pool)
        .await
        .context("failed to count plans")?;

    Ok(row.0)
}
