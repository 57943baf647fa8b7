//! Database query functions for the `tasks` table, including the composable
//! list filter used by the task list view.

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Task, TaskWithNames};

/// Insert a new task row. Returns the inserted task with server-generated
/// defaults (id, created_at, is_done = false).
pub async fn insert_task(
    pool: &PgPool,
    plan_id: Uuid,
    owner_id: Uuid,
    name: &str,
) -> Result<Task> {
    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (plan_id, owner_id, name) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(plan_id)
    .bind(owner_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .context("failed to insert task")?;

    Ok(task)
}

/// Fetch a single task by ID.
pub async fn get_task(pool: &PgPool, id: Uuid) -> Result<Option<Task>> {
    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch task")?;

    Ok(task)
}

/// Fetch a task by ID with its plan and owner names joined in.
pub async fn get_task_with_names(pool: &PgPool, id: Uuid) -> Result<Option<TaskWithNames>> {
    let task = sqlx::query_as::<_, TaskWithNames>(&format!("{TASK_WITH_NAMES} WHERE t.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch task with names")?;

    Ok(task)
}

/// Atomically flip a task's done flag. Returns the updated task, or `None`
/// if no such task exists.
pub async fn toggle_task_done(pool: &PgPool, id: Uuid) -> Result<Option<Task>> {
    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks SET is_done = NOT is_done WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("failed to toggle task done flag")?;

    Ok(task)
}

/// Count all tasks.
pub async fn count_tasks(pool: &PgPool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(pool)
        .await
        .context("failed to count tasks")?;

    Ok(row.0)
}

// -----------------------------------------------------------------------
// List filter
// -----------------------------------------------------------------------

const TASK_WITH_NAMES: &str = "SELECT t.id, t.name, t.plan_id, t.owner_id, t.is_done, \
     t.created_at, p.name AS plan_name, u.username AS owner_username \
     FROM tasks t \
     JOIN plans p ON p.id = t.plan_id \
     JOIN users u ON u.id = t.owner_id";

/// Optional filter clauses for the task list. Each present clause is ANDed
/// into the WHERE; an empty filter matches every task.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub owner_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
    /// Case-insensitive substring match against the task name.
    pub search_name: Option<String>,
}

/// Escape LIKE/ILIKE metacharacters so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn build_list_query(filter: &TaskFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(TASK_WITH_NAMES);

    let mut prefix = " WHERE ";
    if let Some(owner_id) = filter.owner_id {
        qb.push(prefix).push("t.owner_id = ").push_bind(owner_id);
        prefix = " AND ";
    }
    if let Some(plan_id) = filter.plan_id {
        qb.push(prefix).push("t.plan_id = ").push_bind(plan_id);
        prefix = " AND ";
    }
    if let Some(ref needle) = filter.search_name {
        qb.push(prefix)
            .push("t.name ILIKE ")
            .push_bind(format!("%{}%", escape_like(needle)));
    }

    qb.push(" ORDER BY t.created_at ASC");
    qb
}

/// List tasks matching the filter, with plan and owner names joined in.
pub async fn list_tasks(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<TaskWithNames>> {
    let mut qb = build_list_query(filter);
    let tasks = qb
        .build_query_as::<TaskWithNames>()
        .fetch_all(pool)
        .await
        .context("failed to list tasks")?;

    Ok(tasks)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
