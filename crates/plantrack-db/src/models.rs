use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user.
///
/// Account lifecycle (creation, superuser flag) is managed through the CLI,
/// not the web surface. Superusers bypass ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// A plan -- a named collection of tasks owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A task -- a unit of work inside a plan, with a done/undone flag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub plan_id: Uuid,
    pub owner_id: Uuid,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

/// A plan with its owner's username joined in (list and detail views).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanWithOwner {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
}

/// A task with its plan and owner names joined in (list and detail views).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskWithNames {
    pub id: Uuid,
    pub name: String,
    pub plan_id: Uuid,
    pub owner_id: Uuid,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub plan_name: String,
    pub owner_username: String,
}
