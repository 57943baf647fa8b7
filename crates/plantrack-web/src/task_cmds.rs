//! Task provisioning subcommands for scripting and seeding.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use plantrack_db::queries::{plans, tasks, users};

use crate::TaskCommands;

pub async fn run_task_command(command: TaskCommands, pool: &PgPool) -> Result<()> {
    match command {
        TaskCommands::Add {
            plan_id,
            name,
            owner,
        } => {
            let plan_id = Uuid::parse_str(&plan_id)
                .with_context(|| format!("invalid plan id {plan_id:?}"))?;
            let plan = plans::get_plan(pool, plan_id)
                .await?
                .with_context(|| format!("no plan with id {plan_id}"))?;
            let owner = users::get_user_by_username(pool, &owner)
                .await?
                .with_context(|| format!("no user named {owner:?}"))?;

            let task = tasks::insert_task(pool, plan.id, owner.id, &name).await?;
            println!(
                "Created task {:?} in plan {:?} for {} (id {})",
                task.name, plan.name, owner.username, task.id
            );
        }
        TaskCommands::List { plan } => {
            let mut filter = tasks::TaskFilter::default();
            if let Some(raw) = plan {
                let plan_id =
                    Uuid::parse_str(&raw).with_context(|| format!("invalid plan id {raw:?}"))?;
                filter.plan_id = Some(plan_id);
            }

            let all = tasks::list_tasks(pool, &filter).await?;
            if all.is_empty() {
                println!("No tasks.");
                return Ok(());
            }
            println!("{} task(s):", all.len());
            for task in all {
                let mark = if task.is_done { "x" } else { " " };
                println!(
                    "  [{mark}] {} ({} / {})",
                    task.name, task.plan_name, task.owner_username
                );
            }
        }
    }
    Ok(())
}
