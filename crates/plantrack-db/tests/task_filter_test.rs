//! Integration tests for task queries and the composable list filter.

use uuid::Uuid;

use plantrack_db::models::{Plan, User};
use plantrack_db::queries::tasks::{self, TaskFilter};
use plantrack_db::queries::{plans, users};
use plantrack_test_utils::{create_test_db, drop_test_db};
use sqlx::PgPool;

/// Seed two users, two plans, and a spread of tasks. Returns
/// (alice, bob, alice's plan, bob's plan).
async fn seed(pool: &PgPool) -> (User, User, Plan, Plan) {
    let alice = users::insert_user(pool, "alice", false).await.unwrap();
    let bob = users::insert_user(pool, "bob", false).await.unwrap();

    let plan_a = plans::insert_plan(pool, "alice plan", alice.id).await.unwrap();
    let plan_b = plans::insert_plan(pool, "bob plan", bob.id).await.unwrap();

    tasks::insert_task(pool, plan_a.id, alice.id, "buy food")
        .await
        .unwrap();
    tasks::insert_task(pool, plan_a.id, alice.id, "cook Food dinner")
        .await
        .unwrap();
    tasks::insert_task(pool, plan_b.id, alice.id, "food for bob's plan")
        .await
        .unwrap();
    tasks::insert_task(pool, plan_b.id, bob.id, "wash dishes")
        .await
        .unwrap();

    (alice, bob, plan_a, plan_b)
}

#[tokio::test]
async fn insert_and_get_task() {
    let (pool, db_name) = create_test_db().await;

    let alice = users::insert_user(&pool, "alice", false).await.unwrap();
    let plan = plans::insert_plan(&pool, "chores", alice.id).await.unwrap();

    let task = tasks::insert_task(&pool, plan.id, alice.id, "sweep")
        .await
        .expect("insert_task should succeed");
    assert_eq!(task.name, "sweep");
    assert!(!task.is_done);

    let with_names = tasks::get_task_with_names(&pool, task.id)
        .await
        .unwrap()
        .expect("task should exist");
    assert_eq!(with_names.plan_name, "chores");
    assert_eq!(with_names.owner_username, "alice");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_task_returns_none_for_missing_id() {
    let (pool, db_name) = create_test_db().await;

    let result = tasks::get_task(&pool, Uuid::new_v4()).await.unwrap();
    assert!(result.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn empty_filter_lists_everything() {
    let (pool, db_name) = create_test_db().await;
    seed(&pool).await;

    let all = tasks::list_tasks(&pool, &TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(tasks::count_tasks(&pool).await.unwrap(), 4);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn owner_filter_selects_only_that_owner() {
    let (pool, db_name) = create_test_db().await;
    let (alice, _bob, _pa, _pb) = seed(&pool).await;

    let filter = TaskFilter {
        owner_id: Some(alice.id),
        ..Default::default()
    };
    let found = tasks::list_tasks(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|t| t.owner_id == alice.id));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn plan_filter_selects_only_that_plan() {
    let (pool, db_name) = create_test_db().await;
    let (_alice, _bob, plan_a, _pb) = seed(&pool).await;

    let filter = TaskFilter {
        plan_id: Some(plan_a.id),
        ..Default::default()
    };
    let found = tasks::list_tasks(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|t| t.plan_id == plan_a.id));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn search_filter_is_case_insensitive_substring() {
    let (pool, db_name) = create_test_db().await;
    seed(&pool).await;

    let filter = TaskFilter {
        search_name: Some("FOOD".to_owned()),
        ..Default::default()
    };
    let found = tasks::list_tasks(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 3);
    assert!(
        found
            .iter()
            .all(|t| t.name.to_lowercase().contains("food"))
    );

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn filters_compose_conjunctively() {
    let (pool, db_name) = create_test_db().await;
    let (alice, _bob, plan_a, _pb) = seed(&pool).await;

    // alice + plan_a + "food": only "buy food" and "cook Food dinner".
    let filter = TaskFilter {
        owner_id: Some(alice.id),
        plan_id: Some(plan_a.id),
        search_name: Some("food".to_owned()),
    };
    let found = tasks::list_tasks(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|t| {
        t.owner_id == alice.id && t.plan_id == plan_a.id && t.name.to_lowercase().contains("food")
    }));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn search_treats_percent_literally() {
    let (pool, db_name) = create_test_db().await;
    let (alice, _bob, plan_a, _pb) = seed(&pool).await;

    tasks::insert_task(&pool, plan_a.id, alice.id, "reach 100% coverage")
        .await
        .unwrap();

    let filter = TaskFilter {
        search_name: Some("100%".to_owned()),
        ..Default::default()
    };
    let found = tasks::list_tasks(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "reach 100% coverage");

    // A bare "%" must not match everything.
    let filter = TaskFilter {
        search_name: Some("%".to_owned()),
        ..Default::default()
    };
    let found = tasks::list_tasks(&pool, &filter).await.unwrap();
    assert_eq!(found.len(), 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn toggle_flips_and_toggling_twice_restores() {
    let (pool, db_name) = create_test_db().await;

    let alice = users::insert_user(&pool, "alice", false).await.unwrap();
    let plan = plans::insert_plan(&pool, "chores", alice.id).await.unwrap();
    let task = tasks::insert_task(&pool, plan.id, alice.id, "sweep")
        .await
        .unwrap();
    assert!(!task.is_done);

    let once = tasks::toggle_task_done(&pool, task.id)
        .await
        .unwrap()
        .expect("task should exist");
    assert!(once.is_done);

    let twice = tasks::toggle_task_done(&pool, task.id)
        .await
        .unwrap()
        .expect("task should exist");
    assert!(!twice.is_done, "toggling twice should restore the original");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn toggle_missing_task_returns_none() {
    let (pool, db_name) = create_test_db().await;

    let result = tasks::toggle_task_done(&pool, Uuid::new_v4()).await.unwrap();
    assert!(result.is_none());

    pool.close().await;
    drop_test_db(&db_name).await;
}
