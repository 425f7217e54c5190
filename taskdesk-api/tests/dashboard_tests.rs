//! Dashboard page and its JSON helpers

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::TestContext;
use taskdesk_shared::models::category::Category;
use taskdesk_shared::models::task::{CreateTask, Task, TaskStatus};

#[tokio::test]
async fn test_dashboard_page() {
    let ctx = TestContext::new().await.unwrap();
    for title in ["one", "two", "three", "four", "five"] {
        ctx.create_task(&ctx.user, title).await;
    }

    let (status, body) = ctx.get("/dashboard/", &ctx.user_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_name"], "alice");
    assert_eq!(body["user_title"], "User");
    assert_eq!(body["recent_tasks"].as_array().unwrap().len(), 4);
    assert_eq!(body["stats"]["total"], 5);
    assert_eq!(body["stats"]["pending"], 5);
    assert_eq!(body["analytics"].as_array().unwrap().len(), 7);
    assert_eq!(body["analytics"][6]["count"], 5);
    assert_eq!(body["is_admin"], false);
    assert_eq!(body["is_manager"], false);
    assert_eq!(body["listing"]["pagination"]["total_count"], 5);
}

#[tokio::test]
async fn test_dashboard_role_flags() {
    let ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx.get("/dashboard", &ctx.manager_token).await;
    assert_eq!(body["is_manager"], true);
    assert_eq!(body["is_admin"], false);

    let (_, body) = ctx.get("/dashboard/", &ctx.admin_token).await;
    assert_eq!(body["is_manager"], true);
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["user_title"], "Admin");
}

#[tokio::test]
async fn test_upcoming_and_summary() {
    let ctx = TestContext::new().await.unwrap();
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    Task::create(
        &ctx.db,
        ctx.user.id,
        CreateTask {
            title: "Future".to_string(),
            due_date: Some(tomorrow),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let started = ctx.create_task(&ctx.user, "Started").await;
    Task::set_status(&ctx.db, started.id, ctx.user.id, TaskStatus::Progress)
        .await
        .unwrap();

    let (status, body) = ctx.get("/dashboard/api/summary", &ctx.user_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_project"], 2);
    assert_eq!(body["ongoing_project"], 1);
    assert_eq!(body["upcoming_projects"], 1);
    assert_eq!(body["complete_project"], 0);
}

#[tokio::test]
async fn test_analytics_periods() {
    let ctx = TestContext::new().await.unwrap();
    ctx.create_task(&ctx.user, "today").await;

    for (period, days) in [("week", 7), ("month", 30), ("year", 365), ("decade", 365)] {
        let (_, body) = ctx
            .get(&format!("/dashboard/api/analytics?period={period}"), &ctx.user_token)
            .await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(body["days"], days);
        assert_eq!(data.len(), days as usize);
        assert_eq!(data.last().unwrap()["count"], 1);
        assert_eq!(data.last().unwrap()["date"], Utc::now().date_naive().to_string());
    }
}

#[tokio::test]
async fn test_project_categories() {
    let ctx = TestContext::new().await.unwrap();
    let home = Category::create(&ctx.db, "Home").await.unwrap();
    Category::create(&ctx.db, "Empty").await.unwrap();

    for title in ["a", "b"] {
        Task::create(
            &ctx.db,
            ctx.user.id,
            CreateTask {
                title: title.to_string(),
                category_id: Some(home.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }
    ctx.create_task(&ctx.user, "uncategorized").await;

    let (_, body) = ctx
        .get("/dashboard/api/project-categories", &ctx.user_token)
        .await;
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0]["name"], "Home");
    assert_eq!(categories[0]["count"], 2);
    assert_eq!(categories[0]["percentage"], 66.7);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_today_tasks() {
    let ctx = TestContext::new().await.unwrap();
    let task = ctx.create_task(&ctx.user, "Fresh").await;
    Task::toggle_complete(&ctx.db, task.id, ctx.user.id)
        .await
        .unwrap();

    let (_, body) = ctx.get("/dashboard/api/today-tasks", &ctx.user_token).await;
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Fresh");
    assert_eq!(tasks[0]["time_ago"], "just now");
    assert_eq!(tasks[0]["completed"], true);
}

#[tokio::test]
async fn test_all_tasks_status_filter_is_admin_only() {
    let ctx = TestContext::new().await.unwrap();
    for owner in [&ctx.user, &ctx.admin] {
        ctx.create_task(owner, "open").await;
        let done = ctx.create_task(owner, "done").await;
        Task::toggle_complete(&ctx.db, done.id, owner.id)
            .await
            .unwrap();
    }

    let (_, body) = ctx
        .get("/dashboard/api/all-tasks?status=completed", &ctx.user_token)
        .await;
    assert_eq!(body["tasks"].as_array().unwrap().len(), 2);

    let (_, body) = ctx
        .get("/dashboard/api/all-tasks?status=completed", &ctx.admin_token)
        .await;
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "done");
}

#[tokio::test]
async fn test_toggle_endpoint() {
    let ctx = TestContext::new().await.unwrap();
    let task = ctx.create_task(&ctx.user, "Flip").await;
    let uri = format!("/dashboard/api/task/{}/toggle", task.id);

    let (status, body) = ctx.post_form(&uri, &ctx.user_token, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["new_status"], "completed");

    let (status, body) = ctx.post_form(&uri, &ctx.manager_token, "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");
}
