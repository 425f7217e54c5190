/// End-to-end chatbot tests against an in-memory database

mod common;

use common::{auth_context, create_task, create_user, setup_pool};
use taskdesk_shared::chatbot::entities::extract_title;
use taskdesk_shared::chatbot::intent::{extract_intent, Intent};
use taskdesk_shared::chatbot::respond;
use taskdesk_shared::models::category::Category;
use taskdesk_shared::models::task::{Task, TaskStatus, MAX_TITLE_LEN};

#[tokio::test]
async fn test_create_task_from_chat() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);

    let message = "Create task: Buy milk";
    assert_eq!(extract_intent(message), Intent::Create);
    let title = extract_title(message).unwrap();
    assert_eq!(title, "Buy milk");

    let reply = respond(&pool, &ctx, message).await;
    assert!(reply.starts_with("Created task #"), "{reply}");

    let tasks = Task::list_for_owner(&pool, user.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, title);
    assert_eq!(tasks[0].priority, 3);
    assert_eq!(tasks[0].status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_create_with_priority_description_and_category() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);
    let work = Category::create(&pool, "Work").await.unwrap();

    let reply = respond(
        &pool,
        &ctx,
        "Add task: Send report, numbers for work with high priority",
    )
    .await;
    assert!(reply.contains("priority: High"), "{reply}");
    assert!(reply.contains("category: Work"), "{reply}");

    let task = &Task::list_for_owner(&pool, user.id).await.unwrap()[0];
    assert_eq!(task.title, "Send report");
    assert_eq!(task.description.as_deref(), Some("numbers for work"));
    assert_eq!(task.priority, 1);
    assert_eq!(task.category_id, Some(work.id));
}

#[tokio::test]
async fn test_create_without_title_asks_for_one() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;

    let reply = respond(&pool, &auth_context(&user), "create task").await;
    assert!(reply.contains("What should the task be called"), "{reply}");
    assert!(Task::list_for_owner(&pool, user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_status_and_priority() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);
    let task = create_task(&pool, user.id, "Laundry").await;

    let reply = respond(&pool, &ctx, &format!("Mark task {} as done", task.id)).await;
    assert!(reply.contains("status: completed"), "{reply}");

    let reply = respond(&pool, &ctx, &format!("set task #{} priority=2", task.id)).await;
    assert!(reply.contains("priority: Medium"), "{reply}");

    let task = Task::find_for_owner(&pool, task.id, user.id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.priority, 2);
}

#[tokio::test]
async fn test_update_title_does_not_touch_status() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let task = create_task(&pool, user.id, "Shopping").await;

    respond(
        &pool,
        &auth_context(&user),
        &format!("change task {} title to Done shopping", task.id),
    )
    .await;

    let task = Task::find_for_owner(&pool, task.id, user.id).await.unwrap().unwrap();
    assert_eq!(task.title, "Done shopping");
    assert_eq!(task.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_update_needs_id_and_change() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);
    let task = create_task(&pool, user.id, "Laundry").await;

    let reply = respond(&pool, &ctx, "update the task to done").await;
    assert!(reply.contains("Which task"), "{reply}");

    let reply = respond(&pool, &ctx, &format!("update task {}", task.id)).await;
    assert!(reply.contains("What should I change"), "{reply}");
}

#[tokio::test]
async fn test_cannot_touch_other_users_tasks() {
    let pool = setup_pool().await;
    let alice = create_user(&pool, "alice", "user").await;
    let bob = create_user(&pool, "bob", "user").await;
    let task = create_task(&pool, alice.id, "Private").await;

    let reply = respond(&pool, &auth_context(&bob), &format!("delete task {}", task.id)).await;
    assert_eq!(reply, format!("I couldn't find task #{}.", task.id));

    let reply = respond(&pool, &auth_context(&bob), &format!("mark task {} done", task.id)).await;
    assert_eq!(reply, format!("I couldn't find task #{}.", task.id));

    assert!(Task::find_for_owner(&pool, task.id, alice.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_from_chat() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);
    let task = create_task(&pool, user.id, "Old").await;

    let reply = respond(&pool, &ctx, &format!("delete task {}", task.id)).await;
    assert_eq!(reply, format!("Deleted task #{}.", task.id));
    assert!(Task::list_for_owner(&pool, user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_with_status_filter_and_limit() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);

    for i in 0..12 {
        create_task(&pool, user.id, &format!("chore {i}")).await;
    }
    let done = create_task(&pool, user.id, "finished chore").await;
    Task::set_status(&pool, done.id, user.id, TaskStatus::Completed).await.unwrap();

    let reply = respond(&pool, &ctx, "show my tasks").await;
    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines[0], "Your tasks (13):");
    assert_eq!(lines.len(), 1 + 10 + 1);
    assert_eq!(lines[11], "...and 3 more");

    let reply = respond(&pool, &ctx, "list completed").await;
    assert!(reply.starts_with("Your completed tasks (1):"), "{reply}");
    assert!(reply.contains("finished chore"));

    let reply = respond(&pool, &ctx, "list in progress").await;
    assert_eq!(reply, "You have no in progress tasks.");
}

#[tokio::test]
async fn test_status_help_greeting_unknown() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);
    let task = create_task(&pool, user.id, "a").await;
    create_task(&pool, user.id, "b").await;
    Task::set_status(&pool, task.id, user.id, TaskStatus::Progress).await.unwrap();

    let reply = respond(&pool, &ctx, "stats").await;
    assert_eq!(reply, "You have 2 tasks: 1 pending, 1 in progress, 0 completed.");

    let reply = respond(&pool, &ctx, "help").await;
    assert!(reply.starts_with("Here's what I can do"));

    let reply = respond(&pool, &ctx, "hello").await;
    assert!(reply.starts_with("Hello alice!"));

    let reply = respond(&pool, &ctx, "what's the weather like").await;
    assert!(reply.contains("Type \"help\""));
}

#[tokio::test]
async fn test_handler_failure_becomes_apology() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);

    pool.close().await;

    let reply = respond(&pool, &ctx, "Create task: Buy milk").await;
    assert!(
        reply.starts_with("Sorry, I couldn't process that: "),
        "{reply}"
    );
}

#[tokio::test]
async fn test_overlong_titles_are_refused() {
    let pool = setup_pool().await;
    let user = create_user(&pool, "alice", "user").await;
    let ctx = auth_context(&user);

    let reply = respond(&pool, &ctx, &format!("Create task: {}", "a".repeat(300))).await;
    assert!(reply.contains("too long"), "{reply}");
    assert!(Task::list_for_owner(&pool, user.id).await.unwrap().is_empty());

    let longest = "b".repeat(MAX_TITLE_LEN);
    let reply = respond(&pool, &ctx, &format!("Create task: {longest}")).await;
    assert!(reply.starts_with("Created task #"), "{reply}");

    let task = create_task(&pool, user.id, "Short").await;
    let reply = respond(
        &pool,
        &ctx,
        &format!("change task {} title to {}", task.id, "c".repeat(MAX_TITLE_LEN + 1)),
    )
    .await;
    assert!(reply.contains("too long"), "{reply}");

    let task = Task::find_for_owner(&pool, task.id, user.id).await.unwrap().unwrap();
    assert_eq!(task.title, "Short");
}
