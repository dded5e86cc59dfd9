mod common;

use anyhow::Result;
use axum::{http::StatusCode, routing::delete, Json, Router};
use serde_json::json;

use clubsync::api::ResourceKind;
use clubsync::filter::TaskBoard;
use clubsync::mutation::{FormData, MutationFlow, SubmitError};
use clubsync::polls::PollTally;
use clubsync::routes::Route;

#[tokio::test]
async fn delete_navigates_back_to_collection() -> Result<()> {
    let app = Router::new().route(
        "/events/:id/delete/",
        delete(|| async { StatusCode::NO_CONTENT }),
    );
    let base_url = common::spawn(app).await?;
    let client = common::client(&base_url)?;

    let mut flow = MutationFlow::delete(ResourceKind::Event, "7");
    let route = flow.submit(&client).await?;

    assert_eq!(route, Route::Collection(ResourceKind::Event));
    assert!(flow.error().is_none());
    assert!(flow.can_submit());
    Ok(())
}

#[tokio::test]
async fn failed_delete_stays_and_shows_error() -> Result<()> {
    let app = Router::new().route(
        "/events/:id/delete/",
        delete(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": "You do not have permission to perform this action." })),
            )
        }),
    );
    let base_url = common::spawn(app).await?;
    let client = common::client(&base_url)?;

    let mut flow = MutationFlow::delete(ResourceKind::Event, "7");
    let err = flow.submit(&client).await.unwrap_err();

    assert!(matches!(err, SubmitError::Failed(_)));
    assert_eq!(
        flow.error_message(),
        Some("You do not have permission to perform this action.")
    );
    assert!(flow.can_submit());
    Ok(())
}

#[tokio::test]
async fn failed_write_without_detail_uses_operation_message() -> Result<()> {
    let app = Router::new().route(
        "/events/:id/delete/",
        delete(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = common::spawn(app).await?;
    let client = common::client(&base_url)?;

    let mut flow = MutationFlow::delete(ResourceKind::Event, "7");
    flow.submit(&client).await.unwrap_err();

    assert_eq!(flow.error_message(), Some("Failed to delete event"));
    Ok(())
}

#[tokio::test]
async fn created_task_records_creator_and_returns_to_board() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let client = common::logged_in(&base_url).await?;

    let mut form = FormData::blank(ResourceKind::Task);
    form.assign("title=Book venue")?;
    form.assign("status=todo")?;
    let mut flow = MutationFlow::create(ResourceKind::Task, form);

    let route = flow.submit(&client).await?;
    assert_eq!(route, Route::Collection(ResourceKind::Task));

    let tasks = client.fetch_list(ResourceKind::Task).await?;
    let created = tasks
        .iter()
        .find(|t| t["title"] == "Book venue")
        .expect("task listed after create");
    assert_eq!(created["creator"], json!(1));
    Ok(())
}

#[tokio::test]
async fn task_created_without_status_joins_todo_column() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let client = common::logged_in(&base_url).await?;

    let mut form = FormData::blank(ResourceKind::Task);
    form.assign("title=Order banners")?;
    MutationFlow::create(ResourceKind::Task, form)
        .submit(&client)
        .await?;

    let board = TaskBoard::group(&client.fetch_list(ResourceKind::Task).await?);
    assert!(board.todo.iter().any(|t| t["title"] == "Order banners"));
    assert!(board.unsorted.is_empty());
    Ok(())
}

#[tokio::test]
async fn created_event_opens_its_detail_page() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let client = common::logged_in(&base_url).await?;

    let mut form = FormData::blank(ResourceKind::Event);
    form.assign("title=Spring retreat")?;
    form.assign("location=Lakeside")?;
    let route = MutationFlow::create(ResourceKind::Event, form)
        .submit(&client)
        .await?;

    let Route::Detail(ResourceKind::Event, id) = route else {
        panic!("expected event detail route, got {route:?}");
    };
    let event = client.fetch_item(ResourceKind::Event, &id).await?;
    assert_eq!(event["location"], "Lakeside");
    Ok(())
}

#[tokio::test]
async fn create_rejected_by_server_keeps_form_as_typed() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let client = common::logged_in(&base_url).await?;

    let mut form = FormData::new();
    form.assign("location=Nowhere")?;
    let mut flow = MutationFlow::create(ResourceKind::Event, form);

    flow.submit(&client).await.unwrap_err();

    assert_eq!(flow.error_message(), Some("title: This field is required."));
    assert_eq!(flow.form().get("location"), Some(&json!("Nowhere")));
    Ok(())
}

#[tokio::test]
async fn update_merges_and_opens_detail() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let client = common::logged_in(&base_url).await?;

    let member = client.fetch_item(ResourceKind::Member, "3").await?;
    let mut form = FormData::from_resource(ResourceKind::Member, &member);
    form.assign("role=Coordinator")?;

    let route = MutationFlow::update(ResourceKind::Member, "3", form)
        .submit(&client)
        .await?;
    assert_eq!(route, Route::Detail(ResourceKind::Member, "3".to_string()));

    let updated = client.fetch_item(ResourceKind::Member, "3").await?;
    assert_eq!(updated["role"], "Coordinator");
    assert_eq!(updated["name"], "Mike Chen");
    Ok(())
}

#[tokio::test]
async fn vote_updates_tally_once_per_member() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let client = common::logged_in(&base_url).await?;

    let route = MutationFlow::vote("1", json!(3)).submit(&client).await?;
    assert_eq!(route, Route::Detail(ResourceKind::Poll, "1".to_string()));

    let poll = client.fetch_item(ResourceKind::Poll, "1").await?;
    let tally = PollTally::from_poll(&poll);
    let votes: Vec<u64> = tally.choices.iter().map(|c| c.votes).collect();
    let percents: Vec<u64> = tally.choices.iter().map(|c| c.percent).collect();
    assert_eq!(tally.total, 18);
    assert_eq!(votes, vec![10, 5, 3]);
    assert_eq!(percents, vec![56, 28, 17]);

    let mut again = MutationFlow::vote("1", json!(1));
    again.submit(&client).await.unwrap_err();
    assert_eq!(again.error_message(), Some("You have already voted in this poll."));
    Ok(())
}

#[tokio::test]
async fn closed_poll_refuses_votes() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let client = common::logged_in(&base_url).await?;

    let mut flow = MutationFlow::vote("2", json!(4));
    flow.submit(&client).await.unwrap_err();

    assert_eq!(flow.error_message(), Some("This poll is closed."));
    Ok(())
}

#[tokio::test]
async fn second_submit_while_in_flight_is_refused() -> Result<()> {
    let mut flow = MutationFlow::delete(ResourceKind::File, "1");

    let _pending = flow.begin(None)?;
    assert!(!flow.can_submit());
    assert_eq!(flow.begin(None).unwrap_err(), SubmitError::AlreadySubmitting);
    Ok(())
}
