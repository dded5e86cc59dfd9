mod common;

use anyhow::Result;

use clubsync::api::ResourceKind;
use clubsync::cli::commands::{auth, mutate, view};
use clubsync::cli::config::CliContext;
use clubsync::cli::utils::Reported;
use clubsync::cli::OutputFormat;
use clubsync::config;
use clubsync::demo::{DEMO_EMAIL, DEMO_PASSWORD};
use clubsync::session::TokenStore;

fn context(base_url: &str) -> Result<CliContext> {
    let mut config = config::config().clone();
    config.api.base_url = base_url.to_string();
    CliContext::new(config, TokenStore::in_memory(), OutputFormat::Json)
}

fn reported_code(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<Reported>().and_then(|r| r.error_code)
}

#[tokio::test]
async fn protected_commands_redirect_to_login() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let ctx = context(&base_url)?;

    let err = view::list(&ctx, ResourceKind::Event, &view::ListQuery::default())
        .await
        .unwrap_err();
    assert_eq!(reported_code(&err), Some("LOGIN_REQUIRED"));

    let err = view::open(&ctx, "/tasks/42").await.unwrap_err();
    assert_eq!(reported_code(&err), Some("LOGIN_REQUIRED"));
    Ok(())
}

#[tokio::test]
async fn login_then_browse_and_write() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let ctx = context(&base_url)?;

    auth::login(&ctx, DEMO_EMAIL.to_string(), Some(DEMO_PASSWORD.to_string())).await?;
    assert!(ctx.store.is_authenticated());

    let query = view::ListQuery {
        search: Some("meeting".to_string()),
        filters: vec!["event_type=meeting".to_string()],
        sort: Some("-start_time".to_string()),
    };
    view::list(&ctx, ResourceKind::Event, &query).await?;
    view::board(&ctx, &view::ListQuery::default()).await?;
    view::open(&ctx, "/").await?;
    view::open(&ctx, "/polls/1").await?;

    mutate::create(&ctx, ResourceKind::Minutes, &["title=AGM notes".to_string()]).await?;
    mutate::vote(&ctx, "1", "beach house").await?;
    mutate::delete(&ctx, ResourceKind::File, "4").await?;
    Ok(())
}

#[tokio::test]
async fn missing_item_is_reported_as_not_found() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let ctx = context(&base_url)?;
    auth::login(&ctx, DEMO_EMAIL.to_string(), Some(DEMO_PASSWORD.to_string())).await?;

    let err = view::show(&ctx, ResourceKind::Task, "999").await.unwrap_err();
    assert_eq!(reported_code(&err), Some("NOT_FOUND"));
    Ok(())
}

#[tokio::test]
async fn unknown_facet_is_rejected_before_fetching() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let ctx = context(&base_url)?;
    auth::login(&ctx, DEMO_EMAIL.to_string(), Some(DEMO_PASSWORD.to_string())).await?;

    let query = view::ListQuery {
        filters: vec!["colour=red".to_string()],
        ..Default::default()
    };
    assert!(view::list(&ctx, ResourceKind::Member, &query).await.is_err());
    Ok(())
}

#[tokio::test]
async fn rejected_write_is_reported_with_code() -> Result<()> {
    let base_url = common::spawn_demo().await?;
    let ctx = context(&base_url)?;
    auth::login(&ctx, DEMO_EMAIL.to_string(), Some(DEMO_PASSWORD.to_string())).await?;

    let err = mutate::vote(&ctx, "2", "Yes").await.unwrap_err();
    assert_eq!(reported_code(&err), Some("REQUEST_FAILED"));
    Ok(())
}
