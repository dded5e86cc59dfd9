use serde_json::{json, Value};

use super::view::{enter, load_item, render_route};
use crate::api::{id_value, ResourceKind};
use crate::cli::config::CliContext;
use crate::cli::utils::{self, output_success, Reported};
use crate::cli::OutputFormat;
use crate::mutation::{FormData, MutationFlow, SubmitError};
use crate::polls::PollTally;
use crate::render;
use crate::routes::Route;

pub async fn create(ctx: &CliContext, kind: ResourceKind, fields: &[String]) -> anyhow::Result<()> {
    enter(ctx, Route::Create(kind))?;

    let mut form = FormData::blank(kind);
    fill(&mut form, fields)?;
    let flow = MutationFlow::create(kind, form);
    submit(ctx, flow, &format!("Created {}", kind.singular())).await
}

pub async fn update(
    ctx: &CliContext,
    kind: ResourceKind,
    id: &str,
    fields: &[String],
) -> anyhow::Result<()> {
    enter(ctx, Route::Edit(kind, id.to_string()))?;

    let item = load_item(ctx, kind, id).await?;
    let mut form = FormData::from_resource(kind, &item);
    fill(&mut form, fields)?;
    let flow = MutationFlow::update(kind, id, form);
    submit(ctx, flow, &format!("Updated {} {}", kind.singular(), id)).await
}

pub async fn delete(ctx: &CliContext, kind: ResourceKind, id: &str) -> anyhow::Result<()> {
    enter(ctx, Route::Detail(kind, id.to_string()))?;

    let flow = MutationFlow::delete(kind, id);
    submit(ctx, flow, &format!("Deleted {} {}", kind.singular(), id)).await
}

/// Vote by choice id or text; the poll is read first to resolve the choice
pub async fn vote(ctx: &CliContext, poll: &str, choice: &str) -> anyhow::Result<()> {
    enter(ctx, Route::Detail(ResourceKind::Poll, poll.to_string()))?;

    let item = load_item(ctx, ResourceKind::Poll, poll).await?;
    let tally = PollTally::from_poll(&item);
    let picked = tally.find_choice(choice).ok_or_else(|| {
        let known: Vec<String> = tally
            .choices
            .iter()
            .map(|c| format!("{} ({})", c.id.as_deref().unwrap_or("-"), c.text))
            .collect();
        anyhow::anyhow!("No choice '{}' in poll {} (choices: {})", choice, poll, known.join(", "))
    })?;

    let choice_value = match &picked.id {
        Some(id) => id_value(id),
        None => Value::String(picked.text.clone()),
    };
    let flow = MutationFlow::vote(poll, choice_value);
    submit(ctx, flow, &format!("Voted for '{}'", picked.text)).await
}

/// Apply `--field` pairs, or a JSON object from stdin when none were given
fn fill(form: &mut FormData, fields: &[String]) -> anyhow::Result<()> {
    if fields.is_empty() {
        if let Some(map) = utils::read_stdin_object()? {
            form.merge(FormData::from_map(map));
        }
        return Ok(());
    }

    for field in fields {
        form.assign(field)?;
    }
    Ok(())
}

/// Submit once; on success follow the navigation, on failure show the form
/// with its inline error
async fn submit(ctx: &CliContext, mut flow: MutationFlow, done: &str) -> anyhow::Result<()> {
    match flow.submit(&ctx.client).await {
        Ok(destination) => {
            output_success(
                &ctx.output,
                &format!("{}; navigating to {}", done, destination),
                Some(json!({ "route": destination.path() })),
            )?;
            if ctx.output == OutputFormat::Text {
                println!();
                render_route(ctx, &destination).await?;
            }
            Ok(())
        }
        Err(SubmitError::Failed(err)) => {
            match ctx.output {
                OutputFormat::Text => eprintln!("{}", render::form(&flow)),
                OutputFormat::Json => {
                    utils::output_error(&ctx.output, err.display_message(), Some(err.error_code()))?
                }
            }
            Err(Reported {
                message: err.display_message().to_string(),
                error_code: Some(err.error_code()),
            }
            .into())
        }
        Err(e @ SubmitError::AlreadySubmitting) => Err(e.into()),
    }
}
