use serde_json::{json, Map, Value};

use crate::api::ResourceKind;
use crate::cli::config::CliContext;
use crate::cli::utils::{self, output_success, output_view};
use crate::cli::OutputFormat;
use crate::filter::{self, ListFilter, TaskBoard};
use crate::guard::GuardDecision;
use crate::mutation::{FormData, MutationFlow};
use crate::render;
use crate::routes::{Route, NAV_ITEMS};
use crate::view::{ResourcePage, ViewState};

/// Search, facet and sort options of a collection command
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub filters: Vec<String>,
    pub sort: Option<String>,
}

impl ListQuery {
    pub fn to_filter(&self, kind: ResourceKind) -> anyhow::Result<ListFilter> {
        let mut filter = ListFilter::new(kind);
        if let Some(search) = &self.search {
            filter.search(search);
        }
        for pair in &self.filters {
            filter.assign(pair)?;
        }
        if let Some(sort) = &self.sort {
            filter.order(sort)?;
        }
        Ok(filter)
    }
}

/// Run the route guard for `route`; a redirect is reported and ends the command
pub fn enter(ctx: &CliContext, route: Route) -> anyhow::Result<Route> {
    match ctx.guard.check(route) {
        GuardDecision::Allow(route) => Ok(route),
        GuardDecision::Redirect(to) => Err(utils::report_redirect(&ctx.output, &to)),
    }
}

/// `open <path>`: parse, guard, then render whatever the route shows
pub async fn open(ctx: &CliContext, path: &str) -> anyhow::Result<()> {
    match ctx.guard.navigate(path)? {
        GuardDecision::Allow(route) => render_route(ctx, &route).await,
        GuardDecision::Redirect(to) => Err(utils::report_redirect(&ctx.output, &to)),
    }
}

/// Render an already-admitted route
pub async fn render_route(ctx: &CliContext, route: &Route) -> anyhow::Result<()> {
    match route {
        Route::Login { .. } => output_success(
            &ctx.output,
            "Login page: run `clubsync login <email>`",
            Some(json!({ "route": route.path() })),
        ),
        Route::Dashboard => dashboard(ctx).await,
        Route::Collection(ResourceKind::Task) => board(ctx, &ListQuery::default()).await,
        Route::Collection(kind) => list(ctx, *kind, &ListQuery::default()).await,
        Route::Create(kind) => {
            let flow = MutationFlow::create(*kind, FormData::blank(*kind));
            output_view(&ctx.output, &flow.form().to_value(), &render::form(&flow))
        }
        Route::Detail(kind, id) => show(ctx, *kind, id).await,
        Route::Edit(kind, id) => edit_form(ctx, *kind, id).await,
    }
}

pub async fn list(ctx: &CliContext, kind: ResourceKind, query: &ListQuery) -> anyhow::Result<()> {
    enter(ctx, Route::Collection(kind))?;
    let filter = query.to_filter(kind)?;

    let state = load_collection(ctx, kind).await.map(|items| filter.apply(&items));
    if let ViewState::Failed(err) = &state {
        return Err(utils::report(&ctx.output, err));
    }

    let text = render::state(&state, |items| match kind {
        ResourceKind::Event => render::event_sections(items),
        _ => render::table(kind, items),
    });
    let data = Value::Array(state.data().cloned().unwrap_or_default());
    output_view(&ctx.output, &data, &text)
}

/// Distinct values of one field across the (filtered) collection
pub async fn facet_values(
    ctx: &CliContext,
    kind: ResourceKind,
    query: &ListQuery,
    field: &str,
) -> anyhow::Result<()> {
    enter(ctx, Route::Collection(kind))?;
    let filter = query.to_filter(kind)?;

    let items = match load_collection(ctx, kind).await {
        ViewState::Ready(items) => filter.apply(&items),
        ViewState::Failed(err) => return Err(utils::report(&ctx.output, &err)),
        _ => Vec::new(),
    };

    let values = filter::facet_values(&items, field);
    let text = if values.is_empty() {
        format!("No values for '{}'", field)
    } else {
        values.join("\n")
    };
    output_view(&ctx.output, &json!(values), &text)
}

pub async fn board(ctx: &CliContext, query: &ListQuery) -> anyhow::Result<()> {
    let kind = ResourceKind::Task;
    enter(ctx, Route::Collection(kind))?;
    let filter = query.to_filter(kind)?;

    let state = load_collection(ctx, kind)
        .await
        .map(|items| TaskBoard::group(&filter.apply(&items)));
    if let ViewState::Failed(err) = &state {
        return Err(utils::report(&ctx.output, err));
    }

    let text = render::state(&state, render::board);
    let data = match state.data() {
        Some(board) => serde_json::to_value(board)?,
        None => Value::Null,
    };
    output_view(&ctx.output, &data, &text)
}

pub async fn show(ctx: &CliContext, kind: ResourceKind, id: &str) -> anyhow::Result<()> {
    enter(ctx, Route::Detail(kind, id.to_string()))?;

    let mut page = ResourcePage::item(kind, id);
    let state = page.mount(&ctx.client).await;
    if let ViewState::Failed(err) = state {
        return Err(utils::report(&ctx.output, err));
    }

    let text = render::state(state, |item| render::item(kind, item));
    let data = state.data().cloned().unwrap_or(Value::Null);
    output_view(&ctx.output, &data, &text)
}

/// Edit page: the item's current values as the form would be prefilled
async fn edit_form(ctx: &CliContext, kind: ResourceKind, id: &str) -> anyhow::Result<()> {
    let item = load_item(ctx, kind, id).await?;
    let flow = MutationFlow::update(kind, id, FormData::from_resource(kind, &item));
    output_view(&ctx.output, &flow.form().to_value(), &render::form(&flow))
}

/// Item read that reports a failed view and ends the command
pub async fn load_item(ctx: &CliContext, kind: ResourceKind, id: &str) -> anyhow::Result<Value> {
    let mut page = ResourcePage::item(kind, id);
    page.mount(&ctx.client).await;
    match page.into_state() {
        ViewState::Ready(item) => Ok(item),
        ViewState::Failed(err) => Err(utils::report(&ctx.output, &err)),
        other => anyhow::bail!("{} view did not settle ({:?})", kind.singular(), other.phase()),
    }
}

/// Home page: one count per collection, each fetched as its own view
async fn dashboard(ctx: &CliContext) -> anyhow::Result<()> {
    let mut summary = Map::new();
    let mut text = String::from("Dashboard\n");

    for kind in ResourceKind::ALL {
        let state = load_collection(ctx, kind).await;
        let line = render::state(&state, |items| items.len().to_string());
        text.push_str(&format!("{:<20} {}\n", kind.title(), line));

        let entry = match &state {
            ViewState::Ready(items) => json!(items.len()),
            ViewState::Failed(err) => json!({ "error": err.display_message() }),
            _ => Value::Null,
        };
        summary.insert(kind.segment().to_string(), entry);
    }

    if ctx.output == OutputFormat::Text {
        let nav: Vec<&str> = NAV_ITEMS.iter().map(|(_, path)| *path).collect();
        text.push_str(&format!("\nNavigate: {}", nav.join("  ")));
    }
    output_view(&ctx.output, &Value::Object(summary), text.trim_end())
}

/// Mount a collection page and settle it to its items
async fn load_collection(ctx: &CliContext, kind: ResourceKind) -> ViewState<Vec<Value>> {
    let mut page = ResourcePage::collection(kind);
    page.mount(&ctx.client).await;
    page.into_state().map(|data| match data {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}
