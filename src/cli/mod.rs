pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::api::ResourceKind;

#[derive(Parser)]
#[command(name = "clubsync")]
#[command(about = "ClubSync - club management dashboard in the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (overrides CLUBSYNC_API_URL)")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Log in and store the session")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (read from stdin if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show whether a session is stored")]
    Status,

    #[command(about = "Show the claims carried by the access token")]
    Whoami,

    #[command(about = "Navigate to a dashboard path (e.g. /tasks/42)")]
    Open {
        #[arg(help = "Dashboard path")]
        path: String,
    },

    #[command(about = "List a collection")]
    List {
        #[arg(help = "Resource: members, events, tasks, minutes, files, polls")]
        kind: ResourceKind,
        #[arg(long, short, help = "Case-insensitive text search")]
        search: Option<String>,
        #[arg(long = "filter", short = 'f', help = "Facet filter FIELD=VALUE (repeatable, 'all' disables)")]
        filters: Vec<String>,
        #[arg(long, allow_hyphen_values = true, help = "Sort by FIELD, -FIELD or FIELD:desc")]
        sort: Option<String>,
        #[arg(long, help = "Print the distinct values of a facet instead of the list")]
        values: Option<String>,
    },

    #[command(about = "Show tasks grouped by status")]
    Board {
        #[arg(long, short, help = "Case-insensitive text search")]
        search: Option<String>,
        #[arg(long = "filter", short = 'f', help = "Facet filter FIELD=VALUE (repeatable)")]
        filters: Vec<String>,
    },

    #[command(about = "Show one item")]
    Show {
        kind: ResourceKind,
        id: String,
    },

    #[command(about = "Create an item from --field pairs or a JSON object on stdin")]
    Create {
        kind: ResourceKind,
        #[arg(long = "field", short = 'F', help = "Form field FIELD=VALUE (repeatable)")]
        fields: Vec<String>,
    },

    #[command(about = "Update an item; unspecified fields keep their current values")]
    Update {
        kind: ResourceKind,
        id: String,
        #[arg(long = "field", short = 'F', help = "Form field FIELD=VALUE (repeatable)")]
        fields: Vec<String>,
    },

    #[command(about = "Delete an item")]
    Delete {
        kind: ResourceKind,
        id: String,
    },

    #[command(about = "Vote in a poll")]
    Vote {
        #[arg(help = "Poll id")]
        poll: String,
        #[arg(help = "Choice id or text")]
        choice: String,
    },

    #[command(about = "In-memory demo backend")]
    Demo {
        #[command(subcommand)]
        cmd: commands::demo::DemoCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let api_url = cli.api_url;
    let context = || config::CliContext::load(api_url.as_deref(), output_format);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&context()?, email, password).await
        }
        Commands::Logout => commands::auth::logout(&context()?),
        Commands::Status => commands::auth::status(&context()?),
        Commands::Whoami => commands::auth::whoami(&context()?),
        Commands::Open { path } => commands::view::open(&context()?, &path).await,
        Commands::List {
            kind,
            search,
            filters,
            sort,
            values,
        } => {
            let query = commands::view::ListQuery {
                search,
                filters,
                sort,
            };
            match values {
                Some(field) => commands::view::facet_values(&context()?, kind, &query, &field).await,
                None => commands::view::list(&context()?, kind, &query).await,
            }
        }
        Commands::Board { search, filters } => {
            let query = commands::view::ListQuery {
                search,
                filters,
                sort: None,
            };
            commands::view::board(&context()?, &query).await
        }
        Commands::Show { kind, id } => commands::view::show(&context()?, kind, &id).await,
        Commands::Create { kind, fields } => {
            commands::mutate::create(&context()?, kind, &fields).await
        }
        Commands::Update { kind, id, fields } => {
            commands::mutate::update(&context()?, kind, &id, &fields).await
        }
        Commands::Delete { kind, id } => commands::mutate::delete(&context()?, kind, &id).await,
        Commands::Vote { poll, choice } => {
            commands::mutate::vote(&context()?, &poll, &choice).await
        }
        Commands::Demo { cmd } => commands::demo::handle(cmd, output_format).await,
    }
}
