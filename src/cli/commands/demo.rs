use clap::Subcommand;
use serde_json::json;
use tokio::net::TcpListener;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::demo::{self, DemoState, TokenKeys, DEMO_EMAIL, DEMO_PASSWORD};

#[derive(Subcommand)]
pub enum DemoCommands {
    #[command(about = "Serve seeded sample data until interrupted")]
    Serve {
        #[arg(long, help = "Port to listen on (defaults to CLUBSYNC_DEMO_PORT or 8000)")]
        port: Option<u16>,
        #[arg(long, default_value = "127.0.0.1", help = "Address to bind")]
        host: String,
    },
}

pub async fn handle(cmd: DemoCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DemoCommands::Serve { port, host } => {
            let demo_config = &config::config().demo;
            let bind_addr = format!("{}:{}", host, port.unwrap_or(demo_config.port));
            let listener = TcpListener::bind(&bind_addr)
                .await
                .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;
            let url = format!("http://{}", listener.local_addr()?);

            output_success(
                &output_format,
                &format!(
                    "Demo backend listening on {} (login: {} / {})",
                    url, DEMO_EMAIL, DEMO_PASSWORD
                ),
                Some(json!({ "url": url, "email": DEMO_EMAIL })),
            )?;

            let state = DemoState::seeded(TokenKeys::from_config(demo_config));
            demo::serve(listener, state, demo_config.enable_cors).await
        }
    }
}
