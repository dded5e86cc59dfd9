use clap::Parser;
use clubsync::cli::utils::{output_error, Reported};
use clubsync::cli::{Cli, OutputFormat};
use clubsync::error::ClientError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so CLUBSYNC_API_URL and friends apply to local runs
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = clubsync::cli::run(cli).await {
        if e.downcast_ref::<Reported>().is_none() {
            match output_format {
                OutputFormat::Json => {
                    let code = e.downcast_ref::<ClientError>().map(ClientError::error_code);
                    output_error(&output_format, &e.to_string(), code)?;
                }
                OutputFormat::Text => match std::env::var("CLI_VERBOSE").as_deref() {
                    Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
                    _ => eprintln!("Error: {e}"),
                },
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
