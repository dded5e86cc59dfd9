use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use crate::auth::{self, Credentials, LoginError};
use crate::cli::config::CliContext;
use crate::cli::utils::{self, output_success, Reported};
use crate::cli::OutputFormat;
use crate::session::claims;

pub async fn login(ctx: &CliContext, email: String, password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => utils::read_password()?,
    };
    let credentials = Credentials::new(email, password);

    match auth::login(&ctx.client, &credentials).await {
        Ok(destination) => output_success(
            &ctx.output,
            &format!("Logged in as {}; navigating to {}", credentials.email, destination),
            Some(json!({ "route": destination.path(), "api_url": ctx.client.base_url() })),
        ),
        Err(LoginError::Store(e)) => Err(e.into()),
        Err(e) => {
            let message = e.display_message();
            let code = match &e {
                LoginError::Request(err) => err.error_code(),
                _ => "LOGIN_FAILED",
            };
            utils::output_error(&ctx.output, &message, Some(code))?;
            Err(Reported {
                message,
                error_code: Some(code),
            }
            .into())
        }
    }
}

pub fn logout(ctx: &CliContext) -> anyhow::Result<()> {
    let destination = auth::logout(&ctx.store)?;
    output_success(
        &ctx.output,
        &format!("Logged out; navigating to {}", destination),
        Some(json!({ "route": destination.path() })),
    )
}

pub fn status(ctx: &CliContext) -> anyhow::Result<()> {
    let authenticated = ctx.store.is_authenticated();
    let session_file = ctx.store.path().map(|p| p.display().to_string());

    match ctx.output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "authenticated": authenticated,
                    "api_url": ctx.client.base_url(),
                    "session_file": session_file,
                }))?
            );
        }
        OutputFormat::Text => {
            if authenticated {
                println!("✓ Logged in");
            } else {
                println!("Not logged in");
            }
            println!("API: {}", ctx.client.base_url());
            if let Some(file) = session_file {
                println!("Session file: {}", file);
            }
        }
    }
    Ok(())
}

/// Claims decoded from the access token. Informational only: nothing is verified
pub fn whoami(ctx: &CliContext) -> anyhow::Result<()> {
    let session = ctx
        .store
        .get()
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `clubsync login <email>` first."))?;
    let claims = claims::decode_claims(&session.access)
        .ok_or_else(|| anyhow::anyhow!("Access token does not carry readable claims"))?;

    match ctx.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Value::Object(claims))?),
        OutputFormat::Text => {
            for (name, value) in &claims {
                let text = match (name.as_str(), value.as_i64()) {
                    ("exp" | "iat", Some(secs)) => timestamp(secs).unwrap_or_else(|| value.to_string()),
                    _ => value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()),
                };
                println!("{:<12} {}", format!("{}:", name), text);
            }
        }
    }
    Ok(())
}

fn timestamp(secs: i64) -> Option<String> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}
