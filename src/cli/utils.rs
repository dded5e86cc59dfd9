use std::io::{self, BufRead, IsTerminal, Read, Write};

use serde_json::{json, Value};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::routes::Route;

/// A failure already printed for the user; the binary only sets the exit code
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Reported {
    pub message: String,
    pub error_code: Option<&'static str>,
}

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print a raw payload (JSON mode) or pre-rendered text
pub fn output_view(output_format: &OutputFormat, data: &Value, text: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => println!("{}", text),
    }
    Ok(())
}

/// Show a request failure the way views do and hand back the exit marker
pub fn report(output_format: &OutputFormat, err: &ClientError) -> anyhow::Error {
    let message = err.display_message().to_string();
    if let Err(e) = output_error(output_format, &message, Some(err.error_code())) {
        return e;
    }
    Reported {
        message,
        error_code: Some(err.error_code()),
    }
    .into()
}

/// The guard sent us to the login page instead of `from`
pub fn report_redirect(output_format: &OutputFormat, to: &Route) -> anyhow::Error {
    let from = match to {
        Route::Login { from: Some(from) } => from.as_str(),
        _ => "/",
    };
    let message = format!(
        "Login required to open {}; redirected to {}. Run `clubsync login <email>` first.",
        from,
        to.path()
    );

    if let OutputFormat::Json = output_format {
        let response = json!({
            "success": false,
            "error": message,
            "error_code": "LOGIN_REQUIRED",
            "redirect": to.path(),
            "from": from,
        });
        match serde_json::to_string_pretty(&response) {
            Ok(text) => println!("{}", text),
            Err(e) => return e.into(),
        }
    } else {
        eprintln!("Error: {}", message);
    }

    Reported {
        message,
        error_code: Some("LOGIN_REQUIRED"),
    }
    .into()
}

/// Read a password from stdin, prompting when attached to a terminal
pub fn read_password() -> anyhow::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush()?;
    }

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let password = line.trim_end_matches(&['\r', '\n'][..]).to_string();
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }
    Ok(password)
}

/// A JSON object piped on stdin, if any
pub fn read_stdin_object() -> anyhow::Result<Option<serde_json::Map<String, Value>>> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut content = String::new();
    stdin.read_to_string(&mut content)?;
    if content.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(Some(map)),
        _ => anyhow::bail!("Expected a JSON object on stdin"),
    }
}
