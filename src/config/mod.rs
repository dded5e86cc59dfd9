use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DEMO_PORT: u16 = 8000;
pub const DEFAULT_DEMO_SECRET: &str = "clubsync-demo-secret";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory holding `session.json`; `None` falls back to `$HOME/.config/clubsync`
    pub config_dir: Option<PathBuf>,
    pub persist: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    pub port: u16,
    pub enable_cors: bool,
    /// HS256 secret the demo backend signs its tokens with
    pub jwt_secret: String,
    pub token_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("CLUBSYNC_API_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        if let Ok(v) = env::var("CLUBSYNC_CONFIG_DIR") {
            self.session.config_dir = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("SESSION_PERSIST") {
            self.session.persist = v.parse().unwrap_or(self.session.persist);
        }

        if let Ok(v) = env::var("CLUBSYNC_DEMO_PORT") {
            self.demo.port = v.parse().unwrap_or(self.demo.port);
        }
        if let Ok(v) = env::var("DEMO_ENABLE_CORS") {
            self.demo.enable_cors = v.parse().unwrap_or(self.demo.enable_cors);
        }
        if let Ok(v) = env::var("DEMO_JWT_SECRET") {
            self.demo.jwt_secret = v;
        }
        if let Ok(v) = env::var("DEMO_TOKEN_EXPIRY_HOURS") {
            self.demo.token_expiry_hours = v.parse().unwrap_or(self.demo.token_expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                enable_request_logging: true,
            },
            session: SessionConfig {
                config_dir: None,
                persist: true,
            },
            demo: DemoConfig {
                port: DEFAULT_DEMO_PORT,
                enable_cors: true,
                jwt_secret: DEFAULT_DEMO_SECRET.to_string(),
                token_expiry_hours: 24,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                enable_request_logging: true,
            },
            session: SessionConfig {
                config_dir: None,
                persist: true,
            },
            demo: DemoConfig {
                port: DEFAULT_DEMO_PORT,
                enable_cors: true,
                jwt_secret: DEFAULT_DEMO_SECRET.to_string(),
                token_expiry_hours: 24,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: DEFAULT_API_URL.to_string(),
                enable_request_logging: false,
            },
            session: SessionConfig {
                config_dir: None,
                persist: true,
            },
            demo: DemoConfig {
                port: DEFAULT_DEMO_PORT,
                enable_cors: false,
                jwt_secret: DEFAULT_DEMO_SECRET.to_string(),
                token_expiry_hours: 24,
            },
        }
    }

    /// Resolve the directory the session file lives in, creating it if needed
    pub fn config_dir(&self) -> anyhow::Result<PathBuf> {
        let dir = match &self.session.config_dir {
            Some(dir) => dir.clone(),
            None => {
                let home = env::var("HOME")
                    .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
                PathBuf::from(home).join(".config").join("clubsync")
            }
        };

        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }

        Ok(dir)
    }

    pub fn session_file(&self) -> anyhow::Result<PathBuf> {
        Ok(self.config_dir()?.join("session.json"))
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
