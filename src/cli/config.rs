use anyhow::Context;

use crate::api::ApiClient;
use crate::cli::OutputFormat;
use crate::config::{self, AppConfig};
use crate::guard::RouteGuard;
use crate::session::TokenStore;

/// Everything a command needs: resolved configuration, the session store and
/// a client and guard sharing it
pub struct CliContext {
    pub config: AppConfig,
    pub store: TokenStore,
    pub client: ApiClient,
    pub guard: RouteGuard,
    pub output: OutputFormat,
}

impl CliContext {
    /// Resolve configuration, open the persisted session and build the client.
    ///
    /// `api_url` (the `--api-url` flag) wins over `CLUBSYNC_API_URL`.
    pub fn load(api_url: Option<&str>, output: OutputFormat) -> anyhow::Result<Self> {
        let mut config = config::config().clone();
        if let Some(url) = api_url {
            config.api.base_url = url.trim().trim_end_matches('/').to_string();
        }

        let store = if config.session.persist {
            let path = config.session_file()?;
            TokenStore::open(&path)
                .with_context(|| format!("failed to load session from {}", path.display()))?
        } else {
            TokenStore::in_memory()
        };

        Self::new(config, store, output)
    }

    pub fn new(config: AppConfig, store: TokenStore, output: OutputFormat) -> anyhow::Result<Self> {
        let client = ApiClient::from_config(&config, store.clone())
            .with_context(|| format!("invalid API URL '{}'", config.api.base_url))?;
        let guard = RouteGuard::new(store.clone());

        Ok(Self {
            config,
            store,
            client,
            guard,
            output,
        })
    }
}
