use anyhow::{Context, Result};
use indexer::conf::{CacheConfig, IndexerConfig, IngestConfig, QueryConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewerConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Covers upload parsing, so it must allow for large archives.
    pub request_timeout_secs: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    File { path: String },
}

impl ViewerConfig {
    /// Load configuration from viewer.toml and environment variables
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = config::Config::try_from(&ViewerConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        // 1. /etc/cmlog/viewer.toml (production)
        // 2. config/viewer.toml (local development)
        // 3. crates/viewer/config/viewer.toml (workspace root)
        let config_paths = [
            "/etc/cmlog/viewer",
            "config/viewer",
            "crates/viewer/config/viewer",
        ];
        for path in config_paths {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Nested keys use a double underscore: VIEWER_QUERY__MAX_WINDOW_LINES
        builder = builder.add_source(
            config::Environment::with_prefix("VIEWER")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        self.server
            .bind_address
            .parse::<std::net::SocketAddr>()
            .context("Invalid bind_address")?;

        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("server.request_timeout_secs must be > 0");
        }

        self.indexer_config()
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid indexer configuration")
    }

    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            ingest: self.ingest.clone(),
            cache: self.cache.clone(),
            query: self.query.clone(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:5000".to_string(),
                request_timeout_secs: 300,
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:5000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            logging: LoggingConfig {
                level: "info,viewer=debug".to_string(),
                format: LogFormat::Pretty,
                output: LogOutput::Stdout,
            },
            ingest: IngestConfig::default(),
            cache: CacheConfig::default(),
            query: QueryConfig::default(),
        }
    }
}
