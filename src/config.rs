use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::constants::http;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    User,
    Admin,
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Mode::User),
            "admin" => Ok(Mode::Admin),
            _ => Err(anyhow!("Invalid mode '{s}'. Valid options: user, admin")),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::User => write!(f, "user"),
            Mode::Admin => write!(f, "admin"),
        }
    }
}

/// Page configuration embedded by the backend as JSON in `#webapp-config`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAppConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub mode: Mode,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl WebAppConfig {
    pub fn defaults(origin: &str) -> Self {
        Self {
            api_base_url: Some(origin.to_string()),
            version: default_version(),
            mode: Mode::User,
        }
    }

    /// Parse the embedded config. A missing or malformed element falls back
    /// to defaults rooted at the page origin.
    pub fn from_page_json(raw: Option<&str>, origin: &str) -> Self {
        let Some(raw) = raw else {
            return Self::defaults(origin);
        };
        match serde_json::from_str::<WebAppConfig>(raw) {
            Ok(mut cfg) => {
                if cfg.api_base_url.as_deref().map_or(true, str::is_empty) {
                    cfg.api_base_url = Some(origin.to_string());
                }
                cfg
            }
            Err(e) => {
                log::error!("[config] Failed to parse config: {e}");
                Self::defaults(origin)
            }
        }
    }

    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_default()
            .trim_end_matches('/')
    }
}

/// Init data from the host shell if it has any, else from the `initData`
/// query parameter of the page URL. Empty values count as absent.
pub fn resolve_init_data(host_init_data: Option<&str>, query: &str) -> Option<String> {
    if let Some(init) = host_init_data.filter(|s| !s.is_empty()) {
        return Some(init.to_string());
    }
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == http::INIT_DATA_QUERY_PARAM)
        .and_then(|(_, value)| {
            let value = value.replace('+', " ");
            match urlencoding::decode(&value) {
                Ok(decoded) => Some(decoded.into_owned()),
                Err(e) => {
                    log::warn!("[config] undecodable initData parameter: {e}");
                    None
                }
            }
        })
        .filter(|s| !s.is_empty())
}

/// tgcatalog - Telegram mini-app catalog client
///
/// Browses and administers the catalog backend from the terminal.
/// Configuration priority: CLI args > Environment variables > Config file > Defaults
#[derive(Parser, Debug)]
#[command(name = "tgcatalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Telegram mini-app catalog client", long_about = None)]
pub struct CliArgs {
    /// Backend base URL (e.g. https://bot.example.com)
    #[arg(long, env = "WEBAPP_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Signed init data forwarded as X-Telegram-Init-Data
    #[arg(long, env = "WEBAPP_INIT_DATA")]
    pub init_data: Option<String>,

    /// Client mode: user or admin
    #[arg(long, env = "WEBAPP_MODE", value_parser = clap::value_parser!(Mode))]
    pub mode: Option<Mode>,

    /// Path to a TOML config file
    #[arg(long, env = "WEBAPP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request timeout in milliseconds (100-120000); no timeout when unset
    #[arg(long, env = "WEBAPP_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List categories
    Categories {
        #[arg(long)]
        include_inactive: bool,
    },
    /// Show one category with its items
    Category {
        id: i64,
        #[arg(long)]
        include_inactive: bool,
    },
    /// Show the current user
    Me,
    /// Run the initial load (optionally opening a category) and print the UI snapshot
    Browse {
        #[arg(long)]
        category: Option<i64>,
    },
    /// Submit a new category order (comma-separated ids)
    ReorderCategories {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
    /// Submit a new item order within a category (comma-separated ids)
    ReorderItems {
        category_id: i64,
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
    /// Delete a category
    DeleteCategory {
        id: i64,
        /// Deactivate instead of removing
        #[arg(long)]
        soft: bool,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete an item
    DeleteItem {
        category_id: i64,
        item_id: i64,
        #[arg(long)]
        soft: bool,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Upload a file
    Upload {
        path: PathBuf,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        /// MIME type sent with the file part
        #[arg(long)]
        mime: Option<String>,
    },
    /// Delete an uploaded file
    DeleteFile {
        id: i64,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Settings readable from the TOML config file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub init_data: Option<String>,
    pub mode: Option<Mode>,
    pub timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid config file")
    }

    pub fn read(path: &std::path::Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::parse(&raw)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub init_data: Option<String>,
    pub mode: Mode,
    pub timeout_ms: Option<u64>,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Load configuration from CLI args, environment variables and the config file.
/// Priority: CLI args > Environment variables > Config file > Defaults
pub fn load() -> Result<(Config, CliArgs)> {
    let args = CliArgs::parse();
    let config = resolve(&args)?;
    Ok((config, args))
}

pub fn resolve(args: &CliArgs) -> Result<Config> {
    let file = match args
        .config
        .clone()
        .or_else(|| env::var("WEBAPP_CONFIG").ok().map(PathBuf::from))
    {
        Some(path) => FileConfig::read(&path)?,
        None => FileConfig::default(),
    };
    resolve_with(args, file)
}

fn resolve_with(args: &CliArgs, file: FileConfig) -> Result<Config> {
    let api_base_url = args
        .api_base_url
        .clone()
        .or_else(|| env::var("WEBAPP_API_BASE_URL").ok())
        .or(file.api_base_url)
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());
    validate_url(&api_base_url, "WEBAPP_API_BASE_URL")?;
    let api_base_url = api_base_url.trim_end_matches('/').to_string();

    let init_data = args
        .init_data
        .clone()
        .or_else(|| env::var("WEBAPP_INIT_DATA").ok())
        .or(file.init_data)
        .filter(|s| !s.is_empty());

    let mode = args
        .mode
        .or_else(|| env::var("WEBAPP_MODE").ok().and_then(|s| s.parse().ok()))
        .or(file.mode)
        .unwrap_or_default();

    let timeout_ms = args
        .timeout_ms
        .or_else(|| {
            env::var("WEBAPP_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .or(file.timeout_ms)
        .map(|ms| validate_in_range(ms, 100, 120_000, "WEBAPP_TIMEOUT_MS"))
        .transpose()?;

    Ok(Config {
        api_base_url,
        init_data,
        mode,
        timeout_ms,
    })
}

/// Validate URL format (basic check)
pub fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl Config {
    pub fn print_summary(&self) {
        eprintln!("tgcatalog configuration:");
        eprintln!("  API base URL: {}", self.api_base_url);
        eprintln!("  Mode: {}", self.mode);
        match self.timeout_ms {
            Some(ms) => eprintln!("  Timeout: {ms}ms"),
            None => eprintln!("  Timeout: none"),
        }
        if self.init_data.is_some() {
            eprintln!("  Init data: configured");
        }
    }
}
