//! Runtime configuration.
//!
//! Server settings layer built-in defaults, the optional TOML file and
//! `IDM_CONNECT_*` environment variables (highest precedence). The lookup
//! proxy is configured separately from `IDM_URL` and `IDM_TOKEN`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use idm_lookup::LookupConfig;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_STORE_PATH: &str = "~/.local/share/idm-connect/contracts.db";

/// Listener and storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path: PathBuf,
}

/// Read [`ServerConfig`] from `path` (if it exists) and the environment.
pub fn load_server_config(path: &Path) -> anyhow::Result<ServerConfig> {
  server_config_from(config::File::from(path).required(false))
}

fn server_config_from<T>(file: T) -> anyhow::Result<ServerConfig>
where
  T: config::Source + Send + Sync + 'static,
{
  config::Config::builder()
    .set_default("host", DEFAULT_HOST)?
    .set_default("port", i64::from(DEFAULT_PORT))?
    .set_default("store_path", DEFAULT_STORE_PATH)?
    .add_source(file)
    .add_source(config::Environment::with_prefix("IDM_CONNECT"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Read [`LookupConfig`] from `IDM_URL` / `IDM_TOKEN`. Both may be absent.
pub fn load_lookup_config() -> anyhow::Result<LookupConfig> {
  lookup_config_from(config::Environment::with_prefix("IDM"))
}

fn lookup_config_from<T>(env: T) -> anyhow::Result<LookupConfig>
where
  T: config::Source + Send + Sync + 'static,
{
  config::Config::builder()
    .add_source(env)
    .build()
    .context("failed to read IDM environment")?
    .try_deserialize()
    .context("failed to deserialise LookupConfig")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
