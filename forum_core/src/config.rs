use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static DATA_DIR_NAME: &str = "forum_next";
static FORUM_DB_NAME: &str = "forum_db.sqlite";
static CONFIG_FILE_NAME: &str = "config.json";

// Default layout
// data_dir_path
// |- forum_next
//    |- forum_db.sqlite
//    |- config.json

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no data directory on this platform")]
    NoDataDir,
    #[error("config io error")]
    Io(#[from] std::io::Error),
    #[error("malformed config file")]
    Json(#[from] serde_json::Error),
}

fn default_max_connections() -> u32 {
    10
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_owned()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ForumConfig {
    /// sea-orm connection url, e.g. `sqlite:///var/lib/forum/forum_db.sqlite?mode=rwc`.
    pub database_url: String,

    /// Upper bound of the connection pool. Callers wait for a free
    /// connection once it is reached.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl ForumConfig {
    /// Config with the database stored inside `data_dir`.
    pub fn new(data_dir: &Path) -> Self {
        let database_path = data_dir.join(FORUM_DB_NAME);

        ForumConfig {
            database_url: format!("sqlite://{}?mode=rwc", database_path.display()),
            max_connections: default_max_connections(),
            listen_addr: default_listen_addr(),
        }
    }

    /// Throwaway in-memory database, mostly for tests and demos.
    pub fn in_memory() -> Self {
        ForumConfig {
            database_url: "sqlite::memory:".to_owned(),
            max_connections: 1,
            listen_addr: default_listen_addr(),
        }
    }
}

/// Default config location under the platform data directory.
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
    Ok(data_dir.join(DATA_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Reads the config at `config_path`, writing a default one next to it
/// first if it doesn't exist.
pub async fn load_or_init(config_path: &Path) -> Result<ForumConfig, ConfigError> {
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    fs::create_dir_all(&config_dir).await?;

    if fs::try_exists(config_path).await? {
        let mut file = fs::File::open(config_path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;

        let config: ForumConfig = serde_json::from_str(&contents)?;
        Ok(config)
    } else {
        let config = ForumConfig::new(&config_dir);

        let json = serde_json::to_string_pretty(&config)?;
        let mut file = fs::File::create(config_path).await?;
        file.write_all(json.as_bytes()).await?;

        tracing::info!(path = %config_path.display(), "wrote default config");
        Ok(config)
    }
}

/// Gets the existing config or initializes a new one in the default location
pub async fn get_or_init() -> Result<ForumConfig, ConfigError> {
    load_or_init(&default_path()?).await
}
