use std::path::PathBuf;

use crate::platform;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "QRNEXUS_DATA_DIR";

/// Default database file name inside the data directory.
pub const DATABASE_FILE: &str = "qrnexus.db";

/// Where the app keeps its files.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
}

impl AppConfig {
    /// Resolves the configuration from the environment, falling back to the
    /// platform data directory.
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(platform::get_data_dir);
        Self::with_data_dir(data_dir)
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            database_file: DATABASE_FILE.to_string(),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}
