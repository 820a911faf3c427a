use figment::{Figment, providers::{Env, Format, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

/// Where ingested records are appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Unset → `logs/` two levels above the executable's directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

// ── Defaults ──────────────────────────────────────────────────

fn default_addr() -> String { "0.0.0.0:5000".into() }
fn default_file_name() -> String { "microservices.log".into() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            file_name: default_file_name(),
        }
    }
}

// ── Impls ─────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from YAML file + env overrides.
    ///
    /// Env vars use the `CENTRALLOG_` prefix and `__` between sections,
    /// e.g. `CENTRALLOG_STORAGE__LOG_DIR=/var/log/central`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: ServiceConfig = Self::figment(path).extract()?;
        Ok(config)
    }

    /// Defaults overlaid with env overrides only.
    pub fn from_env() -> anyhow::Result<Self> {
        let config: ServiceConfig = Figment::new().merge(env_provider()).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(env_provider())
    }

    /// Directory holding the log file.
    pub fn log_dir(&self) -> PathBuf {
        match &self.storage.log_dir {
            Some(dir) => dir.clone(),
            None => default_log_dir(),
        }
    }

    /// Full path of the shared log file.
    pub fn log_file_path(&self) -> PathBuf {
        self.log_dir().join(&self.storage.file_name)
    }
}

fn env_provider() -> Env {
    Env::prefixed("CENTRALLOG_").split("__")
}

fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.parent()
                .and_then(Path::parent)
                .and_then(Path::parent)
                .map(|root| root.join("logs"))
        })
        .unwrap_or_else(|| PathBuf::from("logs"))
}
