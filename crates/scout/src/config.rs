use std::{
    fs::{create_dir_all, read_to_string, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use scout_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, Level};

use crate::{
    cli::DaemonCmdOpts,
    purge::{DEFAULT_SCOUT_URL, DEFAULT_TIMEOUT_MS},
    queue::DEFAULT_NOTICE_KEY,
};

pub const DEFAULT_SCOUT_PATH: &str = ".scout";
pub const DEFAULT_SCOUT_CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_ROLES_HEADER: &str = "x-scout-roles";

pub fn default_config_path() -> Result<PathBuf> {
    Ok(home_dir()?
        .join(DEFAULT_SCOUT_PATH)
        .join(DEFAULT_SCOUT_CONFIG_FILE))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Couldn't determine home directory")
}

pub fn init_config(path: &Path) -> Result<()> {
    if !path.exists() {
        info!("Create config at: {path:?}");
        let parent_dir = path
            .parent()
            .with_context(|| format!("Couldn't get parent dir from: {path:?}"))?;
        create_dir_all(parent_dir)?;
        let scout_config = ScoutConfig::default();
        let mut file = File::create(path)?;
        let toml = toml::to_string(&scout_config)?;
        file.write_all(toml.as_bytes())?;
    }
    Ok(())
}

pub fn load_config(path: &Path) -> Result<ScoutConfig> {
    info!("Load config at: {:?}", path);
    let toml = read_to_string(path).with_context(|| format!("Could not read config: {path:?}"))?;
    toml::from_str(&toml).context("Failed to deserialize")
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoutConfig {
    pub log_level: String,
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub telemetry: TelemetryOptions,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    pub port: u16,
    /// Request header the host platform fills with the actor's roles.
    pub roles_header: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub option_key: String,
}

/// Which log layers the daemon installs.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TelemetryOptions {
    pub json_log: bool,
    pub tree_trace: bool,
    pub chrome_trace: bool,
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ScoutConfig {
    fn default() -> Self {
        let scout_dir = dirs::home_dir()
            .unwrap_or_default()
            .join(DEFAULT_SCOUT_PATH);
        Self {
            log_level: "INFO".into(),
            server: ServerConfig {
                addr: "127.0.0.1".into(),
                port: 8881,
                roles_header: DEFAULT_ROLES_HEADER.into(),
            },
            remote: RemoteConfig {
                base_url: DEFAULT_SCOUT_URL.into(),
                timeout_ms: DEFAULT_TIMEOUT_MS, // 2s
            },
            store: StoreConfig {
                path: scout_dir.join("options.json"),
                option_key: DEFAULT_NOTICE_KEY.into(),
            },
            telemetry: TelemetryOptions::default(),
        }
    }
}

impl ScoutConfig {
    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig::new("scout")
            .with_log_level(&self.log_level)
            .with_json_log(self.telemetry.json_log)
            .with_tree_trace(self.telemetry.tree_trace)
            .with_chrome_trace(self.telemetry.chrome_trace)
    }

    pub fn merge_log_level(&mut self, log_level: Option<Level>) {
        if let Some(log_level) = log_level {
            self.log_level = log_level.to_string();
        }
    }

    pub fn merge_daemon_opts(&mut self, config: DaemonCmdOpts) {
        if let Some(addr) = config.addr {
            self.server.addr = addr;
        }
        if let Some(port) = config.port {
            self.server.port = port;
        }
        if let Some(base_url) = config.base_url {
            self.remote.base_url = base_url;
        }
        if let Some(timeout_ms) = config.timeout_ms {
            self.remote.timeout_ms = timeout_ms;
        }
        if let Some(store_path) = config.store_path {
            self.store.path = store_path;
        }
    }
}
