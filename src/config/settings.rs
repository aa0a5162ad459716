use crate::error::{LedgerError, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

static DEFAULT_NODE_ADDR: &str = "127.0.0.1:9674";
const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_CONNECTIONS: usize = 16;

const CONFIG_FILE_KEY: &str = "LEDGER_CONFIG";
const NODE_ADDRESS_KEY: &str = "NODE_ADDRESS";
const READ_TIMEOUT_KEY: &str = "READ_TIMEOUT_SECS";
const MAX_CONNECTIONS_KEY: &str = "MAX_CONNECTIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub node_addr: String,
    pub read_timeout_secs: u64,
    pub max_connections: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            node_addr: String::from(DEFAULT_NODE_ADDR),
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

/// Every key is optional; missing keys keep their current value
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    node_addr: Option<String>,
    read_timeout_secs: Option<u64>,
    max_connections: Option<usize>,
}

impl Settings {
    fn apply_file(&mut self, file: FileSettings) {
        if let Some(addr) = file.node_addr {
            self.node_addr = addr;
        }
        if let Some(secs) = file.read_timeout_secs {
            self.read_timeout_secs = secs;
        }
        if let Some(max) = file.max_connections {
            self.max_connections = max;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(addr) = env::var(NODE_ADDRESS_KEY) {
            self.node_addr = addr;
        }
        if let Ok(raw) = env::var(READ_TIMEOUT_KEY) {
            match raw.parse() {
                Ok(secs) => self.read_timeout_secs = secs,
                Err(e) => warn!("Ignoring {READ_TIMEOUT_KEY}={raw}: {e}"),
            }
        }
        if let Ok(raw) = env::var(MAX_CONNECTIONS_KEY) {
            match raw.parse() {
                Ok(max) => self.max_connections = max,
                Err(e) => warn!("Ignoring {MAX_CONNECTIONS_KEY}={raw}: {e}"),
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.node_addr.trim().is_empty() {
            return Err(LedgerError::Config("node_addr must not be empty".to_string()));
        }
        if self.read_timeout_secs == 0 {
            return Err(LedgerError::Config(
                "read_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(LedgerError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct Config {
    inner: RwLock<Settings>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Defaults, then the TOML file named by `LEDGER_CONFIG`, then environment
    /// overrides. A bad config file is logged and skipped, and settings that
    /// fail validation are replaced by the defaults.
    pub fn new() -> Config {
        let mut settings = Settings::default();

        if let Ok(path) = env::var(CONFIG_FILE_KEY) {
            match read_file_settings(Path::new(&path)) {
                Ok(file) => {
                    info!("Loaded configuration from {path}");
                    settings.apply_file(file);
                }
                Err(e) => warn!("Ignoring config file {path}: {e}"),
            }
        }
        settings.apply_env();

        Config::with_settings(validated_or_default(settings))
    }

    pub fn with_settings(settings: Settings) -> Config {
        Config {
            inner: RwLock::new(settings),
        }
    }

    /// Builds a config from TOML text layered over the defaults
    pub fn from_toml_str(text: &str) -> Result<Config> {
        let mut settings = Settings::default();
        settings.apply_file(toml::from_str(text)?);
        settings.validate()?;
        Ok(Config::with_settings(settings))
    }

    pub fn load_file(path: &Path) -> Result<Config> {
        let mut settings = Settings::default();
        settings.apply_file(read_file_settings(path)?);
        settings.validate()?;
        Ok(Config::with_settings(settings))
    }

    pub fn settings(&self) -> Settings {
        match self.inner.read() {
            Ok(settings) => settings.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn get_node_addr(&self) -> String {
        self.settings().node_addr
    }

    pub fn set_node_addr(&self, addr: String) {
        match self.inner.write() {
            Ok(mut settings) => settings.node_addr = addr,
            Err(_) => log::error!("Failed to acquire write lock on config"),
        }
    }

    pub fn get_read_timeout_secs(&self) -> u64 {
        self.settings().read_timeout_secs
    }

    pub fn get_max_connections(&self) -> usize {
        self.settings().max_connections
    }
}

fn validated_or_default(settings: Settings) -> Settings {
    match settings.validate() {
        Ok(()) => settings,
        Err(e) => {
            warn!("Ignoring configured settings, using defaults: {e}");
            Settings::default()
        }
    }
}

fn read_file_settings(path: &Path) -> Result<FileSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| LedgerError::Config(format!("Failed to read {}: {e}", path.display())))?;
    Ok(toml::from_str(&text)?)
}
