//! Persisted user settings and their resolution against CLI flags.
//!
//! Flags (and their environment variables, handled by clap) win over
//! stored values, which win over built-in defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use crate::consts::DEFAULT_MIN_LOADING;

/// Settings that can be stored with `meowtivation config set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Endpoint,
    MinLoadingMs,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 2] = [ConfigKey::Endpoint, ConfigKey::MinLoadingMs];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::MinLoadingMs => "min_loading_ms",
        }
    }

    /// Reject values that would fail later at resolution time.
    pub fn validate(&self, value: &str) -> Result<()> {
        match self {
            ConfigKey::Endpoint => Ok(()),
            ConfigKey::MinLoadingMs => {
                value
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{self} must be a whole number of milliseconds"))?;
                Ok(())
            }
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match ConfigKey::ALL.into_iter().find(|k| k.as_str() == s.trim()) {
            Some(key) => Ok(key),
            None => bail!(
                "unknown config key: {s} (expected one of: {})",
                ConfigKey::ALL.map(|k| k.as_str()).join(", ")
            ),
        }
    }
}

/// Persistent key-value settings store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table at `path`.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, key: ConfigKey) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Validate and upsert a value.
    pub fn set(&self, key: ConfigKey, value: &str) -> Result<()> {
        key.validate(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key.as_str(), value.trim()],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: ConfigKey) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key.as_str()])?;
        Ok(())
    }
}

/// Values taken from the command line or environment, before defaults.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub min_loading_ms: Option<u64>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Webhook URL, `None` when unset everywhere.
    pub endpoint: Option<String>,
    pub min_loading: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            min_loading: DEFAULT_MIN_LOADING,
        }
    }
}

impl Settings {
    /// Merge overrides with stored settings and defaults.
    pub fn resolve(overrides: &Overrides, stored: Option<&Config>) -> Result<Self> {
        let stored_endpoint = match stored {
            Some(config) => config.get(ConfigKey::Endpoint)?,
            None => None,
        };
        let stored_min_loading = match stored {
            Some(config) => config.get(ConfigKey::MinLoadingMs)?,
            None => None,
        };

        let endpoint = overrides.endpoint.clone().or(stored_endpoint);

        let min_loading = match (overrides.min_loading_ms, stored_min_loading) {
            (Some(ms), _) => Duration::from_millis(ms),
            (None, Some(raw)) => Duration::from_millis(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("stored {} is not a number: {raw}", ConfigKey::MinLoadingMs))?,
            ),
            (None, None) => DEFAULT_MIN_LOADING,
        };

        Ok(Self {
            endpoint,
            min_loading,
        })
    }
}
