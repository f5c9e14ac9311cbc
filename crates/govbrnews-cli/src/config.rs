//! Configuration for the `govbrnews` binary.
//!
//! Provides [`GovBrNewsConfig`], loaded from TOML files, environment
//! variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `GOVBRNEWS_CONFIG` environment variable
//! 3. XDG default: `~/.config/govbrnews/config.toml`
//! 4. Built-in defaults
//!
//! `GOVBRNEWS_<SECTION>_<KEY>` variables overlay the file, and the plain
//! `TYPESENSE_API_KEY`, `TYPESENSE_HOST`, `TYPESENSE_PORT` and
//! `TYPESENSE_PROTOCOL` variables are applied last.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use confyg::{Confygery, env};
use govbrnews_core::traits::ConfigProvider;
use govbrnews_core::{Error, Result};
use govbrnews_temporal::TemporalConfig;
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix of the structured environment overlay.
pub const ENV_PREFIX: &str = "GOVBRNEWS";

/// Variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GOVBRNEWS_CONFIG";

const MASK: &str = "****";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration of the GovBRNews server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GovBrNewsConfig {
    /// Project name, used for the default config path.
    pub project_name: String,

    /// Search engine connection.
    pub typesense: TypesenseConfig,

    /// Temporal analysis tuning.
    pub temporal: TemporalSettings,

    /// Log output.
    pub logging: LoggingConfig,
}

/// Typesense connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypesenseConfig {
    /// Host name of the node.
    pub host: String,

    /// Port of the node.
    #[serde(deserialize_with = "lenient_number")]
    pub port: u16,

    /// `http` or `https`.
    pub protocol: String,

    /// API key sent with every request.
    pub api_key: String,

    /// Name of the news collection.
    pub collection: String,

    /// Connection timeout in seconds.
    #[serde(deserialize_with = "lenient_number")]
    pub connection_timeout_secs: u64,
}

/// Temporal analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalSettings {
    /// Bucket queries in flight at once.
    #[serde(deserialize_with = "lenient_number")]
    pub max_concurrency: usize,

    /// IANA time zone for calendar boundaries and displayed dates.
    pub timezone: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for GovBrNewsConfig {
    fn default() -> Self {
        Self {
            project_name: "govbrnews".to_string(),
            typesense: TypesenseConfig::default(),
            temporal: TemporalSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for TypesenseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8108,
            protocol: "http".to_string(),
            api_key: String::new(),
            collection: "news".to_string(),
            connection_timeout_secs: 10,
        }
    }
}

impl Default for TemporalSettings {
    fn default() -> Self {
        Self {
            max_concurrency: govbrnews_temporal::aggregator::DEFAULT_MAX_CONCURRENCY,
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl GovBrNewsConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file or an environment value cannot be parsed.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        env_opts.add_section("typesense");
        env_opts.add_section("temporal");
        env_opts.add_section("logging");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let mut config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        config.apply_typesense_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlays the `TYPESENSE_*` variables returned by `lookup`.
    ///
    /// # Errors
    ///
    /// Fails when `TYPESENSE_PORT` is not a port number.
    pub fn apply_typesense_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("TYPESENSE_API_KEY") {
            self.typesense.api_key = key;
        }
        if let Some(host) = lookup("TYPESENSE_HOST") {
            self.typesense.host = host;
        }
        if let Some(port) = lookup("TYPESENSE_PORT") {
            self.typesense.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("TYPESENSE_PORT is not a port: {port}")))?;
        }
        if let Some(protocol) = lookup("TYPESENSE_PROTOCOL") {
            self.typesense.protocol = protocol;
        }
        Ok(())
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        resolve_path(explicit, std::env::var(CONFIG_ENV_VAR).ok())
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("govbrnews").join("config.toml"))
    }

    /// Builds the aggregator tuning from the `[temporal]` section.
    ///
    /// # Errors
    ///
    /// Fails on an unknown time zone name.
    pub fn temporal_config(&self) -> Result<TemporalConfig> {
        let timezone: Tz = self.temporal.timezone.parse().map_err(|_| {
            Error::config(format!("Unknown time zone: {}", self.temporal.timezone))
        })?;
        Ok(TemporalConfig {
            timezone,
            max_concurrency: self.temporal.max_concurrency.max(1),
        })
    }

    /// A copy with the API key masked, for display.
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        copy.typesense.api_key = mask_secret(&self.typesense.api_key);
        copy
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `GOVBRNEWS_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

fn resolve_path(explicit: Option<&str>, from_env: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }
    if let Some(path) = from_env.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    GovBrNewsConfig::default_config_path()
}

/// Masks all but the last four characters of a secret.
///
/// Short secrets are masked entirely; an empty secret stays empty.
pub fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len == 0 {
        String::new()
    } else if len <= 8 {
        MASK.to_string()
    } else {
        let tail: String = secret.chars().skip(len - 4).collect();
        format!("{MASK}{tail}")
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for GovBrNewsConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn typesense_url(&self) -> Result<String> {
        let ts = &self.typesense;
        if ts.host.trim().is_empty() {
            return Err(Error::config("typesense.host is empty"));
        }
        match ts.protocol.as_str() {
            "http" | "https" => Ok(format!("{}://{}:{}", ts.protocol, ts.host, ts.port)),
            other => Err(Error::config(format!(
                "typesense.protocol must be http or https, got '{other}'"
            ))),
        }
    }

    fn api_key(&self) -> Result<String> {
        if self.typesense.api_key.is_empty() {
            Err(Error::config(
                "Typesense API key not configured (set TYPESENSE_API_KEY or typesense.api_key)",
            ))
        } else {
            Ok(self.typesense.api_key.clone())
        }
    }

    fn collection(&self) -> &str {
        &self.typesense.collection
    }

    fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.typesense.connection_timeout_secs)
    }
}

// ============================================================================
// Helpers
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(u64),
    Text(String),
}

/// Accepts a number or a numeric string; environment overlays carry strings.
fn lenient_number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    use serde::de::Error as _;

    let raw = match Lenient::deserialize(deserializer)? {
        Lenient::Number(n) => n,
        Lenient::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("expected a number, got '{s}'")))?,
    };
    T::try_from(raw).map_err(|_| D::Error::custom(format!("number out of range: {raw}")))
}

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
