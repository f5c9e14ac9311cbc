//! Handler functions for config CLI commands.
//!
//! Implements `govbrnews config {path,get,set,init,export}` and the TOML
//! dotted-key helpers behind them.

use std::path::PathBuf;

use govbrnews_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::{GovBrNewsConfig, mask_secret};

const SECRET_KEY: &str = "typesense.api_key";

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
///
/// Receives the raw `--config` path (not a loaded config) because some
/// commands (path, init) work before a config file exists.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => {
            println!("{}", cmd_config_get(config_path, &key)?);
            Ok(())
        }
        ConfigAction::Set { key, value } => cmd_config_set(config_path, &key, &value),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
        ConfigAction::Export {
            docker_env,
            reveal_secrets,
        } => {
            let config = GovBrNewsConfig::load(config_path)?;
            for line in export_lines(&config, docker_env, reveal_secrets)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    match GovBrNewsConfig::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file does not exist; run `govbrnews config init` to create it)");
            }
            Ok(())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Resolves a dotted key against the loaded configuration, API key masked.
fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<String> {
    let config = GovBrNewsConfig::load(config_path)?.masked();
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

fn cmd_config_set(config_path: Option<&str>, key: &str, value: &str) -> Result<()> {
    let path = GovBrNewsConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;

    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `govbrnews config init` first.",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let mut doc: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;

    set_nested_value(&mut doc, key, parse_value(value))?;
    doc.clone()
        .try_into::<GovBrNewsConfig>()
        .map_err(|e| Error::config(format!("Invalid value for {key}: {e}")))?;

    let toml_str = toml::to_string_pretty(&doc).map_err(|e| Error::config(e.to_string()))?;
    std::fs::write(&path, toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    let shown = if key == SECRET_KEY {
        mask_secret(value)
    } else {
        value.to_string()
    };
    println!("Set {key} = {shown} in {}", path.display());
    Ok(())
}

fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => GovBrNewsConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = GovBrNewsConfig::default().to_toml_string()?;
    std::fs::write(&path, &toml_str).map_err(|e| Error::io_with_path(e, &path))?;

    println!("Config file created at {}", path.display());
    Ok(())
}

fn export_lines(
    config: &GovBrNewsConfig,
    docker_env: bool,
    reveal_secrets: bool,
) -> Result<Vec<String>> {
    let vars = if reveal_secrets {
        config.to_env_vars()?
    } else {
        config.masked().to_env_vars()?
    };
    Ok(vars
        .iter()
        .map(|(key, value)| {
            if docker_env {
                format!("-e {key}={value}")
            } else {
                format!("{key}={value}")
            }
        })
        .collect())
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    let mut current = value;
    for part in key.split('.') {
        current = current.as_table()?.get(part)?;
    }
    Some(current)
}

/// Set a value at a dotted key path, creating intermediate tables as needed.
fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let (parents, leaf) = match key.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        return Err(Error::config("Empty key path"));
    }

    let mut current = root;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        let table = current
            .as_table_mut()
            .ok_or_else(|| Error::config("Cannot navigate into a non-table value"))?;
        current = table
            .entry(part.to_string())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }

    let table = current
        .as_table_mut()
        .ok_or_else(|| Error::config("Cannot set key on a non-table value"))?;
    table.insert(leaf.to_string(), value);
    Ok(())
}

/// Parse a string value into a TOML value, auto-detecting the type.
///
/// Priority: bool → integer → float → string.
fn parse_value(s: &str) -> toml::Value {
    match s {
        "true" => return toml::Value::Boolean(true),
        "false" => return toml::Value::Boolean(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(s.to_string())
}

/// Format a TOML value for display on stdout.
fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, config: &GovBrNewsConfig) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        path
    }

    fn keyed_config() -> GovBrNewsConfig {
        let mut config = GovBrNewsConfig::default();
        config.typesense.api_key = "abcdefghijkl".into();
        config
    }

    // ------------------------------------------------------------------------
    // cmd_config_path tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_path_explicit() {
        assert!(cmd_config_path(Some("/explicit/config.toml")).is_ok());
    }

    // ------------------------------------------------------------------------
    // cmd_config_get tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_get_nested_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, &GovBrNewsConfig::default());
        let value = cmd_config_get(Some(path.to_str().unwrap()), "temporal.timezone").unwrap();
        assert_eq!(value, "America/Sao_Paulo");
    }

    #[test]
    fn test_cmd_config_get_masks_api_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, &keyed_config());
        let value = cmd_config_get(Some(path.to_str().unwrap()), SECRET_KEY).unwrap();
        assert!(value.starts_with("****"));
        assert!(!value.contains("abcdefgh"));

        let section = cmd_config_get(Some(path.to_str().unwrap()), "typesense").unwrap();
        assert!(section.contains("host"));
        assert!(!section.contains("abcdefgh"));
    }

    #[test]
    fn test_cmd_config_get_missing_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, &GovBrNewsConfig::default());
        let err = cmd_config_get(Some(path.to_str().unwrap()), "server.port").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    // ------------------------------------------------------------------------
    // cmd_config_set tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_set_nested_key() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, &GovBrNewsConfig::default());

        cmd_config_set(Some(path.to_str().unwrap()), "typesense.port", "8109").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let config: GovBrNewsConfig = toml::from_str(&content).unwrap();
        assert_eq!(config.typesense.port, 8109);
    }

    #[test]
    fn test_cmd_config_set_rejects_bad_type() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(&dir, &GovBrNewsConfig::default());
        let before = std::fs::read_to_string(&path).unwrap();

        let err =
            cmd_config_set(Some(path.to_str().unwrap()), "typesense.port", "not-a-port").unwrap_err();
        assert!(err.to_string().contains("typesense.port"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_cmd_config_set_missing_file() {
        let err = cmd_config_set(Some("/nonexistent/config.toml"), "typesense.host", "x")
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    // ------------------------------------------------------------------------
    // cmd_config_init tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_cmd_config_init_creates_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("govbrnews").join("config.toml");

        cmd_config_init(Some(path.to_str().unwrap()), false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[typesense]"));
        assert!(content.contains("[temporal]"));
    }

    #[test]
    fn test_cmd_config_init_no_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").unwrap();

        let err = cmd_config_init(Some(path.to_str().unwrap()), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        cmd_config_init(Some(path.to_str().unwrap()), true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[logging]"));
    }

    // ------------------------------------------------------------------------
    // export tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_export_masks_by_default() {
        let lines = export_lines(&keyed_config(), false, false).unwrap();
        assert!(lines.contains(&"GOVBRNEWS_TYPESENSE_API_KEY=****ijkl".to_string()));
        assert!(lines.contains(&"GOVBRNEWS_TYPESENSE_HOST=localhost".to_string()));
    }

    #[test]
    fn test_export_docker_reveal() {
        let lines = export_lines(&keyed_config(), true, true).unwrap();
        assert!(lines.contains(&"-e GOVBRNEWS_TYPESENSE_API_KEY=abcdefghijkl".to_string()));
        assert!(lines.iter().all(|l| l.starts_with("-e GOVBRNEWS_")));
    }

    // ------------------------------------------------------------------------
    // Dotted-key helpers
    // ------------------------------------------------------------------------

    #[test]
    fn test_get_nested_value() {
        let val: toml::Value = toml::from_str("[typesense]\nport = 8108").unwrap();
        assert_eq!(
            get_nested_value(&val, "typesense.port"),
            Some(&toml::Value::Integer(8108))
        );
        assert!(get_nested_value(&val, "typesense.host").is_none());
        assert!(get_nested_value(&val, "typesense.port.x").is_none());
    }

    #[test]
    fn test_set_nested_value_creates_section() {
        let mut val = toml::Value::Table(toml::map::Map::new());
        set_nested_value(&mut val, "logging.level", toml::Value::String("debug".into())).unwrap();
        assert_eq!(
            get_nested_value(&val, "logging.level"),
            Some(&toml::Value::String("debug".into()))
        );
    }

    #[test]
    fn test_set_nested_value_top_level_and_errors() {
        let mut val: toml::Value = toml::from_str("project_name = \"a\"").unwrap();
        set_nested_value(&mut val, "project_name", toml::Value::String("b".into())).unwrap();
        assert_eq!(
            get_nested_value(&val, "project_name"),
            Some(&toml::Value::String("b".into()))
        );
        assert!(set_nested_value(&mut val, "project_name.x", toml::Value::Integer(1)).is_err());
        assert!(set_nested_value(&mut val, "logging.", toml::Value::Integer(1)).is_err());
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("true"), toml::Value::Boolean(true));
        assert_eq!(parse_value("8108"), toml::Value::Integer(8108));
        assert_eq!(parse_value("0.5"), toml::Value::Float(0.5));
        assert_eq!(
            parse_value("America/Manaus"),
            toml::Value::String("America/Manaus".to_string())
        );
    }

    #[test]
    fn test_format_toml_value() {
        assert_eq!(format_toml_value(&toml::Value::String("http".into())), "http");
        assert_eq!(format_toml_value(&toml::Value::Integer(4)), "4");
        assert_eq!(format_toml_value(&toml::Value::Boolean(false)), "false");
    }
}
