/// Config file loading and creation for the suparank CLI.
///
/// Config lives at ~/.config/suparank/config.toml.
/// All fields are optional; CLI args and env vars override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

/// Environment variable that overrides the configured data directory.
pub const DATA_DIR_ENV: &str = "SUPARANK_DATA_DIR";

#[derive(Deserialize, Default, Debug, PartialEq)]
pub struct SuparankConfig {
    pub data_dir: Option<String>,
    pub json: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# suparank configuration
# All values here can be overridden by CLI flags.

# Where items and ranking sessions are stored.
# Also settable with the SUPARANK_DATA_DIR environment variable.
# data_dir = \"~/.local/share/suparank\"

# Print JSON instead of tables by default
# json = false
";

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home)
}

/// Returns the default config path: ~/.config/suparank/config.toml
pub fn config_path() -> PathBuf {
    home_dir().join(".config").join("suparank").join("config.toml")
}

/// Returns the default data directory: ~/.local/share/suparank
pub fn default_data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("suparank")
}

/// Expand a leading `~/` against `home`.
fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Pick the data directory: CLI flag > env var > config file > default.
pub fn resolve_data_dir(
    flag: Option<PathBuf>,
    env: Option<String>,
    cfg: &SuparankConfig,
) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Some(dir) = env.filter(|d| !d.trim().is_empty()) {
        return PathBuf::from(dir);
    }
    match cfg.data_dir {
        Some(ref dir) => expand_home(dir, &home_dir()),
        None => default_data_dir(),
    }
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> SuparankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => SuparankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

fn parse_config(content: &str) -> Result<SuparankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            bail(format!("Failed to create directory {}: {e}", parent.display()))
        });
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_empty_config() {
        assert_eq!(parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap(), SuparankConfig::default());
    }

    #[test]
    fn test_parse_config_fields() {
        let cfg = parse_config("data_dir = \"/tmp/ranks\"\njson = true\n").unwrap();
        assert_eq!(cfg.data_dir.as_deref(), Some("/tmp/ranks"));
        assert_eq!(cfg.json, Some(true));
    }

    #[test]
    fn test_parse_config_rejects_wrong_types() {
        assert!(parse_config("json = \"yes\"").is_err());
    }

    #[test]
    fn test_data_dir_precedence() {
        let cfg = SuparankConfig {
            data_dir: Some("/from/config".to_string()),
            json: None,
        };
        assert_eq!(
            resolve_data_dir(Some(PathBuf::from("/from/flag")), Some("/from/env".into()), &cfg),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            resolve_data_dir(None, Some("/from/env".into()), &cfg),
            PathBuf::from("/from/env")
        );
        assert_eq!(resolve_data_dir(None, None, &cfg), PathBuf::from("/from/config"));
        assert_eq!(
            resolve_data_dir(None, Some("  ".into()), &cfg),
            PathBuf::from("/from/config")
        );
    }

    #[test]
    fn test_expand_home() {
        let home = Path::new("/home/ana");
        assert_eq!(expand_home("~/ranks", home), PathBuf::from("/home/ana/ranks"));
        assert_eq!(expand_home("/abs/ranks", home), PathBuf::from("/abs/ranks"));
    }

    #[test]
    fn test_create_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        create_default_config(&path);
        assert_eq!(load_config(&path), SuparankConfig::default());
    }
}
