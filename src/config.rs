use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::glyphs::{self, GlyphTable};

/// User configuration, read from a JSON file.
///
/// Keys starting with `//` are comments. Unknown keys are ignored and missing
/// keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debug_mode: bool,
    pub default_frequency: i64,
    pub default_beeps: i64,
    pub default_duration: i64,
    pub default_gap: i64,
    pub default_silent: bool,
    pub default_loop: bool,
    pub default_metric: bool,
    pub desktop_notification: bool,
    pub enable_no_args_default: bool,
    pub no_args_default_command: String,
    pub enable_time_only_defaults: bool,
    pub time_only_default_flags: Vec<String>,
    /// Raw glyph entries; each is checked on its own by [`Config::glyphs`].
    pub ascii_digits: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug_mode: false,
            default_frequency: 800,
            default_beeps: 3,
            default_duration: 1000,
            default_gap: 300,
            default_silent: false,
            default_loop: false,
            default_metric: false,
            desktop_notification: false,
            enable_no_args_default: false,
            no_args_default_command: "help".to_string(),
            enable_time_only_defaults: false,
            time_only_default_flags: Vec::new(),
            ascii_digits: Map::new(),
        }
    }
}

/// Outcome of [`Config::load_from`]. Problems are reported, never fatal.
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    pub warning: Option<ConfigError>,
    pub created: bool,
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("countdown")
            .join("config.json")
    }

    /// Reads `path`, writing a commented template first if it does not exist.
    /// Any failure leaves the built-in defaults in place.
    pub fn load_from(path: &Path) -> Loaded {
        if !path.exists() {
            let warning = write_template(path).err();
            return Loaded {
                config: Config::default(),
                created: warning.is_none(),
                warning,
            };
        }
        match Self::read(path) {
            Ok(config) => Loaded { config, warning: None, created: false },
            Err(e) => Loaded {
                config: Config::default(),
                warning: Some(e),
                created: false,
            },
        }
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn glyphs(&self) -> GlyphTable {
        GlyphTable::with_overrides(&self.ascii_digits)
    }

    /// The first-run file: every setting at its default, each preceded by a
    /// `//` comment key, followed by the full built-in glyph table.
    pub fn template() -> Value {
        let d = Config::default();
        let mut map = Map::new();
        map.insert(
            "//".to_string(),
            json!("countdown configuration. Keys starting with // are comments."),
        );
        entry(&mut map, "debug_mode", "Write debug logs to the local data directory", json!(d.debug_mode));
        entry(&mut map, "default_frequency", "Beep frequency in Hz (37-32767)", json!(d.default_frequency));
        entry(&mut map, "default_beeps", "Number of beeps when the countdown ends", json!(d.default_beeps));
        entry(&mut map, "default_duration", "Length of each beep in milliseconds", json!(d.default_duration));
        entry(&mut map, "default_gap", "Pause between beeps in milliseconds", json!(d.default_gap));
        entry(&mut map, "default_silent", "Never beep", json!(d.default_silent));
        entry(&mut map, "default_loop", "Restart the countdown when it ends", json!(d.default_loop));
        entry(&mut map, "default_metric", "Display metric time (100s per minute, 100m per hour)", json!(d.default_metric));
        entry(&mut map, "desktop_notification", "Also send a desktop notification when time is up", json!(d.desktop_notification));
        entry(&mut map, "enable_no_args_default", "Run no_args_default_command when started without arguments", json!(d.enable_no_args_default));
        entry(&mut map, "no_args_default_command", "Arguments to use without arguments, e.g. \"10m -l\"; \"help\" shows help", json!(d.no_args_default_command));
        entry(&mut map, "enable_time_only_defaults", "Append time_only_default_flags when only a time is given", json!(d.enable_time_only_defaults));
        entry(&mut map, "time_only_default_flags", "Flags appended to a bare time, e.g. [\"-l\", \"-s\"]", json!(d.time_only_default_flags));
        entry(&mut map, "ascii_digits", "Glyphs for 0-9 and ':', exactly 8 rows of equal width each", json!(glyphs::builtin_entries()));
        Value::Object(map)
    }
}

fn entry(map: &mut Map<String, Value>, key: &str, comment: &str, value: Value) {
    map.insert(format!("// {key}"), Value::String(comment.to_string()));
    map.insert(key.to_string(), value);
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let text = serde_json::to_string_pretty(&Config::template())
        .map_err(|e| write_err(std::io::Error::other(e)))?;
    std::fs::write(path, text + "\n").map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.default_frequency, 800);
        assert_eq!(config.default_beeps, 3);
        assert_eq!(config.default_duration, 1000);
        assert_eq!(config.default_gap, 300);
        assert_eq!(config.no_args_default_command, "help");
        assert!(!config.enable_no_args_default);
        assert!(!config.enable_time_only_defaults);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: Config = serde_json::from_str(r#"{"default_beeps": 5, "default_loop": true}"#).unwrap();
        assert_eq!(config.default_beeps, 5);
        assert!(config.default_loop);
        assert_eq!(config.default_frequency, 800);
    }

    #[test]
    fn comment_and_unknown_keys_are_ignored() {
        let json = r#"{
            "// default_gap": "pause between beeps",
            "default_gap": 100,
            "colour": "red"
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_gap, 100);
    }

    #[test]
    fn time_only_flags_parse_as_list() {
        let json = r#"{"enable_time_only_defaults": true, "time_only_default_flags": ["-l", "-s"]}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.time_only_default_flags, vec!["-l", "-s"]);
    }

    #[test]
    fn missing_file_creates_template_and_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countdown").join("config.json");

        let loaded = Config::load_from(&path);
        assert!(loaded.created);
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.config, Config::default());
        assert!(path.exists());

        let reread = Config::read(&path).unwrap();
        assert_eq!(reread.default_frequency, 800);
        assert_eq!(reread.glyphs(), GlyphTable::default());
    }

    #[test]
    fn template_round_trips_to_defaults() {
        let config: Config = serde_json::from_value(Config::template()).unwrap();
        let expected = Config {
            ascii_digits: config.ascii_digits.clone(),
            ..Config::default()
        };
        assert_eq!(config, expected);
        assert_eq!(config.ascii_digits.len(), 11);
    }

    #[test]
    fn template_comments_precede_their_keys() {
        let template = Config::template();
        let keys: Vec<&String> = template.as_object().unwrap().keys().collect();
        let pos = |k: &str| keys.iter().position(|key| *key == k).unwrap();
        assert_eq!(pos("// default_gap") + 1, pos("default_gap"));
        assert_eq!(pos("// ascii_digits") + 1, pos("ascii_digits"));
    }

    #[test]
    fn malformed_json_falls_back_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = Config::load_from(&path);
        assert!(matches!(loaded.warning, Some(ConfigError::Parse { .. })));
        assert!(!loaded.created);
        assert_eq!(loaded.config, Config::default());
    }

    #[test]
    fn wrong_type_falls_back_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_beeps": "three"}"#).unwrap();

        let loaded = Config::load_from(&path);
        assert!(loaded.warning.is_some());
        assert_eq!(loaded.config.default_beeps, 3);
    }

    #[test]
    fn bad_glyph_entry_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_beeps": 5, "ascii_digits": {"1": "not-a-list"}}"#).unwrap();

        let loaded = Config::load_from(&path);
        assert!(loaded.warning.is_none());
        assert_eq!(loaded.config.default_beeps, 5);
        assert_eq!(loaded.config.glyphs(), GlyphTable::default());
    }

    #[test]
    fn existing_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"default_silent": true}"#).unwrap();

        let loaded = Config::load_from(&path);
        assert!(loaded.warning.is_none());
        assert!(loaded.config.default_silent);
    }

    #[test]
    fn config_path_ends_with_expected() {
        assert!(Config::config_path().ends_with("countdown/config.json"));
    }
}
