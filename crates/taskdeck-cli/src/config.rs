use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use taskdeck_core::RemovalTiming;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "taskdeck.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub delete_delay_ms: u64,
    pub stagger_step_ms: u64,
    pub log: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delete_delay_ms: 400,
            stagger_step_ms: 300,
            log: "info".into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },
}

impl Settings {
    pub fn timing(&self) -> RemovalTiming {
        RemovalTiming::new(
            Duration::from_millis(self.delete_delay_ms),
            Duration::from_millis(self.stagger_step_ms),
        )
    }

    /// Overlay `TASKDECK__*` variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TASKDECK__DELETE_DELAY_MS") {
            self.delete_delay_ms = parse_ms("TASKDECK__DELETE_DELAY_MS", v)?;
        }
        if let Some(v) = lookup("TASKDECK__STAGGER_STEP_MS") {
            self.stagger_step_ms = parse_ms("TASKDECK__STAGGER_STEP_MS", v)?;
        }
        if let Some(v) = lookup("TASKDECK__LOG") {
            self.log = v;
        }
        Ok(())
    }
}

fn parse_ms(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

/// File first, then environment.
///
/// A missing `taskdeck.toml` in the working directory is fine; a missing file
/// named with `--config` is an error.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = explicit.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound && explicit.is_none() => Settings::default(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = env::temp_dir().join(format!("taskdeck_config_{name}_{suffix}"));
        fs::create_dir_all(&dir).expect("temp dir");
        dir
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str("delete_delay_ms = 250").unwrap();
        assert_eq!(settings.delete_delay_ms, 250);
        assert_eq!(settings.stagger_step_ms, 300);
        assert_eq!(settings.log, "info");
    }

    #[test]
    fn env_overrides_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TASKDECK__STAGGER_STEP_MS", " 120 "),
            ("TASKDECK__LOG", "taskdeck_core=debug"),
        ]);
        let mut settings = Settings::default();

        settings
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.delete_delay_ms, 400);
        assert_eq!(settings.stagger_step_ms, 120);
        assert_eq!(settings.log, "taskdeck_core=debug");
    }

    #[test]
    fn bad_env_value_is_reported() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(|key| (key == "TASKDECK__DELETE_DELAY_MS").then(|| "soon".to_string()))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidEnv { key: "TASKDECK__DELETE_DELAY_MS", ref value } if value == "soon"
        ));
    }

    #[test]
    fn timing_uses_milliseconds() {
        let settings = Settings {
            delete_delay_ms: 50,
            stagger_step_ms: 20,
            ..Settings::default()
        };
        assert_eq!(
            settings.timing(),
            RemovalTiming::new(Duration::from_millis(50), Duration::from_millis(20))
        );
    }

    #[test]
    fn loads_explicit_file() {
        let dir = temp_dir("explicit");
        let path = dir.join("custom.toml");
        fs::write(&path, "delete_delay_ms = 10\nstagger_step_ms = 5\n").expect("write");

        let settings = load_settings(Some(path.as_path())).expect("load");
        assert_eq!(settings.delete_delay_ms, 10);
        assert_eq!(settings.stagger_step_ms, 5);

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = temp_dir("missing");
        let err = load_settings(Some(dir.join("nope.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));

        fs::remove_dir_all(dir).expect("cleanup");
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = temp_dir("malformed");
        let path = dir.join("broken.toml");
        fs::write(&path, "delete_delay_ms = \"slow\"").expect("write");

        let err = load_settings(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        fs::remove_dir_all(dir).expect("cleanup");
    }
}
