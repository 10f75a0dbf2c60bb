use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::carousel::{Easing, Layout, MAX_REPLICATION, MIN_REPLICATION};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "reel";

pub const KEYS: &[&str] = &[
    "defaults.theme",
    "defaults.item_width",
    "defaults.gap",
    "defaults.velocity",
    "defaults.replication",
    "defaults.step_duration_ms",
    "defaults.easing",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,

    /// Pixels per tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_duration_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `reel config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# reel configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.theme.as_deref())
    }

    /// Configured values layered over [`Layout::default`].
    pub fn layout(&self) -> Layout {
        let mut layout = Layout::default();
        let Some(d) = &self.defaults else {
            return layout;
        };
        if let Some(v) = d.item_width {
            layout.item_width = v;
        }
        if let Some(v) = d.gap {
            layout.gap = v;
        }
        if let Some(v) = d.velocity {
            layout.velocity = v;
        }
        if let Some(v) = d.replication {
            layout.replication = v;
        }
        if let Some(ms) = d.step_duration_ms {
            layout.step_duration = Duration::from_millis(ms);
        }
        if let Some(easing) = d.easing.as_deref() {
            match easing.parse::<Easing>() {
                Ok(e) => layout.easing = e,
                Err(e) => tracing::warn!("ignoring configured easing: {e}"),
            }
        }
        layout
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults_mut().theme = Some(value.to_string());
            }
            "defaults.item_width" => {
                self.defaults_mut().item_width = Some(parse_positive(key, value)?);
            }
            "defaults.gap" => {
                let gap: f64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid {key}: {value}. Must be a number."))?;
                if !gap.is_finite() || gap < 0.0 {
                    anyhow::bail!("Invalid {key}: {value}. Must not be negative.");
                }
                self.defaults_mut().gap = Some(gap);
            }
            "defaults.velocity" => {
                self.defaults_mut().velocity = Some(parse_positive(key, value)?);
            }
            "defaults.replication" => {
                let replication: usize = value.parse().map_err(|_| {
                    anyhow::anyhow!("Invalid {key}: {value}. Must be a whole number.")
                })?;
                if !(MIN_REPLICATION..=MAX_REPLICATION).contains(&replication) {
                    anyhow::bail!(
                        "Invalid {key}: {value}. Must be between {MIN_REPLICATION} and {MAX_REPLICATION}."
                    );
                }
                self.defaults_mut().replication = Some(replication);
            }
            "defaults.step_duration_ms" => {
                let ms: u64 = value.parse().map_err(|_| {
                    anyhow::anyhow!(
                    "Invalid {key}: {value}. Must be a whole number of milliseconds."
                )
                })?;
                if ms == 0 {
                    anyhow::bail!("Invalid {key}: {value}. Must be greater than zero.");
                }
                self.defaults_mut().step_duration_ms = Some(ms);
            }
            "defaults.easing" => {
                value.parse::<Easing>().map_err(|e| anyhow::anyhow!(e))?;
                self.defaults_mut().easing = Some(value.to_string());
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }

    fn defaults_mut(&mut self) -> &mut DefaultsConfig {
        self.defaults.get_or_insert_with(DefaultsConfig::default)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<f64> {
    let n: f64 = value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid {key}: {value}. Must be a number."))?;
    if !n.is_finite() || n <= 0.0 {
        anyhow::bail!("Invalid {key}: {value}. Must be greater than zero.");
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_default_layout() {
        assert_eq!(Config::default().layout(), Layout::default());
    }

    #[test]
    fn test_set_and_layout() {
        let mut config = Config::default();
        config.set("defaults.item_width", "280").unwrap();
        config.set("defaults.gap", "0").unwrap();
        config.set("defaults.velocity", "1.25").unwrap();
        config.set("defaults.replication", "4").unwrap();
        config.set("defaults.step_duration_ms", "350").unwrap();
        config.set("defaults.easing", "ease-in-out").unwrap();
        config.set("defaults.theme", "dark").unwrap();

        let layout = config.layout();
        assert_eq!(layout.item_width, 280.0);
        assert_eq!(layout.gap, 0.0);
        assert_eq!(layout.velocity, 1.25);
        assert_eq!(layout.replication, 4);
        assert_eq!(layout.step_duration, Duration::from_millis(350));
        assert_eq!(layout.easing, Easing::EaseInOut);
        assert_eq!(config.theme(), Some("dark"));
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "sepia").is_err());
        assert!(config.set("defaults.item_width", "0").is_err());
        assert!(config.set("defaults.item_width", "wide").is_err());
        assert!(config.set("defaults.gap", "-4").is_err());
        assert!(config.set("defaults.velocity", "NaN").is_err());
        assert!(config.set("defaults.replication", "2").is_err());
        assert!(config.set("defaults.replication", "65").is_err());
        assert!(
            config
                .set("defaults.replication", &usize::MAX.to_string())
                .is_err()
        );
        assert!(config.set("defaults.step_duration_ms", "0").is_err());
        assert!(config.set("defaults.easing", "bounce").is_err());
        let err = config.set("defaults.speed", "3").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unparseable_easing_in_file_is_ignored() {
        let config: Config = serde_yaml::from_str("defaults:\n  easing: wobble\n").unwrap();
        assert_eq!(config.layout().easing, Easing::EaseOut);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let mut config = Config::default();
        config.set("defaults.velocity", "0.75").unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# reel configuration"));
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_explains() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
