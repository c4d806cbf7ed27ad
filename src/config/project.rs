use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::ConfigData;
use crate::error::ConfigError;

pub const KEYS: &[&str] = &[
    "preview.renderer",
    "preview.delete_marker",
    "preview.add_marker",
    "preview.remove_marker",
    "persist.atomic",
    "persist.check_conflicts",
    "proposal.strip_fences",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub data: ConfigData,
    pub path: PathBuf,
}

impl Config {
    /// Project config, then the user config directory, then defaults.
    pub fn load_or_default(project_root: impl AsRef<Path>) -> Result<Self> {
        let project_path = project_root.as_ref().join(".redline").join("config.toml");

        let source = if project_path.exists() {
            Some(project_path.clone())
        } else {
            Self::user_config_path().filter(|path| path.exists())
        };

        let data = match &source {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                let content = fs::read_to_string(path).context("Failed to read config file")?;
                toml::from_str(&content).context("Failed to parse config file")?
            }
            None => ConfigData::default(),
        };

        Ok(Self {
            data,
            path: project_path,
        })
    }

    pub fn init(project_root: impl AsRef<Path>) -> Result<()> {
        let redline_dir = project_root.as_ref().join(".redline");
        fs::create_dir_all(&redline_dir).context("Failed to create .redline directory")?;

        let gitignore_path = redline_dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(&gitignore_path, "cache.toml\n").context("Failed to create .gitignore")?;
        }

        let config_path = redline_dir.join("config.toml");
        if !config_path.exists() {
            let initial_config = ConfigData::default();
            let content = toml::to_string_pretty(&initial_config)
                .context("Failed to serialize initial config")?;
            fs::write(&config_path, content).context("Failed to write initial config")?;
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.data).context("Failed to serialize config")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&self.path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let data = &mut self.data;
        match key {
            "preview.renderer" => data.preview.renderer = value.parse()?,
            "preview.delete_marker" => data.preview.delete_marker = value.to_string(),
            "preview.add_marker" => data.preview.add_marker = value.to_string(),
            "preview.remove_marker" => data.preview.remove_marker = value.to_string(),
            "persist.atomic" => data.persist.atomic = parse_bool(key, value)?,
            "persist.check_conflicts" => data.persist.check_conflicts = parse_bool(key, value)?,
            "proposal.strip_fences" => data.proposal.strip_fences = parse_bool(key, value)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into())
            }
        }

        self.save()?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        let data = &self.data;
        let value = match key {
            "preview.renderer" => data.preview.renderer.to_string(),
            "preview.delete_marker" => data.preview.delete_marker.clone(),
            "preview.add_marker" => data.preview.add_marker.clone(),
            "preview.remove_marker" => data.preview.remove_marker.clone(),
            "persist.atomic" => data.persist.atomic.to_string(),
            "persist.check_conflicts" => data.persist.check_conflicts.to_string(),
            "proposal.strip_fences" => data.proposal.strip_fences.to_string(),
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                }
                .into())
            }
        };

        Ok(value)
    }

    pub fn list(&self) -> Result<Vec<(&'static str, String)>> {
        KEYS.iter()
            .map(|key| Ok((*key, self.get(key)?)))
            .collect()
    }

    fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "redline", "redline")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field: key.to_string(),
        value: value.to_string(),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: ConfigData::default(),
            path: PathBuf::from(".redline/config.toml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererKind;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        Config::init(temp_dir.path())?;

        assert!(temp_dir.path().join(".redline/config.toml").exists());
        assert!(temp_dir.path().join(".redline/.gitignore").exists());

        let config = Config::load_or_default(temp_dir.path())?;
        assert_eq!(config.data, ConfigData::default());
        Ok(())
    }

    #[test]
    fn test_set_persists() -> Result<()> {
        let temp_dir = TempDir::new()?;
        Config::init(temp_dir.path())?;

        let mut config = Config::load_or_default(temp_dir.path())?;
        config.set("preview.renderer", "panel")?;
        config.set("persist.check_conflicts", "false")?;

        let reloaded = Config::load_or_default(temp_dir.path())?;
        assert_eq!(reloaded.data.preview.renderer, RendererKind::Panel);
        assert!(!reloaded.data.persist.check_conflicts);
        assert_eq!(reloaded.get("preview.renderer")?, "panel");
        Ok(())
    }

    #[test]
    fn test_invalid_keys_and_values() -> Result<()> {
        let temp_dir = TempDir::new()?;
        Config::init(temp_dir.path())?;
        let mut config = Config::load_or_default(temp_dir.path())?;

        assert!(config.set("editor.theme", "dark").is_err());
        assert!(config.set("persist.atomic", "maybe").is_err());
        assert!(config.set("preview.renderer", "split").is_err());
        assert!(config.get("nope").is_err());
        assert_eq!(config.list()?.len(), KEYS.len());
        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let data: ConfigData = toml::from_str("version = \"0.1.0\"\n[preview]\nrenderer = \"panel\"\n")?;

        assert_eq!(data.preview.renderer, RendererKind::Panel);
        assert_eq!(data.preview.delete_marker, "// [DELETED] ");
        assert!(data.persist.atomic);
        Ok(())
    }
}
