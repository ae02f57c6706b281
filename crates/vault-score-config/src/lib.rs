use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

fn default_lily_output_path() -> PathBuf {
    PathBuf::from("lily")
}

fn default_lilypond_executable() -> PathBuf {
    PathBuf::from("lilypond")
}

fn default_render_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root that `[[links]]` are resolved against
    pub vault_path: PathBuf,
    /// Score template containing the music and date placeholders
    pub template_path: PathBuf,
    /// Where the assembled LilyPond source is written
    #[serde(default = "default_lily_output_path")]
    pub lily_output_path: PathBuf,
    #[serde(default = "default_lilypond_executable")]
    pub lilypond_executable: PathBuf,
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,
}

impl Config {
    pub fn new(vault_path: PathBuf, template_path: PathBuf) -> Self {
        Self {
            vault_path,
            template_path,
            lily_output_path: default_lily_output_path(),
            lilypond_executable: default_lilypond_executable(),
            render_timeout_secs: default_render_timeout_secs(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in every configured path
        for path in [
            &mut config.vault_path,
            &mut config.template_path,
            &mut config.lily_output_path,
            &mut config.lilypond_executable,
        ] {
            if let Some(expanded) = Self::expand_path(path) {
                *path = expanded;
            }
        }

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/vault-score");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
