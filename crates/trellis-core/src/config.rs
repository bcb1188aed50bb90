use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Repository file used when `--file` is not given.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Path entered when a session starts.
    #[serde(default)]
    pub start_path: Option<String>,
    #[serde(default = "default_cache")]
    pub cache: bool,
    #[serde(default)]
    pub prompt: Option<String>,
}

fn default_cache() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            start_path: None,
            cache: default_cache(),
            prompt: None,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/trellis/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("trellis/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("trellis\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Reads the config at `path`, falling back to defaults when it is
    /// missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn effective_prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or("> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert!(config.cache);
        assert_eq!(config.data_file, None);
        assert_eq!(config.effective_prompt(), "> ");
    }

    #[test]
    fn test_load_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_file = \"/tmp/boards.json\"\nstart_path = \"/Work\"\ncache = false\nprompt = \"$ \"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/boards.json")));
        assert_eq!(config.start_path.as_deref(), Some("/Work"));
        assert!(!config.cache);
        assert_eq!(config.effective_prompt(), "$ ");
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cache = [not valid").unwrap();
        let config = AppConfig::load_from(&path);
        assert!(config.cache);
    }
}
