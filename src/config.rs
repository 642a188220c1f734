use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::occurrence::OccurrenceMode;
use crate::refactor::{DeclarationKeyword, ExtractOptions};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RescopeConfig {
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Defaults for `rescope extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Base name; a numeric suffix is added when it is taken
    pub name: String,
    pub keyword: DeclarationKeyword,
    pub mode: OccurrenceMode,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        let defaults = ExtractOptions::default();
        Self {
            name: defaults.name,
            keyword: defaults.keyword,
            mode: defaults.mode,
        }
    }
}

impl ExtractConfig {
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            name: self.name.clone(),
            fresh: true,
            mode: self.mode,
            keyword: self.keyword,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("rescope.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<RescopeConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: RescopeConfig = toml::from_str(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &RescopeConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(Some(&dir.path().join("rescope.toml"))).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rescope.toml");
        std::fs::write(&path, "[extract]\nkeyword = \"let\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.extract.keyword, DeclarationKeyword::Let);
        assert_eq!(config.extract.mode, OccurrenceMode::All);
        assert_eq!(config.extract.name, "extracted");
    }

    #[test]
    fn test_write_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rescope.toml");
        let mut config = RescopeConfig::default();
        config.extract.mode = OccurrenceMode::First;

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.extract.mode, OccurrenceMode::First);
    }
}
