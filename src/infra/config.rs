//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::{ConfigStore, LocalFs as _};
use crate::domain::config::DropshipConfig;
use crate::infra::fs::LocalFs;
use crate::infra::paths::dropship_home;

/// The config file may carry a provider URL override; keep it private.
const CONFIG_MODE: u32 = 0o600;

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
pub struct YamlConfigStore;

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<DropshipConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(DropshipConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(DropshipConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &DropshipConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        LocalFs
            .write(&path, &content, CONFIG_MODE)
            .with_context(|| format!("cannot write {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("DROPSHIP_CONFIG")
            && !val.is_empty()
        {
            return Ok(PathBuf::from(val));
        }
        Ok(dropship_home()?.join("config.yaml"))
    }
}
