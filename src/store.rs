use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::settings::AppSettings;

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config dir>/textreco/settings.json`, when the platform has a config dir.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("textreco").join("settings.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<AppSettings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file; using defaults");
            return Ok(AppSettings::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading settings file {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing settings json {}", self.path.display()))
    }

    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        let Some(parent) = self.path.parent() else {
            anyhow::bail!("settings path {} has no parent", self.path.display())
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating settings dir {}", parent.display()))?;
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)
            .with_context(|| format!("failed writing settings file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SessionPreset;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("missing.json"));
        let settings = store.load().expect("load defaults");
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.camera.preset, SessionPreset::Medium);
    }

    #[test]
    fn save_creates_parent_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));
        let mut settings = AppSettings::default();
        settings.log_filter = "textreco=debug".to_string();

        store.save(&settings).expect("save");
        assert_eq!(store.load().expect("reload"), settings);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();

        let err = SettingsStore::new(path).load().unwrap_err();
        assert!(err.to_string().contains("failed parsing settings json"));
    }
}
