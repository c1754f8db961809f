use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::{ConfigError, Settings};

const TMP_SUFFIX: &str = "tmp";

/// Loads and saves [`Settings`] as JSON. A missing or corrupt file is
/// not an error: defaults are returned so a fresh install works
/// untouched and a broken file never blocks the derivations.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    pub fn new(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Resolves the platform config directory (`<config>/obra/settings.json`).
    pub fn with_default_location() -> Result<Self, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let dir = base.join("obra");
        fs::create_dir_all(&dir)?;
        Ok(Self::new(dir.join("settings.json")))
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// A missing or unparseable file yields the defaults; the existing
    /// file is left in place for the user to inspect.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        if !self.settings_path.exists() {
            return Ok(Settings::default());
        }
        let data = fs::read_to_string(&self.settings_path)?;
        match serde_json::from_str(&data) {
            Ok(settings) => Ok(settings),
            Err(err) => {
                warn!(path = %self.settings_path.display(), %err, "settings file unreadable, using defaults");
                Ok(Settings::default())
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.settings_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.settings_path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
