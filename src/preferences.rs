use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::theme::ThemeMode;

/// Persisted user preferences. The theme mode is the only setting that
/// survives across sessions; everything else is per-run state.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Preferences {
    pub theme: ThemeMode,

    #[serde(skip)]
    file_path: Option<String>,
}

impl Preferences {
    pub fn ephemeral() -> Self {
        Self {
            theme: ThemeMode::default(),
            file_path: None,
        }
    }

    pub fn with_file(file_path: &str) -> Self {
        Self {
            theme: ThemeMode::default(),
            file_path: Some(file_path.to_string()),
        }
    }

    /// Load from disk, falling back to defaults on any error. Load
    /// failures are logged, never fatal.
    pub fn load_or_ephemeral(file_path: Option<&str>) -> Self {
        match file_path {
            Some(path) => Self::load_from_file(path).unwrap_or_else(|e| {
                log::error!("Failed to load preferences from {path}: {e}");
                Self::with_file(path)
            }),
            None => Self::ephemeral(),
        }
    }

    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let path = Path::new(file_path);
        if path.exists() {
            let content = fs::read_to_string(path)?;
            match serde_json::from_str::<Self>(&content) {
                Ok(mut prefs) => {
                    prefs.file_path = Some(file_path.to_string());
                    Ok(prefs)
                }
                Err(e) => {
                    log::error!("Failed to parse preferences file: {e}");
                    Err(anyhow::anyhow!("Failed to parse preferences: {}", e))
                }
            }
        } else {
            Ok(Self::with_file(file_path))
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        match &self.file_path {
            Some(path) => {
                let content = serde_json::to_string_pretty(self)?;
                fs::write(path, content)?;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        let path_str = path.to_string_lossy().to_string();

        let mut prefs = Preferences::with_file(&path_str);
        prefs.theme = ThemeMode::Light;
        prefs.save().unwrap();

        let loaded = Preferences::load_from_file(&path_str).unwrap();
        assert_eq!(loaded.theme, ThemeMode::Light);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let prefs = Preferences::load_or_ephemeral(Some("/nonexistent/dir/prefs.json"));
        assert_eq!(prefs.theme, ThemeMode::default());
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "not json at all").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let prefs = Preferences::load_or_ephemeral(Some(&path_str));
        assert_eq!(prefs.theme, ThemeMode::default());
    }

    #[test]
    fn test_ephemeral_save_is_a_noop() {
        let mut prefs = Preferences::ephemeral();
        prefs.theme = ThemeMode::Light;
        prefs.save().unwrap();
    }
}
