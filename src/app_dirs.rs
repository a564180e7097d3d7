use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "serene")
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("serene_config.json"))
    }

    pub fn prefs_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("preferences.json"))
            .unwrap_or_else(|| PathBuf::from("serene_preferences.json"))
    }

    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("serene")
                .join("serene.log")
        } else {
            Self::project()
                .map(|pd| pd.data_local_dir().join("serene.log"))
                .unwrap_or_else(|| PathBuf::from("serene.log"))
        }
    }

    /// Bundled preview clips live next to the user's data
    pub fn default_previews_dir() -> PathBuf {
        Self::project()
            .map(|pd| pd.data_dir().join("previews"))
            .unwrap_or_else(|| PathBuf::from("previews"))
    }
}
