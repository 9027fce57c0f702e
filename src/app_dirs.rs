use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "wordfall";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// `$HOME/.local/state/wordfall`, falling back to the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.data_local_dir().into())
        }
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("wordfall_config.json"))
    }

    pub fn high_score_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("high_score.json"))
            .unwrap_or_else(|| PathBuf::from("wordfall_high_score.json"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|dir| dir.join("wordfall.log"))
            .unwrap_or_else(|| PathBuf::from("wordfall.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_stable() {
        assert!(AppDirs::config_path().ends_with("config.json"));
        assert!(AppDirs::high_score_path().ends_with("high_score.json"));
        assert!(AppDirs::log_path().ends_with("wordfall.log"));
    }
}
