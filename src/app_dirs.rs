use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "paratype";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    /// Where the persisted language/level selection lives
    pub fn state_path() -> PathBuf {
        Self::state_dir().join("session.json")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("paratype.log")
    }
}
