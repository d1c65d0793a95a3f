use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("pitchlab"),
            )
        } else {
            ProjectDirs::from("", "", "pitchlab").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    /// Diagnostic log; stdout belongs to the TUI
    pub fn trace_log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("pitchlab.log"))
    }
}
