use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Characters bound to each labeling action. Confirm (Enter) and quit are fixed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyBindings {
    pub early: char,
    pub strike: char,
    pub ball: char,
    pub fastball: char,
    pub offspeed: char,
    pub breaking: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            early: 's',
            strike: '9',
            ball: '0',
            fastball: '1',
            offspeed: '2',
            breaking: '3',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dataset: PathBuf,
    pub log_dir: PathBuf,
    pub video_root: Option<PathBuf>,
    pub progress_total: usize,
    pub settle_ms: u64,
    /// Listen for labeling keys even while the video player has focus
    pub global_keys: bool,
    pub keys: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("timing/elite_info/elite_pitchinfo.csv"),
            log_dir: PathBuf::from("logs"),
            video_root: None,
            progress_total: 33,
            settle_ms: 100,
            global_keys: true,
            keys: KeyBindings::default(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;

    /// Load the stored config, writing the defaults first if none exists yet
    fn load_or_init(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pitchlab") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pitchlab_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }

    fn load_or_init(&self) -> Config {
        if !self.path.exists() {
            let cfg = Config::default();
            if let Err(e) = self.save(&cfg) {
                tracing::warn!(path = %self.path.display(), error = %e, "could not write default config");
            }
            return cfg;
        }
        self.load()
    }
}
