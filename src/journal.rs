use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::JournalError;
use crate::session::ResultRecord;

const FILE_SUFFIX: &str = "_session_results.csv";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Writes one CSV per session into a fixed directory
#[derive(Debug, Clone)]
pub struct SessionJournal {
    dir: PathBuf,
}

impl SessionJournal {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn file_name(now: &DateTime<Local>) -> String {
        format!("{}{}", now.format(TIMESTAMP_FORMAT), FILE_SUFFIX)
    }

    /// Persist `results`. Returns the written path, or None when there was
    /// nothing to write (no file is created in that case).
    pub fn write(
        &self,
        results: &[ResultRecord],
        now: DateTime<Local>,
    ) -> Result<Option<PathBuf>, JournalError> {
        if results.is_empty() {
            tracing::info!("no results captured, skipping session file");
            return Ok(None);
        }

        fs::create_dir_all(&self.dir).map_err(|source| JournalError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(Self::file_name(&now));
        let write_err = |source: csv::Error| JournalError::Write {
            path: path.clone(),
            source,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(write_err)?;
        for record in results {
            writer.serialize(record).map_err(write_err)?;
        }
        writer.flush().map_err(|source| JournalError::Flush {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), rows = results.len(), "session results written");
        Ok(Some(path))
    }
}
