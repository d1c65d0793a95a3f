use std::io::Read;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::DatasetError;

/// Column holding the clip identifier (also its path on disk)
pub const NAME_COLUMN: &str = "new_name";

/// One row of the source dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRecord {
    pub name: String,
}

impl ClipRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Read every row of the dataset at `path`, in file order
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<ClipRecord>, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Read {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    read_clips(file, path)
}

/// Parse clips from any CSV source. `origin` is only used in error messages.
pub fn read_clips<R: Read>(source: R, origin: &Path) -> Result<Vec<ClipRecord>, DatasetError> {
    let read_err = |source: csv::Error| DatasetError::Read {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(source);
    let name_idx = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .position(|h| h == NAME_COLUMN)
        .ok_or_else(|| DatasetError::MissingColumn {
            path: origin.to_path_buf(),
            column: NAME_COLUMN,
        })?;

    let mut clips = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        clips.push(ClipRecord::new(record.get(name_idx).unwrap_or_default()));
    }

    tracing::debug!(count = clips.len(), path = %origin.display(), "dataset loaded");
    Ok(clips)
}

/// Shuffle the queue once. A seed makes the order reproducible.
pub fn shuffle(clips: &mut [ClipRecord], seed: Option<u64>) {
    match seed {
        Some(seed) => clips.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => clips.shuffle(&mut rand::thread_rng()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::tempdir;

    fn names(clips: &[ClipRecord]) -> Vec<&str> {
        clips.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn reads_name_column_among_others() {
        let csv = "pitcher,new_name,velo\nkershaw,a.mp4,92\nscherzer,b.mp4,95\n";
        let clips = read_clips(csv.as_bytes(), Path::new("mem.csv")).unwrap();
        assert_eq!(names(&clips), vec!["a.mp4", "b.mp4"]);
    }

    #[test]
    fn keeps_duplicate_rows() {
        let csv = "new_name\na.mp4\nb.mp4\na.mp4\n";
        let clips = read_clips(csv.as_bytes(), Path::new("mem.csv")).unwrap();
        assert_eq!(clips.len(), 3);
    }

    #[test]
    fn header_only_dataset_is_empty() {
        let clips = read_clips("new_name\n".as_bytes(), Path::new("mem.csv")).unwrap();
        assert!(clips.is_empty());
    }

    #[test]
    fn missing_name_column_is_reported() {
        let err = read_clips("name\na.mp4\n".as_bytes(), Path::new("mem.csv")).unwrap_err();
        assert_matches!(err, DatasetError::MissingColumn { column: "new_name", .. });
    }

    #[test]
    fn ragged_rows_are_read_errors() {
        let csv = "new_name,velo\na.mp4,92\nb.mp4\n";
        let err = read_clips(csv.as_bytes(), Path::new("mem.csv")).unwrap_err();
        assert_matches!(err, DatasetError::Read { .. });
    }

    #[test]
    fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clips.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "new_name").unwrap();
        writeln!(f, "clip_01.mp4").unwrap();
        drop(f);

        let clips = load(&path).unwrap();
        assert_eq!(names(&clips), vec!["clip_01.mp4"]);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = load(dir.path().join("nope.csv")).unwrap_err();
        assert_matches!(err, DatasetError::Read { .. });
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let base: Vec<ClipRecord> = (0..20).map(|i| ClipRecord::new(format!("{i}.mp4"))).collect();

        let mut first = base.clone();
        let mut second = base.clone();
        shuffle(&mut first, Some(7));
        shuffle(&mut second, Some(7));
        assert_eq!(first, second);

        let mut sorted = names(&first);
        sorted.sort();
        let mut expected = names(&base);
        expected.sort();
        assert_eq!(sorted, expected);
    }
}
