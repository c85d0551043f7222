use crate::error::IngestError;
use analytics::TradingData;
use core_types::DatasetKey;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the array holding every converted dataset.
pub const SUMMARY_FILE: &str = "all-data.json";

/// Reads and writes converted datasets as JSON files in one directory.
///
/// Each dataset lives in `{COIN}-{period}-{mode}.json`; `all-data.json`
/// holds all of them for consumers that want a single download.
#[derive(Debug, Clone)]
pub struct JsonRepository {
    dir: PathBuf,
}

impl JsonRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dataset_path(&self, key: &DatasetKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    fn ensure_dir(&self) -> Result<(), IngestError> {
        fs::create_dir_all(&self.dir).map_err(|source| IngestError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    /// Writes one dataset, pretty-printed, and returns where it went.
    pub fn save_dataset(&self, dataset: &TradingData) -> Result<PathBuf, IngestError> {
        let path = self.dataset_path(&dataset.key());
        write_json(&path, dataset, || self.ensure_dir())?;
        Ok(path)
    }

    pub fn save_summary(&self, datasets: &[TradingData]) -> Result<PathBuf, IngestError> {
        let path = self.summary_path();
        write_json(&path, datasets, || self.ensure_dir())?;
        Ok(path)
    }

    /// Loads one dataset; `Ok(None)` when its file does not exist.
    pub fn load(&self, key: &DatasetKey) -> Result<Option<TradingData>, IngestError> {
        let path = self.dataset_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let file = fs::File::open(&path).map_err(|source| IngestError::Io {
            path: path.clone(),
            source,
        })?;
        let dataset: TradingData = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| IngestError::Json { path, source })?;
        Ok(Some(dataset))
    }

    /// Loads every dataset that has been converted, in key order.
    pub fn load_all(&self) -> Result<Vec<TradingData>, IngestError> {
        let mut datasets = Vec::new();
        for key in DatasetKey::all() {
            match self.load(&key)? {
                Some(dataset) => {
                    tracing::debug!(%key, trades = dataset.trades.len(), "Loaded dataset.");
                    datasets.push(dataset);
                }
                None => tracing::info!(%key, path = %self.dataset_path(&key).display(), "Dataset file not found; skipping."),
            }
        }
        Ok(datasets)
    }
}

fn write_json<T, F>(path: &Path, value: &T, ensure_dir: F) -> Result<(), IngestError>
where
    T: serde::Serialize + ?Sized,
    F: FnOnce() -> Result<(), IngestError>,
{
    ensure_dir()?;
    let file = fs::File::create(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    // Dropping a BufWriter discards the error of its final flush.
    writer.flush().map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::Statistics;
    use core_types::{Coin, EmaPeriod, SizingMode};

    fn empty_dataset() -> TradingData {
        TradingData {
            coin: Coin::Btc,
            ema_period: EmaPeriod::Ema120,
            mode: SizingMode::Full,
            trades: Vec::new(),
            statistics: Statistics::zero(),
        }
    }

    #[test]
    fn saved_dataset_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::new(dir.path());
        let dataset = empty_dataset();

        let path = repository.save_dataset(&dataset).unwrap();
        assert_eq!(path, dir.path().join("BTC-120-full.json"));
        assert_eq!(repository.load(&dataset.key()).unwrap(), Some(dataset));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_final_write_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repository = JsonRepository::new(dir.path());
        let dataset = empty_dataset();
        std::os::unix::fs::symlink("/dev/full", repository.dataset_path(&dataset.key())).unwrap();

        let err = repository.save_dataset(&dataset).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }), "unexpected error: {err}");
    }
}
