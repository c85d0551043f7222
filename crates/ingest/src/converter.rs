use crate::error::IngestError;
use crate::reader::read_trades;
use crate::repository::JsonRepository;
use analytics::{StatisticsEngine, TradingData};
use core_types::{DatasetKey, TradeRecord};
use std::path::{Path, PathBuf};

/// Where the backtester export for `key` is expected under `source_dir`,
/// e.g. `full/BTC-EMA120-FULL.csv`.
pub fn source_path(source_dir: &Path, key: &DatasetKey) -> PathBuf {
    let mode = key.mode.as_str();
    source_dir.join(mode).join(format!(
        "{}-EMA{}-{}.csv",
        key.coin,
        key.ema_period,
        mode.to_uppercase()
    ))
}

/// Wraps parsed rows into a dataset with statistics over every row.
pub fn build_dataset(
    key: DatasetKey,
    trades: Vec<TradeRecord>,
    engine: &StatisticsEngine,
) -> TradingData {
    let statistics = engine.calculate(&trades);
    TradingData {
        coin: key.coin,
        ema_period: key.ema_period,
        mode: key.mode,
        trades,
        statistics,
    }
}

/// The outcome for one dataset during a conversion run.
#[derive(Debug)]
pub enum ConversionEvent<'a> {
    Converted { key: DatasetKey, trades: usize },
    Missing { key: DatasetKey, path: &'a Path },
    Failed { key: DatasetKey, error: &'a IngestError },
}

/// What a conversion run did with each of the sixteen datasets.
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub converted: Vec<(DatasetKey, usize)>,
    pub missing: Vec<(DatasetKey, PathBuf)>,
    pub failed: Vec<(DatasetKey, String)>,
    /// The summary file; written on every run, `[]` when nothing converted.
    pub summary: PathBuf,
}

impl ConversionReport {
    pub fn total_trades(&self) -> usize {
        self.converted.iter().map(|(_, count)| count).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Converts every dataset found under `source_dir` into `repository`.
///
/// A file that fails to parse is reported and skipped; the rest still
/// convert. Only a failure to write output aborts the run. `on_event` is
/// called once per dataset, in key order.
///
/// The summary file is rewritten on every run, so a run that converts
/// nothing leaves `[]` rather than an earlier run's datasets.
pub fn convert_all<F>(
    source_dir: &Path,
    repository: &JsonRepository,
    mut on_event: F,
) -> Result<ConversionReport, IngestError>
where
    F: FnMut(ConversionEvent<'_>),
{
    let engine = StatisticsEngine::new();
    let mut report = ConversionReport::default();
    let mut datasets = Vec::new();

    for key in DatasetKey::all() {
        let path = source_path(source_dir, &key);
        if !path.exists() {
            tracing::warn!(%key, path = %path.display(), "Source file not found; skipping.");
            on_event(ConversionEvent::Missing { key, path: &path });
            report.missing.push((key, path));
            continue;
        }

        match read_trades(&path) {
            Ok(trades) => {
                let dataset = build_dataset(key, trades, &engine);
                let written = repository.save_dataset(&dataset)?;
                let count = dataset.trades.len();
                tracing::info!(%key, trades = count, output = %written.display(), "Converted dataset.");
                on_event(ConversionEvent::Converted { key, trades: count });
                report.converted.push((key, count));
                datasets.push(dataset);
            }
            Err(error) => {
                tracing::warn!(%key, %error, "Failed to convert dataset; skipping.");
                on_event(ConversionEvent::Failed { key, error: &error });
                report.failed.push((key, error.to_string()));
            }
        }
    }

    let summary = repository.save_summary(&datasets)?;
    tracing::info!(
        datasets = datasets.len(),
        output = %summary.display(),
        "Wrote summary file."
    );
    report.summary = summary;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Coin, EmaPeriod, SizingMode};

    #[test]
    fn source_path_follows_the_export_layout() {
        let key = DatasetKey::new(Coin::Btc, EmaPeriod::Ema120, SizingMode::Full);
        assert_eq!(
            source_path(Path::new("originData"), &key),
            Path::new("originData/full/BTC-EMA120-FULL.csv")
        );

        let key = DatasetKey::new(Coin::Ada, EmaPeriod::Ema200, SizingMode::Fixed);
        assert_eq!(
            source_path(Path::new("src"), &key),
            Path::new("src/fixed/ADA-EMA200-FIXED.csv")
        );
    }

    #[test]
    fn empty_export_builds_zero_statistics() {
        let key = DatasetKey::new(Coin::Eth, EmaPeriod::Ema200, SizingMode::Full);
        let dataset = build_dataset(key, Vec::new(), &StatisticsEngine::new());
        assert_eq!(dataset.key(), key);
        assert!(dataset.statistics.is_zero());
    }
}
