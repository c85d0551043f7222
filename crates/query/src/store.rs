use crate::filter::{FilterOptions, year_view};
use analytics::{StatisticsEngine, TradingData};
use core_types::{DatasetKey, YearFilter};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

/// The loaded datasets, keyed by `coin-emaPeriod-mode`.
///
/// Built once at start-up and never mutated afterwards, so it can be shared
/// behind an `Arc` by any number of concurrent readers.
#[derive(Debug, Default)]
pub struct DatasetStore {
    datasets: HashMap<DatasetKey, TradingData>,
    engine: StatisticsEngine,
}

impl DatasetStore {
    /// Takes ownership of the datasets. A later dataset with the same key
    /// replaces an earlier one.
    pub fn new(datasets: impl IntoIterator<Item = TradingData>) -> Self {
        let mut map = HashMap::new();
        for dataset in datasets {
            let key = dataset.key();
            if map.insert(key, dataset).is_some() {
                tracing::warn!(%key, "Duplicate dataset; keeping the last one loaded.");
            }
        }
        tracing::info!(datasets = map.len(), "Dataset store ready.");

        Self {
            datasets: map,
            engine: StatisticsEngine::new(),
        }
    }

    pub fn get(&self, key: &DatasetKey) -> Option<&TradingData> {
        self.datasets.get(key)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// All datasets ordered by key.
    pub fn datasets(&self) -> Vec<&TradingData> {
        let mut all: Vec<_> = self.datasets.values().collect();
        all.sort_by_key(|dataset| dataset.key());
        all
    }

    /// The distinct years that have at least one row in the dataset.
    pub fn years(&self, key: &DatasetKey) -> Vec<i32> {
        self.datasets
            .get(key)
            .map(|dataset| {
                dataset
                    .trades
                    .iter()
                    .map(|trade| trade.year)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves the filter selection to the dataset to display.
    ///
    /// Returns `None` when no dataset exists for the coin/period/mode
    /// combination. With `YearFilter::All` the stored dataset is returned
    /// as-is; a specific year yields a freshly computed view.
    pub fn select_dataset(&self, filters: &FilterOptions) -> Option<Cow<'_, TradingData>> {
        let key = filters.key();
        let dataset = self.datasets.get(&key)?;

        match filters.year {
            YearFilter::All => Some(Cow::Borrowed(dataset)),
            YearFilter::Year(year) => {
                let view = year_view(dataset, year, &self.engine);
                tracing::debug!(%key, year, trades = view.trades.len(), "Built year view.");
                Some(Cow::Owned(view))
            }
        }
    }
}
