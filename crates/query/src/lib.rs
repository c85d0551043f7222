//! # EMA Lab Query Layer
//!
//! Resolves the dashboard's filter selections against the loaded datasets.
//!
//! - `DatasetStore`: the immutable key → dataset mapping, built once.
//! - `FilterOptions`: coin, EMA period, sizing mode and year.
//! - `DatasetStore::select_dataset`: the dataset to display, or `None`.
//! - `history`: sorting and paging of the trade table.

pub mod error;
pub mod filter;
pub mod history;
pub mod store;

pub use error::QueryError;
pub use filter::{FilterChoices, FilterOptions, filter_choices, year_view};
pub use history::{HistoryQuery, SortField, SortOrder, TradePage, paginate};
pub use store::DatasetStore;
