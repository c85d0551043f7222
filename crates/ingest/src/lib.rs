//! # EMA Lab Ingest
//!
//! Converts the backtester's CSV trade-list exports into the JSON datasets
//! the dashboard serves, and loads them back.
//!
//! ## Public API
//!
//! - `read_trades` / `parse_trades`: one CSV export into trade rows. Both the
//!   Chinese and English header sets are understood.
//! - `convert_all`: every dataset under a source directory, with a report.
//! - `JsonRepository`: the `{COIN}-{period}-{mode}.json` files plus
//!   `all-data.json`.

pub mod columns;
pub mod converter;
pub mod error;
pub mod reader;
pub mod repository;

pub use converter::{ConversionEvent, ConversionReport, build_dataset, convert_all, source_path};
pub use error::IngestError;
pub use reader::{parse_trades, read_trades};
pub use repository::{JsonRepository, SUMMARY_FILE};
