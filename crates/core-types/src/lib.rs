//! # EMA Lab Core Types
//!
//! The shared vocabulary of the workspace: the trade rows exported by the
//! backtester and the keys that identify each of the sixteen datasets.
//!
//! ## Public API
//!
//! - `TradeRecord`: one row of a backtest's trade list.
//! - `TradeKind`: the decoded `type` column (`Direction` + `Leg`).
//! - `DatasetKey`: `coin-emaPeriod-mode`, e.g. `BTC-120-full`.
//! - `Coin`, `EmaPeriod`, `SizingMode`, `YearFilter`: dashboard filter dimensions.
//! - `CoreError`: parse failures for all of the above.

pub mod datetime;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Coin, Direction, EmaPeriod, Leg, SizingMode, YearFilter};
pub use error::CoreError;
pub use structs::{DatasetKey, TradeKind, TradeRecord};
