use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Unrecognised trade type label: {0:?}")]
    UnknownTradeType(String),

    #[error("Invalid datetime {0:?}: expected YYYY-MM-DD HH:MM[:SS]")]
    InvalidDatetime(String),
}
