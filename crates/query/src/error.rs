use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown trade history column: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort order {0:?}: expected \"asc\" or \"desc\"")]
    UnknownSortOrder(String),
}
