use crate::MiningError;

/// Failures of a record source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The table is missing, has no usable columns, or holds no complete rows.
    NoData(String),
    /// The backing store could not be reached.
    Connection(String),
    /// A numeric column produced no aggregate bound.
    NoValue(String),
    Query(String),
    /// Loaded records violate the schema derived for them.
    Invalid(MiningError),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData(table) => write!(f, "no data in table {}", table),
            Self::Connection(s) => write!(f, "database unavailable: {}", s),
            Self::NoValue(column) => write!(f, "no value for column {}", column),
            Self::Query(s) => write!(f, "query failed: {}", s),
            Self::Invalid(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SourceError {}

impl From<MiningError> for SourceError {
    fn from(e: MiningError) -> Self {
        Self::Invalid(e)
    }
}

#[cfg(feature = "database")]
impl From<tokio_postgres::Error> for SourceError {
    fn from(e: tokio_postgres::Error) -> Self {
        Self::Query(e.to_string())
    }
}
