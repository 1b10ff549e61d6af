/// Errors signalled by the distance model and the QT engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MiningError {
    /// Caller contract violation: incompatible value kinds,
    /// mismatched tuple lengths, malformed schemas, bad radii.
    InvalidArgument(String),
    /// The record set has no records.
    EmptyDataset,
    /// Every record collapsed into a single cluster.
    /// Carries the number of records that were swallowed.
    ClusteringRadius(usize),
}

impl MiningError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument(reason.into())
    }
}

impl std::fmt::Display for MiningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
            Self::EmptyDataset => write!(f, "dataset is empty"),
            Self::ClusteringRadius(n) => write!(f, "{} tuples in one cluster", n),
        }
    }
}

impl std::error::Error for MiningError {}
