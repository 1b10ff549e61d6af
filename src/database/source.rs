use super::*;
use crate::data::Data;

/// Read interface between tables and record sets.
/// Every call loads afresh; nothing is cached between requests.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    async fn load(&self, table: &str) -> Result<Data, SourceError>;
}
