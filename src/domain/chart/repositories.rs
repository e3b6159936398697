use super::entities::Snapshot;
use crate::domain::{errors::ChartError, market_data::ChartKey};

/// Anything that can produce a chart snapshot for a key: the backend over
/// HTTP in production, scripted fakes in tests.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource {
    async fn fetch_snapshot(&self, key: &ChartKey) -> Result<Snapshot, ChartError>;
}
