use async_trait::async_trait;

use crate::entities::{AttendanceRecord, RecordKind};
use crate::value_objects::EventId;

/// Read-only seed of attendance records, derived upstream from orders or
/// crew rosters.
#[async_trait]
pub trait RecordSource<K: RecordKind>: Send + Sync {
    async fn load_records_for_event(
        &self,
        event_id: &EventId,
    ) -> anyhow::Result<Vec<AttendanceRecord<K>>>;
}
