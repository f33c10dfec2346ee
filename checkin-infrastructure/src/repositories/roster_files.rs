use std::path::{Path, PathBuf};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, warn};

use checkin_domain::ports::RecordSource;
use checkin_domain::{AttendanceRecord, AttendanceStatus, EventId, RecordId, RecordKind};

/// One line of a roster file. Kind-specific fields sit next to the shared
/// ones, e.g. `ticket_type` for tickets or `role` for crew.
#[derive(Debug, Deserialize)]
struct RosterEntry<K> {
    identifier: String,
    event_id: String,
    display_name: String,
    #[serde(flatten)]
    details: K,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    scanned_at: Option<DateTime<Utc>>,
}

impl<K: RecordKind> RosterEntry<K> {
    fn into_record(self) -> anyhow::Result<AttendanceRecord<K>> {
        let status = match self.status.as_deref() {
            Some(raw) => AttendanceStatus::parse(raw).ok_or_else(|| {
                anyhow!("record '{}' has unknown status '{}'", self.identifier, raw)
            })?,
            None => AttendanceStatus::NotPresent,
        };
        let record = AttendanceRecord::from_seed(
            RecordId::new(self.identifier.trim()),
            EventId::new(self.event_id),
            self.display_name,
            self.details,
            status,
            self.scanned_at,
        )?;
        Ok(record)
    }
}

/// Reads rosters from `<roster_dir>/<kind>.yaml`, `.yml` or `.json`. Each file
/// is a flat list covering every event.
pub struct RosterFileRepository {
    roster_dir: PathBuf,
}

impl RosterFileRepository {
    pub fn new(roster_dir: impl Into<PathBuf>) -> Self {
        Self {
            roster_dir: roster_dir.into(),
        }
    }

    fn roster_path(&self, kind: &str) -> Option<PathBuf> {
        ["yaml", "yml", "json"]
            .iter()
            .map(|ext| self.roster_dir.join(format!("{}.{}", kind, ext)))
            .find(|path| path.exists())
    }
}

#[async_trait]
impl<K: RecordKind> RecordSource<K> for RosterFileRepository {
    async fn load_records_for_event(
        &self,
        event_id: &EventId,
    ) -> anyhow::Result<Vec<AttendanceRecord<K>>> {
        let kind = K::KIND.as_str();
        let Some(path) = self.roster_path(kind) else {
            warn!(
                "no {} roster in {}, starting empty",
                kind,
                self.roster_dir.display()
            );
            return Ok(Vec::new());
        };
        let entries: Vec<RosterEntry<K>> = parse_entries(&path).await?;
        let records = entries
            .into_iter()
            .filter(|entry| entry.event_id.trim() == event_id.as_str())
            .map(RosterEntry::into_record)
            .collect::<anyhow::Result<Vec<_>>>()?;
        debug!(
            "read {} {} entries for event {} from {}",
            records.len(),
            kind,
            event_id,
            path.display()
        );
        Ok(records)
    }
}

async fn parse_entries<K: RecordKind>(path: &Path) -> anyhow::Result<Vec<RosterEntry<K>>> {
    let content = fs::read_to_string(path).await?;
    let entries = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkin_domain::{CrewMember, TicketHolder};

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("checkin-rosters-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    #[tokio::test]
    async fn yaml_roster_is_filtered_by_event() {
        let dir = scratch_dir();
        std::fs::write(
            dir.join("ticket.yaml"),
            r#"
- identifier: TKT-1
  event_id: "101"
  display_name: Ada
  ticket_type: VIP
  order_id: ORD-9
- identifier: TKT-2
  event_id: "102"
  display_name: Grace
  ticket_type: General
- identifier: TKT-3
  event_id: "101"
  display_name: Linus
  ticket_type: General
  status: hadir
  scanned_at: 2026-03-14T18:00:00Z
"#,
        )
        .expect("write roster");

        let repo = RosterFileRepository::new(&dir);
        let records = RecordSource::<TicketHolder>::load_records_for_event(&repo, &EventId::new("101"))
            .await
            .expect("load");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].details().order_id.as_deref(), Some("ORD-9"));
        assert!(!records[0].is_present());
        assert!(records[1].is_present());
        assert!(records[1].scanned_at().is_some());
    }

    #[tokio::test]
    async fn json_crew_roster_loads() {
        let dir = scratch_dir();
        std::fs::write(
            dir.join("crew.json"),
            r#"[{"identifier":"CRW-1","event_id":"7","display_name":"Sam","role":"Usher"}]"#,
        )
        .expect("write roster");

        let repo = RosterFileRepository::new(&dir);
        let records = RecordSource::<CrewMember>::load_records_for_event(&repo, &EventId::new("7"))
            .await
            .expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].role_or_category(), "Usher");
    }

    #[tokio::test]
    async fn missing_roster_is_empty() {
        let repo = RosterFileRepository::new(scratch_dir());
        let records = RecordSource::<CrewMember>::load_records_for_event(&repo, &EventId::new("7"))
            .await
            .expect("load");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn present_without_scan_time_is_rejected() {
        let dir = scratch_dir();
        std::fs::write(
            dir.join("crew.yaml"),
            "- {identifier: CRW-1, event_id: \"7\", display_name: Sam, role: Usher, status: PRESENT}\n",
        )
        .expect("write roster");
        let repo = RosterFileRepository::new(&dir);
        let result =
            RecordSource::<CrewMember>::load_records_for_event(&repo, &EventId::new("7")).await;
        assert!(result.is_err());
    }
}
