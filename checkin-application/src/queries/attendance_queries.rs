use checkin_domain::{
    normalize_optional_text, AttendanceRecord, AttendanceStatus, AttendanceSummary, EventId,
    RecordListQuery,
};

use crate::dtos::RecordPage;
use crate::{AppError, AppState, Rostered};

/// Lists an event's records in display order, most recent check-ins first,
/// filtered by status and a case-insensitive search over identifier, name
/// and category.
pub async fn list_records<K: Rostered>(
    state: &AppState,
    event_id: &EventId,
    query: RecordListQuery,
) -> Result<RecordPage<K>, AppError> {
    let status = match normalize_optional_text(query.status.clone()) {
        Some(raw) => Some(
            AttendanceStatus::parse(&raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown status '{}'", raw)))?,
        ),
        None => None,
    };
    let search = normalize_optional_text(query.search.clone()).map(|text| text.to_lowercase());
    let page = query.page();
    let per_page = query.per_page();

    K::registry(state)
        .read(event_id, |store| {
            let matching: Vec<&AttendanceRecord<K>> = store
                .records()
                .filter(|record| status.map_or(true, |status| record.status() == status))
                .filter(|record| {
                    search
                        .as_deref()
                        .map_or(true, |needle| matches_search(*record, needle))
                })
                .collect();
            RecordPage {
                event_id: event_id.clone(),
                kind: K::KIND,
                page,
                per_page,
                total_matching: matching.len(),
                summary: store.summary(),
                records: matching
                    .into_iter()
                    .skip((page - 1).saturating_mul(per_page))
                    .take(per_page)
                    .cloned()
                    .collect(),
            }
        })
        .await
}

pub async fn attendance_summary<K: Rostered>(
    state: &AppState,
    event_id: &EventId,
) -> Result<AttendanceSummary, AppError> {
    K::registry(state)
        .read(event_id, |store| store.summary())
        .await
}

fn matches_search<K: Rostered>(record: &AttendanceRecord<K>, needle: &str) -> bool {
    [
        record.identifier().as_str(),
        record.display_name(),
        record.role_or_category(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::checkin_commands::scan_identifier;
    use crate::test_support::{crew, test_state, ticket};
    use checkin_domain::{CrewMember, TicketHolder};

    #[tokio::test]
    async fn checked_in_records_come_first_and_filter_by_status() {
        let (state, clock) = test_state(
            vec![ticket("TKT-1", "101"), ticket("TKT-2", "101"), ticket("TKT-3", "101")],
            Vec::new(),
        );
        let event = EventId::new("101");
        scan_identifier::<TicketHolder>(&state, &event, "TKT-3")
            .await
            .expect("scan");
        clock.advance_seconds(5);
        scan_identifier::<TicketHolder>(&state, &event, "TKT-2")
            .await
            .expect("scan");

        let page = list_records::<TicketHolder>(&state, &event, RecordListQuery::default())
            .await
            .expect("list");
        let order: Vec<&str> = page.records.iter().map(|r| r.identifier().as_str()).collect();
        assert_eq!(order, vec!["TKT-2", "TKT-3", "TKT-1"]);
        assert_eq!(page.summary.present, 2);

        let pending = list_records::<TicketHolder>(
            &state,
            &event,
            RecordListQuery {
                status: Some("belum hadir".to_string()),
                ..RecordListQuery::default()
            },
        )
        .await
        .expect("list");
        assert_eq!(pending.total_matching, 1);
        assert_eq!(pending.records[0].identifier().as_str(), "TKT-1");
    }

    #[tokio::test]
    async fn search_matches_role_and_paginates() {
        let (state, _) = test_state(
            Vec::new(),
            vec![crew("CRW-1", "7"), crew("CRW-2", "7"), crew("CRW-3", "7")],
        );
        let event = EventId::new("7");
        let page = list_records::<CrewMember>(
            &state,
            &event,
            RecordListQuery {
                search: Some("USHER".to_string()),
                page: Some(2),
                per_page: Some(2),
                ..RecordListQuery::default()
            },
        )
        .await
        .expect("list");
        assert_eq!(page.total_matching, 3);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].identifier().as_str(), "CRW-3");
    }

    #[tokio::test]
    async fn unknown_status_filter_is_rejected() {
        let (state, _) = test_state(vec![ticket("TKT-1", "101")], Vec::new());
        let err = list_records::<TicketHolder>(
            &state,
            &EventId::new("101"),
            RecordListQuery {
                status: Some("maybe".to_string()),
                ..RecordListQuery::default()
            },
        )
        .await
        .expect_err("invalid status");
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
