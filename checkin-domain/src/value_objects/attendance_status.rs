// Attendance status value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    #[default]
    NotPresent,
    Present,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::NotPresent => "NOT_PRESENT",
            AttendanceStatus::Present => "PRESENT",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present)
    }

    // Accepts the wire names plus the labels operators type into filters.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "present" | "hadir" | "checked_in" => Some(AttendanceStatus::Present),
            "not_present" | "belum_hadir" | "absent" | "pending" => {
                Some(AttendanceStatus::NotPresent)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_wire_names_and_labels() {
        assert_eq!(AttendanceStatus::parse("PRESENT"), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::parse("Hadir"), Some(AttendanceStatus::Present));
        assert_eq!(
            AttendanceStatus::parse("not_present"),
            Some(AttendanceStatus::NotPresent)
        );
        assert_eq!(
            AttendanceStatus::parse("Belum Hadir"),
            Some(AttendanceStatus::NotPresent)
        );
        assert_eq!(AttendanceStatus::parse("maybe"), None);
    }

    #[test]
    fn serializes_to_wire_names() {
        let json = serde_json::to_string(&AttendanceStatus::NotPresent).expect("json");
        assert_eq!(json, "\"NOT_PRESENT\"");
    }
}
