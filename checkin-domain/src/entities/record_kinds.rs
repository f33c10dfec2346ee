// Record kinds
// Ticket holders and crew members share one record shape; the kind only
// carries descriptive details.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::value_objects::KindTag;

pub trait RecordKind:
    Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: KindTag;

    /// Ticket type for ticket holders, crew role for crew.
    fn category(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketHolder {
    pub ticket_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl RecordKind for TicketHolder {
    const KIND: KindTag = KindTag::Ticket;

    fn category(&self) -> &str {
        &self.ticket_type
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl RecordKind for CrewMember {
    const KIND: KindTag = KindTag::Crew;

    fn category(&self) -> &str {
        &self.role
    }
}
