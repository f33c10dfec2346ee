// Record kind tag value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindTag {
    Ticket,
    Crew,
}

impl KindTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindTag::Ticket => "ticket",
            KindTag::Crew => "crew",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ticket" | "tickets" => Some(KindTag::Ticket),
            "crew" => Some(KindTag::Crew),
            _ => None,
        }
    }
}
