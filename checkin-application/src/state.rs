use std::sync::Arc;

use checkin_domain::ports::Scanner;
use checkin_domain::{CrewMember, RuntimeConfig, TicketHolder};
use mockable::Clock;

use crate::ops::ScanSessionHub;
use crate::{Metrics, RosterRegistry};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub tickets: Arc<RosterRegistry<TicketHolder>>,
    pub crew: Arc<RosterRegistry<CrewMember>>,
    pub scanner: Arc<dyn Scanner>,
    pub sessions: Arc<ScanSessionHub>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<Metrics>,
}
