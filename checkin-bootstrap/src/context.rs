use std::sync::Arc;

use anyhow::Result;
use mockable::DefaultClock;
use tracing::info;

use checkin_application::ops::ScanSessionHub;
use checkin_application::{AppState, Metrics, RosterRegistry};
use checkin_domain::{CrewMember, TicketHolder};
use checkin_infrastructure::{AppConfig, RosterFileRepository, SimulatedScanner};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let scanner_config = config.to_scanner_config();

        let rosters = Arc::new(RosterFileRepository::new(&config.roster_dir));
        let scanner = SimulatedScanner::from_config(&scanner_config).await?;
        info!(
            "rosters from {}, scanner mode {:?}",
            config.roster_dir, scanner_config.mode
        );

        let state = AppState {
            config: runtime_config,
            tickets: Arc::new(RosterRegistry::<TicketHolder>::new(rosters.clone())),
            crew: Arc::new(RosterRegistry::<CrewMember>::new(rosters)),
            scanner: Arc::new(scanner),
            sessions: Arc::new(ScanSessionHub::default()),
            clock: Arc::new(DefaultClock),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
