use anyhow::Result;
use clap::Parser;

use checkin_infrastructure::{AppConfig, CONFIG_ENV};

#[derive(Parser, Debug)]
#[command(name = "checkin-server")]
#[command(about = "Ticket and crew check-in server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var(CONFIG_ENV, config);
    }

    let config = AppConfig::load().await?;
    let _log_guard = checkin_bootstrap::telemetry::init_tracing(config.log_dir.as_deref());

    checkin_bootstrap::run_standalone(config).await
}
