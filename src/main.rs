//! Command-line entry point: prints the application list for the given
//! statuses as JSON view-models.
//!
//! Usage: `benefit-portal [status...]`, e.g. `benefit-portal draft`.

use benefit_portal::models::ApplicationStatus;
use benefit_portal::queries::{self, user};
use benefit_portal::services::events::drain;
use benefit_portal::{PortalConfig, Session};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config = match PortalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut statuses: Vec<String> = std::env::args().skip(1).collect();
    if statuses.is_empty() {
        statuses = ApplicationStatus::ALL
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
    }

    let (session, mut events) = match Session::open(&config).await {
        Ok(opened) => opened,
        Err(e) => {
            log::error!("Failed to open session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = user::fetch_current_user(&session).await {
        log::warn!("Could not load the current user: {}", e);
    }

    let view = queries::application_list(&session, &statuses).await;

    for event in drain(&mut events) {
        log::info!("{}: {}", event.name(), serde_json::to_string(&event).unwrap_or_default());
    }

    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to serialize list: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if session.page_errors().is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
