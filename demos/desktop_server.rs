//! Desktop server for trying the site profiles without hardware.
//!
//! Runs the same responder and WebSocket channel as the device, driving two
//! mock motor channels:
//! - Control page at http://localhost:8080 (drag your finger over the arrows)
//! - Drive state at http://localhost:8080/api/state
//! - Greeter profile with `WIFIBOT_SITE=greeter`
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_server --features web
//!
//! # Greeter on port 3000, serving the page from disk
//! WIFIBOT_SITE=greeter WIFIBOT_PORT=3000 cargo run --example desktop_server --features web
//! WIFIBOT_ASSETS_DIR=www RUST_LOG=debug cargo run --example desktop_server --features web
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

use rs_wifibot::hal::MockMotorChannel;
use rs_wifibot::services::{run_server, DriveLink, SharedDriveState};
use rs_wifibot::traits::NoIndicator;
use rs_wifibot::{Config, MotorController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rs_wifibot=debug")),
        )
        .init();

    info!("=================================");
    info!("  rs-wifibot Desktop Server");
    info!("=================================");

    let config = Config::from_env()?;

    let drive = MotorController::new(MockMotorChannel::new(), MockMotorChannel::new())
        .map_err(|()| anyhow::anyhow!("mock channel rejected boot state"))?;
    let state = Arc::new(SharedDriveState::new(drive));

    info!("  Page: http://localhost:{}/", config.web.port);
    if config.web.site.has_realtime() {
        info!("  WebSocket: ws://localhost:{}{}", config.web.port, config.web.ws_path);
    }

    spawn_state_logger(Arc::clone(&state));

    run_server(&config, state, NoIndicator).await?;
    Ok(())
}

/// Log the drive state whenever a WebSocket command changes it.
fn spawn_state_logger(state: Arc<SharedDriveState<MockMotorChannel>>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(20));
        let mut last = DriveLink::snapshot(&state);
        loop {
            interval.tick().await;
            let snap = DriveLink::snapshot(&state);
            if snap != last {
                info!(
                    command = snap.last_command.as_str(),
                    left = %format!("{} {}", snap.state.left.direction.as_str(), snap.state.left.duty),
                    right = %format!("{} {}", snap.state.right.direction.as_str(), snap.state.right.duty),
                    "drive changed"
                );
                last = snap;
            }
        }
    });
}
