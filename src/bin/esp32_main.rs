//! ESP32-C3 SuperMini WiFi robot.
//!
//! This is the main entry point for the physical robot. It:
//! - Brings WiFi up (station or access point)
//! - Serves the configured site profile over HTTP
//! - Accepts drive commands over WebSocket (control panel profile)
//! - Runs a 50Hz control loop that applies the latest command to the motors
//!
//! # Configuration
//!
//! Read at compile time from `WIFIBOT_*` variables, e.g.
//!
//! ```bash
//! WIFIBOT_MODE=ap WIFIBOT_SSID=wifibot WIFIBOT_PASSWORD=drive-me-123 \
//!     cargo build --release --features esp32-http --bin esp32_main
//!
//! WIFIBOT_MODE=station WIFIBOT_SSID=HomeWifi WIFIBOT_PASSWORD=secret \
//!     WIFIBOT_SITE=greeter cargo build --release --features esp32-http --bin esp32_main
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::OutputPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use tracing::{info, warn};

use rs_wifibot::config::{NetworkMode, WebConfig};
use rs_wifibot::hal::esp32::{
    new_motor_channels, new_status_led, ChannelPins, Esp32HttpServer, Esp32SharedState, Esp32Wifi,
};
use rs_wifibot::services::{site_routes, HttpResponder, StaticAssets};
use rs_wifibot::{Config, MotorController};

/// Compile-time `WIFIBOT_*` values.
fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "WIFIBOT_MODE" => option_env!("WIFIBOT_MODE"),
        "WIFIBOT_SSID" => option_env!("WIFIBOT_SSID"),
        "WIFIBOT_PASSWORD" => option_env!("WIFIBOT_PASSWORD"),
        "WIFIBOT_CHANNEL" => option_env!("WIFIBOT_CHANNEL"),
        "WIFIBOT_PORT" => option_env!("WIFIBOT_PORT"),
        "WIFIBOT_SITE" => option_env!("WIFIBOT_SITE"),
        "WIFIBOT_WS_PATH" => option_env!("WIFIBOT_WS_PATH"),
        "WIFIBOT_NAME" => option_env!("WIFIBOT_NAME"),
        _ => None,
    };
    value.map(String::from)
}

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    info!("================================");
    info!("  rs-wifibot SuperMini");
    info!("================================");

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = Config::default()
        .with_web(WebConfig::default().with_port(80))
        .overlay(build_env)?;

    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // =========================================================================
    // Initialize Motors (DIR/PWM on GPIO6/5 and GPIO7/4)
    // =========================================================================
    let (left, right) = new_motor_channels(
        peripherals.ledc.timer0,
        ChannelPins {
            ledc: peripherals.ledc.channel0,
            dir: pins.gpio6.downgrade_output(),
            pwm: pins.gpio5.downgrade_output(),
        },
        ChannelPins {
            ledc: peripherals.ledc.channel1,
            dir: pins.gpio7.downgrade_output(),
            pwm: pins.gpio4.downgrade_output(),
        },
    )?;
    let mut drive = MotorController::new(left, right)?;
    info!("[OK] Motors initialized, holding at stop");

    // =========================================================================
    // Initialize Status LED (GPIO8)
    // =========================================================================
    let led = new_status_led(pins.gpio8.downgrade_output())?;
    info!("[OK] Status LED initialized (GPIO8)");

    // =========================================================================
    // Initialize WiFi
    // =========================================================================
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    if config.network.mode == NetworkMode::AccessPoint && !config.network.has_valid_ap_password() {
        warn!("[WiFi] AP password shorter than 8 characters, the driver will reject it");
    }
    let wifi = Esp32Wifi::new(peripherals.modem, sysloop, Some(nvs), &config.network)?;
    info!("[OK] WiFi up ({:?}): {:?}", wifi.mode(), wifi.ip_addr());

    // =========================================================================
    // Initialize HTTP Server
    // =========================================================================
    let shared = Arc::new(Mutex::new(Esp32SharedState::default()));
    let routes = site_routes(&config, StaticAssets::embedded(), Arc::clone(&shared));
    let responder = HttpResponder::new(routes, led);
    let _server = Esp32HttpServer::new(&config.web, responder, Arc::clone(&shared))?;

    if let Some(ip) = wifi.ip_addr() {
        info!("  Open http://{}:{}/", ip, config.web.port);
    }
    info!("Starting control loop ({}ms)...", config.drive.loop_interval_ms);

    let tick = Duration::from_millis(u64::from(config.drive.loop_interval_ms));

    // =========================================================================
    // Main Control Loop
    // =========================================================================
    loop {
        let pending = shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take_pending();

        if let Some(cmd) = pending {
            if let Err(e) = drive.apply(cmd) {
                warn!("[Drive] {} failed: {}", cmd, e);
            }
            shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .publish(drive.state(), drive.last_command());
        }

        // Sleep until next tick
        thread::sleep(tick);
    }
}
