//! WiFi bring-up for ESP32-C3.
//!
//! Two modes, selected by [`NetworkConfig::mode`]:
//!
//! - **Station**: join an existing network and wait for DHCP.
//! - **Access point**: host our own network; clients get addresses from the
//!   built-in DHCP server and reach us at the AP gateway address.
//!
//! Station bring-up blocks until the link is up. With
//! `max_retries == 0` it retries forever; this runs once at boot, before any
//! client can exist.
//!
//! # Example
//!
//! ```ignore
//! use rs_wifibot::hal::esp32::Esp32Wifi;
//! use rs_wifibot::config::NetworkConfig;
//!
//! let config = NetworkConfig::access_point("wifibot", "drive-me-123");
//! let wifi = Esp32Wifi::new(modem, sysloop, nvs, &config)?;
//! println!("IP: {:?}", wifi.ip_addr());
//! ```

use std::net::Ipv4Addr;
use std::thread;
use std::time::Duration;

use anyhow::bail;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{
    AccessPointConfiguration, AuthMethod, BlockingWifi, ClientConfiguration, Configuration,
    EspWifi,
};
use tracing::{info, warn};

use crate::config::{NetworkConfig, NetworkMode};

/// Delay between station connection attempts.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// WiFi radio in station or access-point mode.
///
/// The link is established during construction and kept for the lifetime of
/// this struct.
pub struct Esp32Wifi<'a> {
    wifi: BlockingWifi<EspWifi<'a>>,
    mode: NetworkMode,
}

impl<'a> Esp32Wifi<'a> {
    /// Bring the radio up in the configured mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to initialize, the AP fails to
    /// start, or station connection runs out of retries.
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        config: &NetworkConfig,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        let mut this = Self {
            wifi,
            mode: config.mode,
        };

        match config.mode {
            NetworkMode::Station => this.start_station(config)?,
            NetworkMode::AccessPoint => this.start_access_point(config)?,
        }

        Ok(this)
    }

    fn start_station(&mut self, config: &NetworkConfig) -> anyhow::Result<()> {
        let mut ssid: heapless::String<32> = heapless::String::new();
        let _ = ssid.push_str(config.ssid.as_str());

        let mut password: heapless::String<64> = heapless::String::new();
        let _ = password.push_str(config.password.as_str());

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration {
                ssid,
                password,
                auth_method,
                ..Default::default()
            }))?;

        info!("[WiFi] Starting station...");
        self.wifi.start()?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            info!("[WiFi] Connecting to '{}' (attempt {})...", config.ssid, attempt);

            match self.wifi.connect().and_then(|_| self.wifi.wait_netif_up()) {
                Ok(()) => break,
                Err(e) => {
                    warn!("[WiFi] Connect failed: {:?}", e);
                    if config.max_retries != 0 && attempt >= u32::from(config.max_retries) {
                        bail!("WiFi connect to '{}' failed after {} attempts", config.ssid, attempt);
                    }
                    thread::sleep(RETRY_DELAY);
                }
            }
        }

        if let Some(ip) = self.ip_addr() {
            info!("[WiFi] Connected! IP: {}", ip);
        }
        Ok(())
    }

    fn start_access_point(&mut self, config: &NetworkConfig) -> anyhow::Result<()> {
        let mut ssid: heapless::String<32> = heapless::String::new();
        let _ = ssid.push_str(config.ssid.as_str());

        let mut password: heapless::String<64> = heapless::String::new();
        let _ = password.push_str(config.password.as_str());

        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        self.wifi
            .set_configuration(&Configuration::AccessPoint(AccessPointConfiguration {
                ssid,
                password,
                auth_method,
                channel: config.channel,
                ..Default::default()
            }))?;

        info!("[WiFi] Starting access point '{}'...", config.ssid);
        self.wifi.start()?;
        self.wifi.wait_netif_up()?;

        if let Some(ip) = self.ip_addr() {
            info!("[WiFi] Access point up. IP: {}", ip);
        }
        Ok(())
    }

    /// Our IP address on the active interface.
    pub fn ip_addr(&self) -> Option<Ipv4Addr> {
        let netif = match self.mode {
            NetworkMode::Station => self.wifi.wifi().sta_netif(),
            NetworkMode::AccessPoint => self.wifi.wifi().ap_netif(),
        };
        netif.get_ip_info().ok().map(|info| info.ip)
    }

    /// Mode the radio was brought up in.
    pub fn mode(&self) -> NetworkMode {
        self.mode
    }

    /// Check if the link is up (station connected, or AP started).
    pub fn is_up(&self) -> bool {
        match self.mode {
            NetworkMode::Station => self.wifi.is_connected().unwrap_or(false),
            NetworkMode::AccessPoint => self.wifi.is_started().unwrap_or(false),
        }
    }
}
