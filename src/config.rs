//! Shared configuration system for desktop and ESP32.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`.
//!
//! # Example
//!
//! ```rust
//! use rs_wifibot::config::{Config, NetworkConfig, SiteProfile, WebConfig};
//!
//! // Use defaults (access point + control panel)
//! let config = Config::default();
//!
//! // Or the greeter image on an existing network
//! let config = Config::default()
//!     .with_network(NetworkConfig::station("HomeWifi", "secret123"))
//!     .with_web(WebConfig::default().with_site(SiteProfile::Greeter).with_port(80));
//! ```

use alloc::format;
use alloc::string::String;

use heapless::String as HString;

use crate::error::ConfigError;

/// Maximum length for short config strings (SSIDs, passwords, names)
pub const MAX_SHORT_STRING: usize = 64;

/// Maximum length for longer config strings (paths)
pub const MAX_LONG_STRING: usize = 128;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Type alias for longer config strings
pub type LongString = HString<MAX_LONG_STRING>;

/// Prefix for environment variables read by [`Config::from_lookup`].
pub const ENV_PREFIX: &str = "WIFIBOT_";

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

fn truncated<const N: usize>(s: &str) -> HString<N> {
    let mut hs = HString::new();
    let mut end = s.len().min(N);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let _ = hs.push_str(&s[..end]);
    hs
}

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    truncated(s)
}

/// Create a LongString from a &str, truncating if too long
pub fn long_string(s: &str) -> LongString {
    truncated(s)
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// WiFi bring-up
    pub network: NetworkConfig,
    /// HTTP and WebSocket server
    pub web: WebConfig,
    /// Drive control loop
    pub drive: DriveConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set network configuration
    pub fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = network;
        self
    }

    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set drive configuration
    pub fn with_drive(mut self, drive: DriveConfig) -> Self {
        self.drive = drive;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Overlay `WIFIBOT_*` values from `lookup` on top of `self`.
    ///
    /// `lookup` receives the full variable name (e.g. `WIFIBOT_PORT`) and
    /// returns its value if set. Recognised keys: `MODE`, `SSID`, `PASSWORD`,
    /// `CHANNEL`, `PORT`, `SITE`, `WS_PATH`, `NAME`, `ASSETS_DIR`.
    ///
    /// ```rust
    /// use rs_wifibot::config::{Config, NetworkMode};
    ///
    /// let config = Config::default()
    ///     .overlay(|key| match key {
    ///         "WIFIBOT_MODE" => Some("station".into()),
    ///         "WIFIBOT_PORT" => Some("3000".into()),
    ///         _ => None,
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(config.network.mode, NetworkMode::Station);
    /// assert_eq!(config.web.port, 3000);
    /// ```
    pub fn overlay<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(v) = get("MODE") {
            self.network.mode = NetworkMode::from_text(&v).ok_or_else(|| ConfigError::invalid("MODE", &v))?;
        }
        if let Some(v) = get("SSID") {
            self.network.ssid = short_string(&v);
        }
        if let Some(v) = get("PASSWORD") {
            self.network.password = short_string(&v);
        }
        if let Some(v) = get("CHANNEL") {
            self.network.channel = match v.trim().parse::<u8>() {
                Ok(ch @ 1..=13) => ch,
                _ => return Err(ConfigError::invalid("CHANNEL", &v)),
            };
        }
        if let Some(v) = get("PORT") {
            self.web.port = match v.trim().parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(ConfigError::invalid("PORT", &v)),
            };
        }
        if let Some(v) = get("SITE") {
            self.web.site = SiteProfile::from_text(&v).ok_or_else(|| ConfigError::invalid("SITE", &v))?;
        }
        if let Some(v) = get("WS_PATH") {
            if !v.starts_with('/') {
                return Err(ConfigError::invalid("WS_PATH", &v));
            }
            self.web.ws_path = short_string(&v);
        }
        if let Some(v) = get("NAME") {
            self.device.name = short_string(&v);
        }
        if let Some(v) = get("ASSETS_DIR") {
            self.web.assets_dir = long_string(&v);
        }

        Ok(self)
    }

    /// Defaults overlaid with whatever `lookup` provides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().overlay(lookup)
    }

    /// Defaults overlaid with `WIFIBOT_*` process environment variables.
    #[cfg(feature = "std")]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

// ============================================================================
// Network Config
// ============================================================================

/// How the radio is brought up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NetworkMode {
    /// Join an existing network.
    Station,
    /// Host our own network.
    #[default]
    AccessPoint,
}

impl NetworkMode {
    /// Parse `station`/`sta` or `ap`/`access_point` (case-insensitive).
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("station") || s.eq_ignore_ascii_case("sta") {
            Some(NetworkMode::Station)
        } else if s.eq_ignore_ascii_case("ap")
            || s.eq_ignore_ascii_case("access_point")
            || s.eq_ignore_ascii_case("access-point")
        {
            Some(NetworkMode::AccessPoint)
        } else {
            None
        }
    }
}

/// WiFi configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Station or access point
    pub mode: NetworkMode,
    /// Network to join (station) or to host (access point)
    pub ssid: ShortString,
    /// WiFi password (empty = open network)
    pub password: ShortString,
    /// Radio channel when hosting (1-13)
    pub channel: u8,
    /// Station connection attempts before giving up (0 = unlimited)
    pub max_retries: u8,
    /// Whether WiFi is enabled
    pub enabled: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mode: NetworkMode::AccessPoint,
            ssid: short_string("wifibot"),
            password: ShortString::new(),
            channel: 1,
            max_retries: 0,
            enabled: true,
        }
    }
}

impl NetworkConfig {
    /// Station mode with the given credentials
    pub fn station(ssid: &str, password: &str) -> Self {
        Self::default()
            .with_mode(NetworkMode::Station)
            .with_ssid(ssid)
            .with_password(password)
    }

    /// Access-point mode with the given credentials
    pub fn access_point(ssid: &str, password: &str) -> Self {
        Self::default()
            .with_mode(NetworkMode::AccessPoint)
            .with_ssid(ssid)
            .with_password(password)
    }

    /// Set the mode
    pub fn with_mode(mut self, mode: NetworkMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the SSID
    pub fn with_ssid(mut self, ssid: &str) -> Self {
        self.ssid = short_string(ssid);
        self
    }

    /// Set the password
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = short_string(password);
        self
    }

    /// Set the AP channel (clamped to 1-13)
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel.clamp(1, 13);
        self
    }

    /// Set the maximum retry count
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Enable or disable WiFi
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check if an SSID is configured
    pub fn is_configured(&self) -> bool {
        !self.ssid.is_empty()
    }

    /// Access points need no password or one of at least 8 characters (WPA2).
    pub fn has_valid_ap_password(&self) -> bool {
        self.password.is_empty() || self.password.len() >= 8
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Which set of pages the HTTP responder serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SiteProfile {
    /// Plain-text greeting routes, no realtime channel.
    Greeter,
    /// Control page, stylesheet and the WebSocket command channel.
    #[default]
    ControlPanel,
}

impl SiteProfile {
    /// Parse `greeter` or `control`/`control_panel` (case-insensitive).
    pub fn from_text(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("greeter") {
            Some(SiteProfile::Greeter)
        } else if s.eq_ignore_ascii_case("control")
            || s.eq_ignore_ascii_case("control_panel")
            || s.eq_ignore_ascii_case("control-panel")
        {
            Some(SiteProfile::ControlPanel)
        } else {
            None
        }
    }

    /// Whether this profile exposes the WebSocket command channel.
    pub const fn has_realtime(&self) -> bool {
        matches!(self, SiteProfile::ControlPanel)
    }
}

/// Web server configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// Port to listen on
    pub port: u16,
    /// Pages to serve
    pub site: SiteProfile,
    /// WebSocket endpoint path
    pub ws_path: ShortString,
    /// Directory holding `index.html` and `style.css` (empty = embedded copies)
    pub assets_dir: LongString,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
    /// Whether web server is enabled
    pub enabled: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            site: SiteProfile::ControlPanel,
            ws_path: short_string("/ws"),
            assets_dir: LongString::new(),
            cors_permissive: true,
            enabled: true,
        }
    }
}

impl WebConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the site profile
    pub fn with_site(mut self, site: SiteProfile) -> Self {
        self.site = site;
        self
    }

    /// Set the WebSocket path
    pub fn with_ws_path(mut self, path: &str) -> Self {
        self.ws_path = short_string(path);
        self
    }

    /// Set the static assets directory
    pub fn with_assets_dir(mut self, dir: &str) -> Self {
        self.assets_dir = long_string(dir);
        self
    }

    /// Set CORS mode
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Enable or disable web server
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// ============================================================================
// Drive Config
// ============================================================================

/// Drive control loop configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveConfig {
    /// Control loop interval in milliseconds
    pub loop_interval_ms: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            loop_interval_ms: 20,
        }
    }
}

impl DriveConfig {
    /// Set the loop interval (at least 1ms)
    pub fn with_loop_interval_ms(mut self, ms: u32) -> Self {
        self.loop_interval_ms = ms.max(1);
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable device name (used in the greeting)
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("wifibot"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
