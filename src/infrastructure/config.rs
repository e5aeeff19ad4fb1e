use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub http: HttpSettings,
    pub positions: PositionSettings,
    pub tracks: TrackSettings,
    pub waves: WaveSettings,
    pub map: MapSettings,
}

/// Longest lookback accepted for track history and wave windows (30 days).
pub const MAX_WINDOW_HOURS: i64 = 24 * 30;

impl Settings {
    /// Reject values that would make time arithmetic or polling panic later.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_WINDOW_HOURS).contains(&self.tracks.lookback_hours),
            "tracks.lookback_hours must be between 1 and {}, got {}",
            MAX_WINDOW_HOURS,
            self.tracks.lookback_hours
        );
        anyhow::ensure!(
            (1..=MAX_WINDOW_HOURS).contains(&self.waves.window_hours),
            "waves.window_hours must be between 1 and {}, got {}",
            MAX_WINDOW_HOURS,
            self.waves.window_hours
        );
        anyhow::ensure!(
            (1..=24 * 60).contains(&self.waves.poll_minutes),
            "waves.poll_minutes must be between 1 and 1440, got {}",
            self.waves.poll_minutes
        );
        anyhow::ensure!(
            self.http.timeout_secs >= 1,
            "http.timeout_secs must be at least 1"
        );
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PositionSettings {
    pub base_url: String,
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://meri.digitraffic.fi/api/ais/v1/locations".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrackSettings {
    pub lookback_hours: i64,
    pub default_color: String,
    /// Existing layer the track layers are inserted beneath, e.g. vessel icons.
    pub before_layer: Option<String>,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            lookback_hours: 24,
            default_color: "#ff6600".to_string(),
            before_layer: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WaveSettings {
    pub base_url: String,
    pub stored_query: String,
    pub window_hours: i64,
    pub poll_minutes: u64,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            base_url: "https://opendata.fmi.fi/wfs".to_string(),
            stored_query: "fmi::observations::wave::multipointcoverage".to_string(),
            window_hours: 1,
            poll_minutes: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MapSettings {
    pub bounds: Bounds,
}

/// Geographic viewport in decimal degrees.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl Default for Bounds {
    // Baltic Sea region covered by the AIS collector
    fn default() -> Self {
        Self {
            min_lon: 17.0,
            max_lon: 30.3,
            min_lat: 58.5,
            max_lat: 66.0,
        }
    }
}

/// `config/overlay.{toml,yaml,json}` if present, or the file named by
/// `OVERLAY_CONFIG`, overridden by `OVERLAY__*` environment variables
/// (e.g. `OVERLAY__SERVER__PORT=9000`).
pub fn load_settings() -> anyhow::Result<Settings> {
    if let Some(path) = std::env::var_os("OVERLAY_CONFIG") {
        return load_settings_file(Path::new(&path));
    }

    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/overlay").required(false))
        .add_source(environment())
        .build()
        .context("Failed to load overlay settings")?;

    let settings: Settings = settings.try_deserialize()?;
    settings.validate().context("Invalid overlay settings")?;
    Ok(settings)
}

pub fn load_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;

    let settings: Settings = settings.try_deserialize()?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("OVERLAY")
        .separator("__")
        .try_parsing(true)
}
