use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub charts: ChartSettings,
    /// SMS delivery is disabled when this section is absent.
    pub twilio: Option<TwilioSettings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    /// Signal the usage chart scans for on/off duty cycles.
    #[serde(default = "default_usage_metric")]
    pub usage_metric: String,
    /// Fixed display offset in seconds; defaults to the server's local zone
    /// (re-evaluated per request, so DST shifts are picked up).
    pub display_offset_secs: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TwilioSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            usage_metric: default_usage_metric(),
            display_offset_secs: None,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_usage_metric() -> String {
    "flame_v_ave".to_string()
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(config::Environment::with_prefix("UPTIME").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
