use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub transcription: TranscriptionConfig,
    pub storage: StorageConfig,
    pub nats: NatsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Default provider when the client doesn't name one
    #[serde(default)]
    pub default_provider: String,

    /// Speech service API key; empty means the remote provider is
    /// unavailable and the factory falls back to the substitute
    #[serde(default)]
    pub api_key: String,

    /// Speech service base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Seconds between job status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Hard ceiling on total polling time
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Grace period before a completed session record is evicted
    #[serde(default = "default_eviction_grace")]
    pub eviction_grace_secs: u64,
}

fn default_api_base() -> String {
    "https://api.assemblyai.com/v2".to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_poll_timeout() -> u64 {
    30 * 60
}

fn default_eviction_grace() -> u64 {
    5 * 60
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            default_provider: String::new(),
            api_key: String::new(),
            api_base: default_api_base(),
            poll_interval_secs: default_poll_interval(),
            poll_timeout_secs: default_poll_timeout(),
            eviction_grace_secs: default_eviction_grace(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory where finalized session audio is written
    pub uploads_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL for lifecycle events
    pub url: String,

    /// Disable to run without a broker (events are dropped)
    #[serde(default = "default_nats_enabled")]
    pub enabled: bool,
}

fn default_nats_enabled() -> bool {
    true
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
