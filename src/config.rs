use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub live: LiveConfig,
    pub media: MediaConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Settings for the live model gateway
#[derive(Debug, Deserialize)]
pub struct LiveConfig {
    pub nats_url: String,
    pub model: String,
    pub response_modalities: Vec<String>,
}

/// Audio format the live gateway expects from the capture widget
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
