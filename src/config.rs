use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::volume::RoundingPolicy;

pub const ENV_PREFIX: &str = "VOLUME_NOTIFY_";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pulse: PulseConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PulseConfig {
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Server address; `None` uses the default server.
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Devices whose label contains this are never announced.
    #[serde(default = "default_ignore_label")]
    pub ignore_label: String,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            client_name: default_client_name(),
            server: None,
            queue_capacity: default_queue_capacity(),
            ignore_label: default_ignore_label(),
        }
    }
}

impl PulseConfig {
    /// Capacity of the event queue, never below one.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

fn default_client_name() -> String {
    "volume-notify".to_string()
}

fn default_queue_capacity() -> usize {
    1
}

fn default_ignore_label() -> String {
    "Monitor".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NotifyConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default)]
    pub rounding: RoundingPolicy,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            rounding: RoundingPolicy::default(),
        }
    }
}

fn default_app_name() -> String {
    "volume-notify".to_string()
}

impl Config {
    /// Defaults overlaid with `VOLUME_NOTIFY_*` variables, sections split on `__`
    /// (e.g. `VOLUME_NOTIFY_NOTIFY__ROUNDING=ceil`).
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        let config: Config = Self::figment().extract()?;

        Ok(config)
    }
}
