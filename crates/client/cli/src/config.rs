//! CLI configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use bureau_content::ConfigLoader;
use bureau_core::BureauConfig;
use bureau_runtime::RuntimeConfig;

/// Configuration required to bootstrap the runtime and the console session.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub bureau: BureauConfig,
    pub runtime: RuntimeConfig,
    pub devices: usize,
    /// Whether chat lines are shown as bubbles or just toggle the typing icon.
    pub chat_bubbles: bool,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `BUREAU_CONFIG`: TOML or RON file with appliance and chat settings
    /// - `BUREAU_DEVICES`
    /// - `BUREAU_EVENT_BUFFER` / `BUREAU_COMMAND_BUFFER`
    /// - `BUREAU_CHAT_BUBBLES`
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            devices: 1,
            chat_bubbles: true,
            ..Self::default()
        };

        if let Some(path) = env::var_os("BUREAU_CONFIG").map(PathBuf::from) {
            config.bureau = ConfigLoader::load(&path)?;
            tracing::info!("Loaded config from {}", path.display());
        }
        config.runtime.photocopier = config.bureau.photocopier.clone();

        if let Some(devices) = read_env::<usize>("BUREAU_DEVICES") {
            config.devices = devices.max(1);
        }

        if let Some(capacity) = read_env::<usize>("BUREAU_EVENT_BUFFER") {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>("BUREAU_COMMAND_BUFFER") {
            config.runtime.command_buffer_size = capacity.max(1);
        }

        if let Some(enabled) = read_env::<bool>("BUREAU_CHAT_BUBBLES") {
            config.chat_bubbles = enabled;
        }

        Ok(config)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
