//! Bureau configuration loader.

use std::path::Path;

use bureau_core::BureauConfig;

use crate::loaders::{LoadResult, read_file};

/// On-disk formats accepted by [`ConfigLoader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    /// Picks the format from the file extension. Anything but `.ron` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => ConfigFormat::Ron,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Loader for bureau configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from a TOML or RON file, chosen by extension.
    pub fn load(path: &Path) -> LoadResult<BureauConfig> {
        let content = read_file(path)?;
        Self::parse(&content, ConfigFormat::from_path(path))
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse config text in the given format and check it for sanity.
    pub fn parse(content: &str, format: ConfigFormat) -> LoadResult<BureauConfig> {
        let config: BureauConfig = match format {
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?,
            ConfigFormat::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config RON: {}", e))?,
        };
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &BureauConfig) -> LoadResult<()> {
        let copier = &config.photocopier;
        anyhow::ensure!(copier.tray_capacity > 0, "tray_capacity must be positive");
        anyhow::ensure!(copier.ink_per_use > 0, "ink_per_use must be positive");
        anyhow::ensure!(
            copier.ink_per_use <= copier.cartridge_capacity,
            "ink_per_use ({}) exceeds cartridge_capacity ({})",
            copier.ink_per_use,
            copier.cartridge_capacity
        );

        let bubble = &config.chat_bubble;
        anyhow::ensure!(bubble.max_chars > 0, "max_chars must be positive");
        anyhow::ensure!(
            bubble.chars_per_second.is_finite() && bubble.chars_per_second > 0.0,
            "chars_per_second must be positive"
        );
        anyhow::ensure!(
            bubble.min_display_secs.is_finite() && bubble.min_display_secs >= 0.0,
            "min_display_secs must be a non-negative number of seconds"
        );
        anyhow::ensure!(
            bubble.max_display_secs.is_finite() && bubble.max_display_secs >= 0.0,
            "max_display_secs must be a non-negative number of seconds"
        );
        anyhow::ensure!(
            bubble.min_display_secs <= bubble.max_display_secs,
            "min_display_secs exceeds max_display_secs"
        );
        Ok(())
    }
}
