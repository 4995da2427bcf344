//! Configuration loading and controller factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quickread_core::config::{ControllerConfig, PlaybackConfig};
use quickread_core::controller::SessionController;
use quickread_core::traits::ContentProvider;

use crate::feedback::FeedbackTable;
use crate::paragraphs::StaticParagraphProvider;
use crate::quiz_tables::QuizTables;

/// Top-level quickread configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickreadConfig {
    /// Reading speed of a new session, in words per minute.
    #[serde(default = "default_speed")]
    pub default_speed: u32,
    #[serde(default = "default_min_speed")]
    pub min_speed: u32,
    #[serde(default = "default_max_speed")]
    pub max_speed: u32,
    /// Pause between the last word and the quiz.
    #[serde(default = "default_quiz_delay")]
    pub quiz_delay_ms: u64,
    /// Simulated latency of the built-in paragraph provider.
    #[serde(default = "default_generation_delay")]
    pub generation_delay_ms: u64,
}

fn default_speed() -> u32 {
    300
}
fn default_min_speed() -> u32 {
    100
}
fn default_max_speed() -> u32 {
    1000
}
fn default_quiz_delay() -> u64 {
    1000
}
fn default_generation_delay() -> u64 {
    2000
}

impl Default for QuickreadConfig {
    fn default() -> Self {
        Self {
            default_speed: default_speed(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            quiz_delay_ms: default_quiz_delay(),
            generation_delay_ms: default_generation_delay(),
        }
    }
}

/// Fastest supported speed: one word per millisecond.
pub const MAX_SPEED_LIMIT: u32 = 60_000;

impl QuickreadConfig {
    /// Reject speed bounds that cannot drive playback.
    pub fn validate(&self) -> Result<()> {
        if self.min_speed == 0 {
            anyhow::bail!("min_speed must be greater than zero");
        }
        if self.min_speed > self.max_speed {
            anyhow::bail!(
                "min_speed ({}) is greater than max_speed ({})",
                self.min_speed,
                self.max_speed
            );
        }
        if self.max_speed > MAX_SPEED_LIMIT {
            anyhow::bail!(
                "max_speed ({}) exceeds the supported limit of {MAX_SPEED_LIMIT}",
                self.max_speed
            );
        }
        Ok(())
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            playback: PlaybackConfig {
                min_rate: self.min_speed,
                max_rate: self.max_speed,
                default_rate: self.default_speed,
            },
            quiz_delay: Duration::from_millis(self.quiz_delay_ms),
        }
    }

    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_delay_ms)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quickread.toml` in the current directory
/// 2. `~/.config/quickread/config.toml`
///
/// Environment variable override: `QUICKREAD_DEFAULT_SPEED`.
pub fn load_config() -> Result<QuickreadConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuickreadConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quickread.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuickreadConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuickreadConfig::default(),
    };

    if let Ok(speed) = std::env::var("QUICKREAD_DEFAULT_SPEED") {
        config.default_speed = speed
            .trim()
            .parse()
            .with_context(|| format!("invalid QUICKREAD_DEFAULT_SPEED: {speed}"))?;
    }

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quickread"))
}

/// Starter config written by `quickread init`.
pub fn starter_config() -> Result<String> {
    let body = toml::to_string_pretty(&QuickreadConfig::default())
        .context("failed to serialize default config")?;
    Ok(format!("# quickread configuration\n\n{body}"))
}

/// Build a controller wired to the built-in Portuguese content.
pub fn create_controller(config: &QuickreadConfig) -> SessionController {
    let provider: Arc<dyn ContentProvider> =
        Arc::new(StaticParagraphProvider::new(config.generation_delay()));
    create_controller_with(config, provider)
}

/// Build a controller with the built-in tables and a custom provider.
pub fn create_controller_with(
    config: &QuickreadConfig,
    provider: Arc<dyn ContentProvider>,
) -> SessionController {
    SessionController::new(
        config.controller_config(),
        provider,
        Arc::new(QuizTables::default()),
        Arc::new(FeedbackTable::default()),
    )
}
