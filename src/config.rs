// =============================================================================
// Analysis Configuration — JSON settings with atomic save
// =============================================================================
//
// Indicator periods, signal thresholds and the chunking budget. All fields
// carry serde defaults so that adding new fields never breaks loading an
// older config file.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::IndicatorSettings;
use crate::chunker::ChunkBudget;

/// Environment variable overriding the chunking token budget.
pub const MAX_TOKENS_ENV: &str = "STOCKBOOK_MAX_TOKENS";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub indicators: IndicatorSettings,

    #[serde(default)]
    pub chunking: ChunkBudget,
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            sma_period = config.indicators.sma_period,
            rsi_period = config.indicators.rsi_period,
            max_chunk_size = config.chunking.max_chunk_size(),
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Like [`AnalysisConfig::load`], but any failure yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Persist to `path` by writing a `.tmp` sibling and renaming it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }

    /// Apply `STOCKBOOK_MAX_TOKENS` if it is set to a valid number.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var(MAX_TOKENS_ENV) {
            self.override_max_tokens(&raw);
        }
    }

    fn override_max_tokens(&mut self, raw: &str) {
        match raw.trim().parse::<usize>() {
            Ok(tokens) => {
                self.chunking.max_tokens = tokens;
                info!(max_tokens = tokens, "chunk budget overridden from env");
            }
            Err(e) => warn!(value = raw, error = %e, "ignoring invalid {MAX_TOKENS_ENV}"),
        }
    }
}
