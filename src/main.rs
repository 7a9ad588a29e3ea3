// =============================================================================
// Stockbook — command-line entry point
// =============================================================================
//
// Reads a price-record JSON file or a text file, runs the indicator engine or
// the chunker on it and prints the result as JSON on stdout. Logs go to
// stderr.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockbook_analysis::{
    compute_indicators, split_into_chunks, AnalysisConfig, IndicatorSettings, PriceHistory,
    SignalSnapshot, TechnicalIndicators,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, env = "STOCKBOOK_CONFIG", default_value = "stockbook.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute SMA, RSI and MACD for a JSON array of {date, close, volume?}
    Indicators {
        /// Path to the price records
        #[arg(short, long)]
        input: PathBuf,

        /// Print this many of the most recent values per indicator
        /// (defaults to the configured scoring window)
        #[arg(long, conflicts_with = "all")]
        latest: Option<usize>,

        /// Print the full series instead of the scoring window
        #[arg(long)]
        all: bool,
    },

    /// Split a text file into bounded chunks
    Chunk {
        /// Path to the text file
        #[arg(short, long)]
        input: PathBuf,

        /// Character limit per chunk (defaults to the configured token budget)
        #[arg(long)]
        max_chars: Option<usize>,
    },
}

#[derive(Serialize)]
struct IndicatorReport {
    samples: usize,
    indicators: TechnicalIndicators,
    signals: SignalSnapshot,
}

#[derive(Serialize)]
struct ChunkReport {
    max_chunk_size: usize,
    chunks: Vec<String>,
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AnalysisConfig::load_or_default(&cli.config);
    config.apply_env_overrides();

    let output = match cli.command {
        Commands::Indicators { input, latest, all } => {
            let json = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read price records from {}", input.display()))?;
            let history = PriceHistory::from_json(&json)
                .with_context(|| format!("invalid price records in {}", input.display()))?;

            let settings = &config.indicators;
            let indicators = compute_indicators(&history, settings);
            let signals = indicators.signals(&history, settings);
            let indicators = report_window(indicators, settings, all, latest);

            info!(
                samples = history.len(),
                rsi_zone = %signals
                    .rsi_zone
                    .map_or_else(|| "UNAVAILABLE".to_string(), |zone| zone.to_string()),
                labels = ?signals.labels,
                "indicator report ready"
            );

            serde_json::to_string_pretty(&IndicatorReport {
                samples: history.len(),
                indicators,
                signals,
            })?
        }
        Commands::Chunk { input, max_chars } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("failed to read text from {}", input.display()))?;

            let max_chunk_size = max_chars.unwrap_or_else(|| config.chunking.max_chunk_size());
            let chunks = split_into_chunks(&text, max_chunk_size);

            info!(
                chunks = chunks.len(),
                max_chunk_size,
                "Processing text in chunks"
            );

            serde_json::to_string_pretty(&ChunkReport {
                max_chunk_size,
                chunks,
            })?
        }
    };

    println!("{output}");
    Ok(())
}

/// Full series with `--all`, `--latest n` values, or the scoring window.
fn report_window(
    indicators: TechnicalIndicators,
    settings: &IndicatorSettings,
    all: bool,
    latest: Option<usize>,
) -> TechnicalIndicators {
    match (all, latest) {
        (true, _) => indicators,
        (false, Some(n)) => indicators.latest(n),
        (false, None) => indicators.for_scoring(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> TechnicalIndicators {
        let records: Vec<String> = (1..=28)
            .map(|i| format!(r#"{{"date": "2024-03-{i:02}", "close": {i}}}"#))
            .collect();
        let json = format!("[{}]", records.join(","));
        let history = PriceHistory::from_json(&json).unwrap();
        let settings = IndicatorSettings {
            sma_period: 3,
            ..IndicatorSettings::default()
        };
        compute_indicators(&history, &settings)
    }

    #[test]
    fn default_window_is_the_configured_scoring_window() {
        let settings = IndicatorSettings::default();
        let out = report_window(bundle(), &settings, false, None);
        assert_eq!(out.sma.len(), settings.latest_window);
    }

    #[test]
    fn explicit_latest_and_all() {
        let settings = IndicatorSettings::default();
        assert_eq!(report_window(bundle(), &settings, false, Some(2)).sma.len(), 2);
        assert_eq!(report_window(bundle(), &settings, true, None).sma.len(), 26);
    }

    #[test]
    fn cli_parses_indicator_flags() {
        let cli = Cli::try_parse_from(["stockbook", "indicators", "--input", "p.json"]).unwrap();
        match cli.command {
            Commands::Indicators { latest, all, .. } => {
                assert_eq!(latest, None);
                assert!(!all);
            }
            Commands::Chunk { .. } => panic!("expected indicators"),
        }

        assert!(Cli::try_parse_from([
            "stockbook", "indicators", "--input", "p.json", "--all", "--latest", "3",
        ])
        .is_err());
    }
}
