use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::output::DEFAULT_LOW_COHERENCE;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command
/// line flags override these values.
#[derive(Debug, Clone)]
pub struct Config {
    /// Dashboard bundle to read: a directory or an http(s) base URL
    pub source: String,
    /// Directory scanned by `bundle-all`
    pub generate_from: PathBuf,
    /// Coherence below this is shown as low
    pub low_coherence: f64,
}

impl Config {
    /// Load configuration from environment variables. Every value has a default.
    pub fn load() -> Result<Self> {
        let low_coherence = match env::var("TOPICBOARD_LOW_COHERENCE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("TOPICBOARD_LOW_COHERENCE is not a number: {raw}"))?,
            Err(_) => DEFAULT_LOW_COHERENCE,
        };

        Ok(Self {
            source: env::var("TOPICBOARD_SOURCE").unwrap_or_else(|_| ".".to_string()),
            generate_from: env::var("TOPICBOARD_GENERATE_FROM")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("to_generate_from")),
            low_coherence,
        })
    }

    /// Check that the coherence threshold is usable.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.low_coherence) {
            anyhow::bail!(
                "TOPICBOARD_LOW_COHERENCE must be between 0 and 1, got {}",
                self.low_coherence
            );
        }
        Ok(())
    }
}
