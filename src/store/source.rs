// Artifact sources: where the dashboard's JSON exports come from.
//
// A dashboard bundle is either a directory on disk or the same directory
// served from a static web host. The store only sees the ArtifactSource
// trait, so tests can feed it fixtures without touching the network.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Relative path of the coherence/relevance export (required).
pub const COHERENCE_PATH: &str = "data/coherence_scores.json";
/// Relative path of the top-documents export (required).
pub const TOP_DOCS_PATH: &str = "data/top_docs.json";
/// Relative path of the diversity export (optional).
pub const DIVERSITY_PATH: &str = "data/diversity_scores.json";

/// Trait for fetching a bundle artifact by its relative path.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Fetch the artifact's text. A missing artifact is an error.
    async fn fetch(&self, path: &str) -> Result<String>;

    /// Human-readable location, for log lines.
    fn describe(&self) -> String;
}

/// Pick a source for a location string: `http(s)://` URLs go over HTTP,
/// anything else is treated as a local directory.
pub fn source_for(location: &str) -> Result<Box<dyn ArtifactSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(DirSource::new(location)))
    }
}

/// Fetches artifacts from a static web host.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("topicboard/0.1")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ArtifactSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, path);

        debug!(url = %url, "Fetching artifact");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to load {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to load {path}: {status}: {body}");
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read {path} response body"))
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Reads artifacts from a bundle directory on disk.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactSource for DirSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        debug!(path = %full.display(), "Reading artifact");
        tokio::fs::read_to_string(&full)
            .await
            .with_context(|| format!("Failed to load {}", full.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// In-memory artifacts keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    files: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an artifact.
    pub fn with(mut self, path: &str, body: impl Into<String>) -> Self {
        self.files.insert(path.to_string(), body.into());
        self
    }
}

#[async_trait]
impl ArtifactSource for StaticSource {
    async fn fetch(&self, path: &str) -> Result<String> {
        match self.files.get(path) {
            Some(body) => Ok(body.clone()),
            None => anyhow::bail!("Failed to load {path}: not found"),
        }
    }

    fn describe(&self) -> String {
        format!("in-memory ({} artifacts)", self.files.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_source_reports_missing_paths() {
        let source = StaticSource::new().with(COHERENCE_PATH, "{}");
        assert_eq!(source.fetch(COHERENCE_PATH).await.unwrap(), "{}");
        let err = source.fetch(TOP_DOCS_PATH).await.unwrap_err();
        assert!(err.to_string().contains("data/top_docs.json"));
    }

    #[test]
    fn source_for_picks_by_scheme() {
        assert!(source_for("https://example.org/app").is_ok());
        let dir = source_for("./heart-failure-nmtf-34").unwrap();
        assert_eq!(dir.describe(), "./heart-failure-nmtf-34");
    }
}
