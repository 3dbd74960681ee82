// Topic data store. Loads a dashboard bundle's JSON exports once and
// answers normalized queries against them.
//
// Queries are synchronous projections over already-loaded state. Before a
// successful load (or after a failed one) every query returns an empty or
// zero-valued default rather than stale data.

pub mod keys;
pub mod models;
pub mod source;

use anyhow::{Context, Result};
use futures::future::try_join;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use keys::{document_key, parse_topic_key, relevance_key, wordcloud_path};
use models::{
    parse_document_entry, CoherenceDataset, CoherenceScore, DiversityDataset, DiversityMetrics,
    TopDocument, TopDocuments, TopWord, TopicSummary,
};
use source::{ArtifactSource, COHERENCE_PATH, DIVERSITY_PATH, TOP_DOCS_PATH};

/// Words shown in the topic detail view when no limit is given.
pub const DEFAULT_WORD_LIMIT: usize = 30;
/// Documents shown per topic when no limit is given.
pub const DEFAULT_DOCUMENT_LIMIT: usize = 10;
/// Words shown on each topic grid card.
pub const SUMMARY_WORD_LIMIT: usize = 5;
/// Words joined into a topic's short label.
pub const LABEL_WORD_LIMIT: usize = 3;

struct Datasets {
    coherence: CoherenceDataset,
    top_docs: TopDocuments,
    /// None when the optional diversity export could not be loaded
    diversity: Option<DiversityDataset>,
}

enum LoadState {
    NotLoaded,
    Loaded(Datasets),
    Failed,
}

/// Owns the loaded datasets for one dashboard bundle.
pub struct TopicDataStore {
    source: Box<dyn ArtifactSource>,
    state: LoadState,
}

impl TopicDataStore {
    pub fn new(source: Box<dyn ArtifactSource>) -> Self {
        Self {
            source,
            state: LoadState::NotLoaded,
        }
    }

    /// Fetch all three exports, replacing any previously loaded state.
    ///
    /// The coherence and top-documents exports are fetched concurrently and
    /// both must succeed. The diversity export is attempted afterwards; if it
    /// is missing or malformed the store records it as unavailable and the
    /// load still succeeds.
    pub async fn load_all(&mut self) -> Result<()> {
        let source = self.source.as_ref();

        let required = try_join(
            fetch_json::<CoherenceDataset>(source, COHERENCE_PATH),
            fetch_json::<TopDocuments>(source, TOP_DOCS_PATH),
        )
        .await;

        let (coherence, top_docs) = match required {
            Ok(pair) => pair,
            Err(e) => {
                self.state = LoadState::Failed;
                error!(source = %source.describe(), error = %e, "Error loading data");
                return Err(e.context(format!("Failed to load data from {}", source.describe())));
            }
        };

        let diversity = match fetch_json::<DiversityDataset>(source, DIVERSITY_PATH).await {
            Ok(diversity) => Some(diversity),
            Err(e) => {
                info!(error = %e, "Diversity scores not available");
                None
            }
        };

        info!(
            source = %source.describe(),
            topics = coherence.topic_count(),
            diversity = diversity.is_some(),
            "Topic data loaded"
        );

        self.state = LoadState::Loaded(Datasets {
            coherence,
            top_docs,
            diversity,
        });
        Ok(())
    }

    /// True only after a successful `load_all`.
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    fn datasets(&self) -> Option<&Datasets> {
        match &self.state {
            LoadState::Loaded(datasets) => Some(datasets),
            LoadState::NotLoaded | LoadState::Failed => None,
        }
    }

    pub fn topic_count(&self) -> usize {
        self.datasets()
            .map(|d| d.coherence.topic_count())
            .unwrap_or(0)
    }

    pub fn average_coherence(&self) -> f64 {
        self.datasets()
            .and_then(|d| d.coherence.gensim.as_ref())
            .and_then(|g| g.c_v_average)
            .unwrap_or(0.0)
    }

    /// Per-topic coherence, ascending by topic number.
    ///
    /// Entries with an unrecognized key or a non-numeric score are skipped.
    pub fn coherence_scores(&self) -> Vec<CoherenceScore> {
        let Some(per_topic) = self.datasets().and_then(|d| d.coherence.per_topic()) else {
            return Vec::new();
        };

        let mut scores: Vec<CoherenceScore> = per_topic
            .iter()
            .filter_map(|(key, value)| {
                let Some(topic_num) = parse_topic_key(key) else {
                    warn!(key = key.as_str(), "Skipping unrecognized topic key");
                    return None;
                };
                let Some(score) = value.as_f64() else {
                    warn!(key = key.as_str(), "Skipping non-numeric coherence score");
                    return None;
                };
                Some(CoherenceScore { topic_num, score })
            })
            .collect();

        scores.sort_by_key(|s| s.topic_num);
        scores
    }

    /// Coherence of a single topic, 0.0 if the topic has no score.
    pub fn coherence_for(&self, topic_num: u32) -> f64 {
        self.coherence_scores()
            .into_iter()
            .find(|s| s.topic_num == topic_num)
            .map(|s| s.score)
            .unwrap_or(0.0)
    }

    /// The first `limit` words of a topic's relevance ranking, in source order.
    pub fn top_words(&self, topic_num: u32, limit: usize) -> Vec<TopWord> {
        let Some(words) = self.relevance_entry(topic_num) else {
            return Vec::new();
        };

        words
            .iter()
            .filter_map(|(word, score)| {
                Some(TopWord {
                    word: word.replace('_', " "),
                    score: score.as_f64()?,
                })
            })
            .take(limit)
            .collect()
    }

    // Relevance is keyed `topic_NN` only; a `Topic N` key here is not a match.
    fn relevance_entry(&self, topic_num: u32) -> Option<&Map<String, Value>> {
        self.datasets()?
            .coherence
            .relevance
            .as_ref()?
            .get(&relevance_key(topic_num))?
            .as_object()
    }

    /// A topic's representative documents, highest score first.
    pub fn top_documents(&self, topic_num: u32, limit: usize) -> Vec<TopDocument> {
        let Some(docs) = self
            .datasets()
            .and_then(|d| d.top_docs.0.get(&document_key(topic_num)))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        let mut documents: Vec<TopDocument> = docs
            .iter()
            .filter_map(|(id, raw)| {
                let Some(raw) = raw.as_str() else {
                    warn!(topic = topic_num, id = id.as_str(), "Skipping non-text document entry");
                    return None;
                };
                let (text, score) = parse_document_entry(raw);
                Some(TopDocument {
                    id: id.clone(),
                    text,
                    score,
                })
            })
            .collect();

        // sort_by is stable, so tied scores keep source order
        documents.sort_by(|a, b| b.score.total_cmp(&a.score));
        documents.truncate(limit);
        documents
    }

    /// None means the diversity export was never loaded, which is distinct
    /// from a loaded export whose values are zero.
    pub fn diversity_metrics(&self) -> Option<DiversityMetrics> {
        self.datasets()?
            .diversity
            .as_ref()
            .map(DiversityMetrics::from)
    }

    /// One card per scored topic, ascending by topic number.
    pub fn topic_summaries(&self) -> Vec<TopicSummary> {
        self.coherence_scores()
            .into_iter()
            .map(|CoherenceScore { topic_num, score }| TopicSummary {
                topic_num,
                coherence: score,
                top_words: self.top_words(topic_num, SUMMARY_WORD_LIMIT),
                wordcloud_path: wordcloud_path(topic_num),
            })
            .collect()
    }

    /// Short label built from a topic's top three words.
    pub fn topic_label(&self, topic_num: u32) -> String {
        let words = self.top_words(topic_num, LABEL_WORD_LIMIT);
        if words.is_empty() {
            return keys::topic_label(topic_num);
        }
        words
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

async fn fetch_json<T: DeserializeOwned>(source: &dyn ArtifactSource, path: &str) -> Result<T> {
    let body = source.fetch(path).await?;
    serde_json::from_str(&body).with_context(|| format!("Failed to parse {path}"))
}
