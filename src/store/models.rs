// Raw upstream datasets and the view models derived from them.
//
// The raw types mirror the JSON exports loosely. Every section is optional
// and topic-keyed maps stay as ordered JSON maps so that source order (the
// upstream relevance ranking) survives deserialization. The view models are
// fresh projections built on every query.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `data/coherence_scores.json`: word relevance plus gensim C_V scores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoherenceDataset {
    /// topic key (`topic_01`) -> { word -> relevance }, rank order preserved
    #[serde(default)]
    pub relevance: Option<Map<String, Value>>,
    #[serde(default)]
    pub gensim: Option<GensimScores>,
}

/// The `gensim` section of the coherence export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GensimScores {
    #[serde(default)]
    pub c_v_average: Option<f64>,
    /// topic key (either format) -> C_V score
    #[serde(default)]
    pub c_v_per_topic: Option<Map<String, Value>>,
}

impl CoherenceDataset {
    /// Number of topics, counted from the relevance map first and the
    /// per-topic coherence map second. Zero when neither is present.
    pub fn topic_count(&self) -> usize {
        if let Some(relevance) = &self.relevance {
            return relevance.len();
        }
        self.per_topic().map(Map::len).unwrap_or(0)
    }

    pub fn per_topic(&self) -> Option<&Map<String, Value>> {
        self.gensim.as_ref()?.c_v_per_topic.as_ref()
    }
}

/// `data/top_docs.json`: `"Topic N"` -> { document id -> "<text>:<score>" }.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TopDocuments(pub Map<String, Value>);

/// `data/diversity_scores.json`: optional vocabulary diversity export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiversityDataset {
    #[serde(default)]
    pub proportion_unique_words: Option<f64>,
    #[serde(default)]
    pub average_jaccard_diversity: Option<f64>,
    #[serde(default)]
    pub diversity_summary: Option<DiversitySummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiversitySummary {
    #[serde(default)]
    pub overall_diversity_score: Option<f64>,
    /// Often exported as a float (`4210.0`); anything non-integral is None
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_unique_words: Option<u64>,
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| {
        v.as_u64().or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        })
    }))
}

/// One topic's C_V coherence score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoherenceScore {
    pub topic_num: u32,
    pub score: f64,
}

/// A ranked word with its relevance score. Underscores are already
/// replaced with spaces for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopWord {
    pub word: String,
    pub score: f64,
}

/// A representative document for a topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopDocument {
    pub id: String,
    pub text: String,
    pub score: f64,
}

/// Structured view of the diversity export. Individual fields may still be
/// missing from an otherwise loaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityMetrics {
    pub proportion_unique: Option<f64>,
    pub avg_jaccard: Option<f64>,
    pub overall_score: Option<f64>,
    pub unique_words: Option<u64>,
}

impl From<&DiversityDataset> for DiversityMetrics {
    fn from(raw: &DiversityDataset) -> Self {
        let summary = raw.diversity_summary.as_ref();
        Self {
            proportion_unique: raw.proportion_unique_words,
            avg_jaccard: raw.average_jaccard_diversity,
            overall_score: summary.and_then(|s| s.overall_diversity_score),
            unique_words: summary.and_then(|s| s.total_unique_words),
        }
    }
}

/// Everything the topic grid needs for one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    pub topic_num: u32,
    pub coherence: f64,
    pub top_words: Vec<TopWord>,
    pub wordcloud_path: String,
}

/// Split a raw `"<text>:<score>"` document entry on its last colon.
///
/// The text may contain colons of its own. A missing or unparseable score
/// becomes 0.0; with no colon at all the whole string is the text.
pub fn parse_document_entry(raw: &str) -> (String, f64) {
    match raw.rsplit_once(':') {
        Some((text, score)) => {
            let score = score
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|s| !s.is_nan())
                .unwrap_or(0.0);
            (text.to_string(), score)
        }
        None => (raw.to_string(), 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_entry_splits_on_last_colon() {
        assert_eq!(
            parse_document_entry("some:text:0.5"),
            ("some:text".to_string(), 0.5)
        );
        assert_eq!(
            parse_document_entry("other text:0.9"),
            ("other text".to_string(), 0.9)
        );
    }

    #[test]
    fn document_entry_defaults_bad_scores() {
        assert_eq!(parse_document_entry("text:"), ("text".to_string(), 0.0));
        assert_eq!(parse_document_entry("text:abc"), ("text".to_string(), 0.0));
        assert_eq!(parse_document_entry("no score"), ("no score".to_string(), 0.0));
    }

    #[test]
    fn topic_count_prefers_relevance() {
        let data: CoherenceDataset = serde_json::from_str(
            r#"{
                "relevance": {"topic_01": {}, "topic_02": {}},
                "gensim": {"c_v_per_topic": {"Topic 1": 0.5, "Topic 2": 0.6, "Topic 3": 0.7}}
            }"#,
        )
        .unwrap();
        assert_eq!(data.topic_count(), 2);
    }

    #[test]
    fn unique_word_count_accepts_integral_floats() {
        let summary: DiversitySummary =
            serde_json::from_str(r#"{"total_unique_words": 4210.0}"#).unwrap();
        assert_eq!(summary.total_unique_words, Some(4210));

        let summary: DiversitySummary =
            serde_json::from_str(r#"{"overall_diversity_score": 0.5, "total_unique_words": "many"}"#)
                .unwrap();
        assert_eq!(summary.overall_diversity_score, Some(0.5));
        assert!(summary.total_unique_words.is_none());

        let summary: DiversitySummary =
            serde_json::from_str(r#"{"total_unique_words": 12.5}"#).unwrap();
        assert!(summary.total_unique_words.is_none());
    }

    #[test]
    fn diversity_metrics_tolerate_missing_summary() {
        let raw: DiversityDataset =
            serde_json::from_str(r#"{"proportion_unique_words": 0.8}"#).unwrap();
        let metrics = DiversityMetrics::from(&raw);
        assert_eq!(metrics.proportion_unique, Some(0.8));
        assert!(metrics.overall_score.is_none());
        assert!(metrics.unique_words.is_none());
    }
}
