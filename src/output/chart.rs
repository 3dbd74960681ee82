// Coherence bar chart dataset.
//
// Produces a front-end-neutral description of the overview bar chart: one
// bar per topic in topic order, colored from a fixed palette, with the
// top three words of each topic as its tooltip line.

use serde::Serialize;

use crate::store::{keys, TopicDataStore, LABEL_WORD_LIMIT};

/// Bar colors, cycled when there are more topics than entries.
pub const PALETTE: [&str; 45] = [
    "#2563eb", "#7c3aed", "#db2777", "#dc2626", "#ea580c",
    "#d97706", "#ca8a04", "#65a30d", "#16a34a", "#059669",
    "#0d9488", "#0891b2", "#0284c7", "#2563eb", "#4f46e5",
    "#7c3aed", "#9333ea", "#c026d3", "#db2777", "#e11d48",
    "#ef4444", "#f97316", "#eab308", "#84cc16", "#22c55e",
    "#14b8a6", "#06b6d4", "#0ea5e9", "#3b82f6", "#6366f1",
    "#8b5cf6", "#a855f7", "#d946ef", "#ec4899", "#f43f5e",
    "#fb7185", "#fda4af", "#fecdd3", "#ffe4e6", "#fecaca",
    "#fed7aa", "#fef08a", "#d9f99d", "#bbf7d0", "#99f6e4",
];

pub const Y_MIN: f64 = 0.4;
pub const Y_MAX: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoherenceChart {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
    pub tooltips: Vec<String>,
    pub bar_thickness: f64,
    pub average: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Color for a 1-based topic number.
pub fn topic_color(topic_num: u32) -> &'static str {
    let index = (topic_num.max(1) - 1) as usize;
    PALETTE[index % PALETTE.len()]
}

/// Bars get thinner as topics are added, between 8 and 20 pixels.
pub fn bar_thickness(bars: usize) -> f64 {
    if bars == 0 {
        return 20.0;
    }
    (500.0 / bars as f64).clamp(8.0, 20.0)
}

pub fn coherence_chart(store: &TopicDataStore) -> CoherenceChart {
    let scores = store.coherence_scores();

    let tooltips = scores
        .iter()
        .map(|s| {
            let words: Vec<String> = store
                .top_words(s.topic_num, LABEL_WORD_LIMIT)
                .into_iter()
                .map(|w| w.word)
                .collect();
            format!("Top words: {}", words.join(", "))
        })
        .collect();

    CoherenceChart {
        labels: scores.iter().map(|s| keys::topic_label(s.topic_num)).collect(),
        values: scores.iter().map(|s| s.score).collect(),
        colors: scores.iter().map(|s| topic_color(s.topic_num)).collect(),
        tooltips,
        bar_thickness: bar_thickness(scores.len()),
        average: store.average_coherence(),
        y_min: Y_MIN,
        y_max: Y_MAX,
    }
}
