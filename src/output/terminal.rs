// Colored terminal output for topic overviews, cards, and documents.
//
// This module handles all terminal-specific formatting. The main.rs
// subcommands delegate here.

use colored::{ColoredString, Colorize};

use super::{format_document_text, format_thousands, is_low_coherence};
use crate::bundle::BundleReport;
use crate::store::models::DiversityMetrics;
use crate::store::{keys, TopicDataStore, LABEL_WORD_LIMIT};

/// The two diversity cells of the overview: score and unique word count.
///
/// Both read `N/A` when the export is unavailable or carries no usable
/// overall score.
pub fn diversity_cells(diversity: Option<&DiversityMetrics>) -> (String, String) {
    match diversity {
        Some(d) if d.overall_score.is_some_and(|s| s != 0.0) => {
            let score = d.overall_score.unwrap_or(0.0);
            let unique = d
                .unique_words
                .map(format_thousands)
                .unwrap_or_else(|| "-".to_string());
            (format!("{:.1}%", score * 100.0), unique)
        }
        _ => ("N/A".to_string(), "N/A".to_string()),
    }
}

/// Display the model overview stats.
pub fn display_overview(store: &TopicDataStore) {
    let diversity = store.diversity_metrics();
    let (diversity_score, unique_words) = diversity_cells(diversity.as_ref());

    println!("\n{}", "=== Model Overview ===".bold());
    println!();
    println!("  {:<24} {}", "Topics".dimmed(), store.topic_count());
    println!(
        "  {:<24} {:.3}",
        "Avg. Coherence (C_V)".dimmed(),
        store.average_coherence()
    );
    println!("  {:<24} {}", "Diversity Score".dimmed(), diversity_score);
    println!("  {:<24} {}", "Unique Words".dimmed(), unique_words);
    println!();
}

/// Display one line per topic: number, coherence badge, top words.
pub fn display_topic_grid(store: &TopicDataStore, low_threshold: f64) {
    let summaries = store.topic_summaries();
    if summaries.is_empty() {
        println!("No topics found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Topic Explorer ({} topics) ===", summaries.len()).bold()
    );
    println!();

    for summary in &summaries {
        let words: Vec<&str> = summary.top_words.iter().map(|w| w.word.as_str()).collect();
        println!(
            "  {:<10} {}  {}",
            keys::topic_label(summary.topic_num).bold(),
            coherence_badge(summary.coherence, low_threshold),
            words.join(", ")
        );
        println!("             {}", summary.wordcloud_path.dimmed());
    }
    println!();
}

/// Display a topic's coherence, wordcloud, and word/relevance table.
pub fn display_topic_detail(store: &TopicDataStore, topic_num: u32, limit: usize, low_threshold: f64) {
    let coherence = store.coherence_for(topic_num);
    let words = store.top_words(topic_num, limit);

    println!(
        "\n{}  C_V: {}",
        format!("=== {} ===", keys::topic_label(topic_num)).bold(),
        coherence_badge(coherence, low_threshold)
    );
    println!("  Wordcloud: {}", keys::wordcloud_path(topic_num).dimmed());
    println!();

    if words.is_empty() {
        println!("  No words available for this topic.");
        return;
    }

    println!("  {:<32} {:>15}", "Word".dimmed(), "Relevance Score".dimmed());
    println!("  {}", "-".repeat(48).dimmed());
    for word in &words {
        println!("  {:<32} {:>15.4}", word.word, word.score);
    }
    println!();
}

/// Display a topic's representative documents.
pub fn display_documents(store: &TopicDataStore, topic_num: u32, limit: usize) {
    let docs = store.top_documents(topic_num, limit);

    println!(
        "\n{}",
        format!(
            "=== {}: {} ===",
            keys::topic_label(topic_num),
            store.topic_label(topic_num)
        )
        .bold()
    );
    println!();

    if docs.is_empty() {
        println!("  No documents available for this topic.");
        return;
    }

    for (index, doc) in docs.iter().enumerate() {
        println!(
            "  {} {}",
            format!("#{} (ID: {})", index + 1, doc.id).bold(),
            format!("Score: {:.4}", doc.score).cyan()
        );
        println!("  {}", format_document_text(&doc.text));
        println!();
    }
}

/// Display the topic selector labels: `Topic N: word, word, word`.
pub fn display_topic_index(store: &TopicDataStore) {
    for topic_num in 1..=store.topic_count() as u32 {
        let words: Vec<String> = store
            .top_words(topic_num, LABEL_WORD_LIMIT)
            .into_iter()
            .map(|w| w.word)
            .collect();
        println!("  {}: {}", keys::topic_label(topic_num), words.join(", "));
    }
}

/// Summarize an assembled bundle.
pub fn display_bundle_report(report: &BundleReport) {
    let m = &report.manifest;
    println!(
        "{} {} app ({} topics) in {}",
        "Created".green().bold(),
        m.method.display_name(),
        m.topic_count,
        report.output_path.display()
    );
    println!("  {}: {} wordclouds", m.title, m.wordclouds);

    let flags = [
        ("top docs", m.has_top_docs),
        ("diversity", m.has_diversity),
        ("t-SNE", m.has_tsne),
        ("UMAP", m.has_umap),
        ("violin plot", m.has_violin_plot),
        ("temporal CSV", m.has_temporal_csv),
    ];
    for (name, present) in flags {
        let mark = if present { "+".green() } else { "-".dimmed() };
        println!("    {mark} {name}");
    }
}

fn coherence_badge(score: f64, low_threshold: f64) -> ColoredString {
    let text = format!("{score:.3}");
    if is_low_coherence(score, low_threshold) {
        text.yellow()
    } else {
        text.green()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(overall: Option<f64>, unique: Option<u64>) -> DiversityMetrics {
        DiversityMetrics {
            proportion_unique: Some(0.7),
            avg_jaccard: Some(0.9),
            overall_score: overall,
            unique_words: unique,
        }
    }

    #[test]
    fn diversity_cells_format_loaded_metrics() {
        let m = metrics(Some(0.8123), Some(12345));
        assert_eq!(
            diversity_cells(Some(&m)),
            ("81.2%".to_string(), "12,345".to_string())
        );
    }

    #[test]
    fn diversity_cells_fall_back_to_na() {
        assert_eq!(diversity_cells(None), ("N/A".to_string(), "N/A".to_string()));
        let zero = metrics(Some(0.0), Some(10));
        assert_eq!(diversity_cells(Some(&zero)).0, "N/A");
        let missing_words = metrics(Some(0.5), None);
        assert_eq!(diversity_cells(Some(&missing_words)).1, "-");
    }
}
