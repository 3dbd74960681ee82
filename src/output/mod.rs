// Output formatting: terminal display and chart datasets.

pub mod chart;
pub mod temporal;
pub mod terminal;

/// Coherence below this is flagged as low on badges.
pub const DEFAULT_LOW_COHERENCE: f64 = 0.6;

/// Words kept when previewing a document's text.
pub const DOCUMENT_PREVIEW_WORDS: usize = 100;

/// Collapse runs of whitespace and keep the first `DOCUMENT_PREVIEW_WORDS` words.
pub fn format_document_text(text: &str) -> String {
    text.split_whitespace()
        .take(DOCUMENT_PREVIEW_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group digits with commas: 12345 -> "12,345".
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn is_low_coherence(score: f64, threshold: f64) -> bool {
    score < threshold
}
