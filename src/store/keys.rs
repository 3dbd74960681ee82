// Topic key conventions.
//
// Upstream exports identify the same topic two different ways: relevance
// maps and wordcloud files use a zero-padded `topic_07`, while coherence
// maps and document maps use an unpadded `Topic 7`. Both conventions are
// kept exactly as observed, since asset and document lookups depend on them.

/// Parse a topic key in either supported format into its topic number.
///
/// Accepts `topic_<digits>` and `Topic <digits>` (case-sensitive). Anything
/// else returns `None` so the caller can skip that single entry.
pub fn parse_topic_key(key: &str) -> Option<u32> {
    let digits = key
        .strip_prefix("topic_")
        .or_else(|| key.strip_prefix("Topic "))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

/// Key into the relevance map: `topic_07`.
pub fn relevance_key(topic_num: u32) -> String {
    format!("topic_{topic_num:02}")
}

/// Key into the top-documents map: `Topic 7` (no padding).
pub fn document_key(topic_num: u32) -> String {
    format!("Topic {topic_num}")
}

/// Display label for a topic: `Topic 7`.
pub fn topic_label(topic_num: u32) -> String {
    document_key(topic_num)
}

/// Conventional wordcloud image path, relative to the dashboard root.
pub fn wordcloud_path(topic_num: u32) -> String {
    format!("images/wordclouds/Topic {topic_num:02}.png")
}
