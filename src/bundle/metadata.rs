// Analysis folder naming conventions.
//
// Raw analysis output lands in folders named
// `{dataset}_with_pagerank_{method}_bpe_{topic_count}`, with every file in
// the folder prefixed by the folder name.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::Serialize;

static FOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)_with_pagerank_(nmtf|pnmf)_bpe_(\d+)$").expect("valid folder pattern")
});

/// Factorization method used to produce the topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Nmtf,
    Pnmf,
}

impl Method {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nmtf" => Some(Method::Nmtf),
            "pnmf" => Some(Method::Pnmf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Nmtf => "nmtf",
            Method::Pnmf => "pnmf",
        }
    }

    /// Upper-case display form (`NMTF`).
    pub fn display_name(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata recovered from an analysis folder name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderMetadata {
    pub dataset: String,
    pub method: Method,
    /// Count from the folder name; replaced by the count found in the data
    pub topic_count: usize,
}

/// Parse `heart_failure_with_pagerank_nmtf_bpe_34` into its parts.
pub fn parse_folder_name(folder_name: &str) -> Option<FolderMetadata> {
    let caps = FOLDER_PATTERN.captures(folder_name)?;

    Some(FolderMetadata {
        dataset: caps.get(1)?.as_str().to_string(),
        method: Method::parse(caps.get(2)?.as_str())?,
        topic_count: caps.get(3)?.as_str().parse().ok()?,
    })
}

/// Locate the main topic data file: the coherence export if present,
/// otherwise the relevance-only export.
pub fn find_data_file(source_dir: &Path, prefix: &str) -> Option<PathBuf> {
    [
        format!("{prefix}_coherence_scores.json"),
        format!("{prefix}_relevance_top_words.json"),
    ]
    .into_iter()
    .map(|name| source_dir.join(name))
    .find(|path| path.is_file())
}

/// Output directory name, e.g. `heart-failure-nmtf-34`.
pub fn output_dir_name(meta: &FolderMetadata) -> String {
    format!(
        "{}-{}-{}",
        meta.dataset.replace('_', "-"),
        meta.method,
        meta.topic_count
    )
}

/// Human title for a dataset slug, e.g. `heart_failure` -> `Heart Failure`.
pub fn dataset_title(dataset: &str) -> String {
    dataset
        .replace('_', " ")
        .split(' ')
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_folder_name() {
        let meta = parse_folder_name("heart_failure_with_pagerank_nmtf_bpe_34").unwrap();
        assert_eq!(meta.dataset, "heart_failure");
        assert_eq!(meta.method, Method::Nmtf);
        assert_eq!(meta.topic_count, 34);
    }

    #[test]
    fn rejects_unknown_method_and_shape() {
        assert!(parse_folder_name("heart_failure_with_pagerank_lda_bpe_34").is_none());
        assert!(parse_folder_name("heart_failure_nmtf_34").is_none());
        assert!(parse_folder_name("_with_pagerank_nmtf_bpe_34").is_none());
    }

    #[test]
    fn output_name_and_title() {
        let meta = FolderMetadata {
            dataset: "heart_failure".to_string(),
            method: Method::Pnmf,
            topic_count: 43,
        };
        assert_eq!(output_dir_name(&meta), "heart-failure-pnmf-43");
        assert_eq!(dataset_title("heart_failure"), "Heart Failure");
        assert_eq!(dataset_title("COVID_vaccine"), "Covid Vaccine");
        assert_eq!(Method::Nmtf.display_name(), "NMTF");
    }
}
