// Composition tests: bundle assembly -> directory source -> store queries
// -> chart dataset, all against a temporary directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use topicboard::bundle::metadata::Method;
use topicboard::bundle::{assemble, assemble_all, BundleOptions, NamingOverride};
use topicboard::output::chart::{coherence_chart, topic_color};
use topicboard::output::temporal::{temporal_chart, TEMPORAL_PATH};
use topicboard::store::source::{ArtifactSource, DirSource};
use topicboard::store::TopicDataStore;

const PREFIX: &str = "heart_failure_with_pagerank_nmtf_bpe_3";

const COHERENCE: &str = r#"{
    "relevance": {
        "topic_01": {"heart_failure": 0.9, "ejection": 0.8},
        "topic_02": {"atrial_fibrillation": 0.7},
        "topic_03": {"readmission": 0.6}
    },
    "gensim": {"c_v_average": 0.61, "c_v_per_topic": {"Topic 1": 0.7, "Topic 2": 0.58, "Topic 3": 0.55}}
}"#;

const TOP_DOCS: &str = r#"{"Topic 1": {"17": "Patient admitted: dyspnea:0.42"}}"#;

fn write(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

/// A complete analysis folder named with the standard pattern.
fn analysis_folder(root: &Path) -> std::path::PathBuf {
    let folder = root.join("to_generate_from").join(PREFIX);
    write(&folder.join(format!("{PREFIX}_coherence_scores.json")), COHERENCE);
    write(&folder.join(format!("{PREFIX}_top_docs.json")), TOP_DOCS);
    write(&folder.join(format!("{PREFIX}_document_dist.png")), "png");
    write(&folder.join(format!("{PREFIX}_tsne.png")), "png");
    write(&folder.join(format!("{PREFIX}_umap_visualization.png")), "png");
    write(&folder.join(format!("{PREFIX}_violin_plot_interactive.html")), "<html></html>");
    write(&folder.join(format!("{PREFIX}_temporal_topic_dist_quarter.csv")), "period,Topic 1\n2020Q1,0.5\n");
    write(&folder.join("wordclouds").join("Topic 01.png"), "png");
    write(&folder.join("wordclouds").join("Topic 02.png"), "png");
    write(&folder.join("wordclouds").join("notes.txt"), "skip me");
    folder
}

#[tokio::test]
async fn assembled_bundle_loads_into_store() {
    let tmp = TempDir::new().unwrap();
    let folder = analysis_folder(tmp.path());

    let report = assemble(&folder, tmp.path(), &BundleOptions::default()).unwrap();
    assert_eq!(report.output_path, tmp.path().join("heart-failure-nmtf-3"));

    let m = &report.manifest;
    assert_eq!(m.title, "Heart Failure");
    assert_eq!(m.method, Method::Nmtf);
    assert_eq!(m.topic_count, 3);
    assert!(m.has_top_docs);
    assert!(!m.has_diversity);
    assert!(m.has_tsne);
    assert!(m.has_umap);
    assert!(m.has_violin_plot);
    assert!(m.has_temporal_csv);
    assert_eq!(m.wordclouds, 2);

    let out = &report.output_path;
    assert!(out.join("images/tsne.png").is_file());
    assert!(out.join("images/umap.png").is_file());
    assert!(out.join("images/document_dist.png").is_file());
    assert!(out.join("images/wordclouds/Topic 01.png").is_file());
    assert!(!out.join("images/wordclouds/notes.txt").exists());
    assert!(out.join("violin-plot.html").is_file());
    assert!(out.join("bundle.json").is_file());

    let mut store = TopicDataStore::new(Box::new(DirSource::new(out.clone())));
    store.load_all().await.unwrap();

    assert_eq!(store.topic_count(), 3);
    assert!(store.diversity_metrics().is_none());

    let docs = store.top_documents(1, 10);
    assert_eq!(docs[0].id, "17");
    assert_eq!(docs[0].text, "Patient admitted: dyspnea");

    // every wordcloud path a summary advertises was copied into the bundle
    for summary in store.topic_summaries().iter().take(2) {
        assert!(out.join(&summary.wordcloud_path).is_file());
    }

    let chart = coherence_chart(&store);
    assert_eq!(chart.labels, vec!["Topic 1", "Topic 2", "Topic 3"]);
    assert_eq!(chart.values, vec![0.7, 0.58, 0.55]);
    assert_eq!(chart.colors, vec![topic_color(1), topic_color(2), topic_color(3)]);
    assert_eq!(chart.tooltips[0], "Top words: heart failure, ejection");
    assert_eq!(chart.bar_thickness, 20.0);
    assert_eq!(chart.average, 0.61);
}

#[tokio::test]
async fn assembled_temporal_distribution_becomes_line_chart() {
    let tmp = TempDir::new().unwrap();
    let folder = analysis_folder(tmp.path());
    let report = assemble(&folder, tmp.path(), &BundleOptions::default()).unwrap();

    let body = DirSource::new(report.output_path.clone())
        .fetch(TEMPORAL_PATH)
        .await
        .unwrap();
    let chart = temporal_chart(body.as_bytes()).unwrap();

    assert_eq!(chart.periods, vec!["2020Q1"]);
    assert_eq!(chart.series.len(), 1);
    assert_eq!(chart.series[0].name, "Topic 1");
    assert_eq!(chart.series[0].color, topic_color(1));
    assert_eq!(chart.series[0].values, vec![0.5]);
}

#[test]
fn relevance_export_is_used_when_coherence_missing() {
    let tmp = TempDir::new().unwrap();
    let folder = tmp.path().join("copd_with_pagerank_pnmf_bpe_2");
    write(
        &folder.join("copd_with_pagerank_pnmf_bpe_2_relevance_top_words.json"),
        r#"{"relevance": {"topic_01": {}, "topic_02": {}}}"#,
    );

    let report = assemble(&folder, tmp.path(), &BundleOptions::default()).unwrap();
    assert_eq!(report.manifest.method, Method::Pnmf);
    assert!(!report.manifest.has_top_docs);
    assert!(report.output_path.join("data/coherence_scores.json").is_file());
}

#[test]
fn naming_override_and_explicit_output() {
    let tmp = TempDir::new().unwrap();
    let folder = tmp.path().join("scratch");
    write(&folder.join("run7_coherence_scores.json"), COHERENCE);

    let options = BundleOptions {
        output_dir: Some("site".into()),
        naming: Some(NamingOverride {
            prefix: "run7".to_string(),
            method: Method::Nmtf,
            dataset: "asthma".to_string(),
        }),
    };
    let report = assemble(&folder, tmp.path(), &options).unwrap();
    assert_eq!(report.output_path, tmp.path().join("site"));
    assert_eq!(report.manifest.dataset, "asthma");
    assert_eq!(report.manifest.topic_count, 3);
}

#[test]
fn assembly_errors() {
    let tmp = TempDir::new().unwrap();

    let missing = assemble(Path::new("nope"), tmp.path(), &BundleOptions::default());
    assert!(missing.unwrap_err().to_string().contains("Source folder not found"));

    let badly_named = tmp.path().join("random_folder");
    fs::create_dir_all(&badly_named).unwrap();
    let err = assemble(&badly_named, tmp.path(), &BundleOptions::default()).unwrap_err();
    assert!(err.to_string().contains("Invalid folder name format"));

    let empty = tmp.path().join("x_with_pagerank_nmtf_bpe_5");
    fs::create_dir_all(&empty).unwrap();
    let err = assemble(&empty, tmp.path(), &BundleOptions::default()).unwrap_err();
    assert!(err.to_string().contains("No data file found"));

    let zero = tmp.path().join("y_with_pagerank_nmtf_bpe_5");
    write(&zero.join("y_with_pagerank_nmtf_bpe_5_coherence_scores.json"), "{}");
    let err = assemble(&zero, tmp.path(), &BundleOptions::default()).unwrap_err();
    assert!(err.to_string().contains("Could not determine topic count"));
}

#[test]
fn assemble_all_skips_bad_folders() {
    let tmp = TempDir::new().unwrap();
    analysis_folder(tmp.path());
    let source_dir = tmp.path().join("to_generate_from");
    fs::create_dir_all(source_dir.join("unrelated")).unwrap();
    fs::create_dir_all(source_dir.join("z_with_pagerank_pnmf_bpe_4")).unwrap();

    let reports = assemble_all(Path::new("to_generate_from"), tmp.path()).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].manifest.dataset, "heart_failure");
}
