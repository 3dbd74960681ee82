// Bundle assembly: turns a raw analysis folder into the dashboard layout
// the topic data store reads.
//
// Layout produced:
//   data/coherence_scores.json        (required, from the coherence or relevance export)
//   data/top_docs.json                (when the analysis produced one)
//   data/diversity_scores.json        (optional)
//   data/temporal_topic_dist_quarter.csv
//   images/*.png, images/wordclouds/Topic NN.png
//   violin-plot.html
//   bundle.json                       (manifest)

pub mod metadata;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::store::models::CoherenceDataset;
use metadata::{dataset_title, find_data_file, output_dir_name, parse_folder_name, FolderMetadata, Method};

/// Fixed plot images: (source suffix after `<prefix>_`, destination name).
const FIXED_IMAGES: &[(&str, &str)] = &[
    ("document_dist.png", "document_dist.png"),
    ("temporal_topic_dist_quarter_line.png", "temporal_line.png"),
    ("temporal_topic_dist_quarter_stacked_area.png", "temporal_area.png"),
    ("topic_distribution_by_year.png", "yearly_dist.png"),
];

/// Explicit naming for folders that don't follow the standard pattern.
#[derive(Debug, Clone)]
pub struct NamingOverride {
    pub prefix: String,
    pub method: Method,
    pub dataset: String,
}

#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Output directory; derived from the folder metadata when unset
    pub output_dir: Option<PathBuf>,
    pub naming: Option<NamingOverride>,
}

/// Written to `bundle.json` alongside the assembled artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct BundleManifest {
    pub dataset: String,
    pub title: String,
    pub method: Method,
    pub topic_count: usize,
    pub has_top_docs: bool,
    pub has_diversity: bool,
    pub has_tsne: bool,
    pub has_umap: bool,
    pub has_violin_plot: bool,
    pub has_temporal_csv: bool,
    pub wordclouds: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BundleReport {
    pub output_path: PathBuf,
    pub manifest: BundleManifest,
}

/// Assemble one analysis folder into a dashboard bundle.
///
/// Relative paths resolve against `base_dir`.
pub fn assemble(source_folder: &Path, base_dir: &Path, options: &BundleOptions) -> Result<BundleReport> {
    let source_path = resolve(base_dir, source_folder);
    if !source_path.is_dir() {
        anyhow::bail!("Source folder not found: {}", source_path.display());
    }

    let (mut meta, prefix) = match &options.naming {
        Some(naming) => (
            FolderMetadata {
                dataset: naming.dataset.clone(),
                method: naming.method,
                topic_count: 0,
            },
            naming.prefix.clone(),
        ),
        None => {
            let folder_name = source_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let meta = parse_folder_name(&folder_name)
                .with_context(|| format!("Invalid folder name format: {folder_name}"))?;
            (meta, folder_name)
        }
    };

    let data_file = find_data_file(&source_path, &prefix)
        .with_context(|| format!("No data file found in {}", source_path.display()))?;

    let coherence: CoherenceDataset = read_json(&data_file)?;
    let topic_count = coherence.topic_count();
    if topic_count == 0 {
        anyhow::bail!("Could not determine topic count from {}", data_file.display());
    }
    if meta.topic_count != 0 && meta.topic_count != topic_count {
        warn!(
            folder = meta.topic_count,
            data = topic_count,
            "Folder name topic count disagrees with data, using data"
        );
    }
    meta.topic_count = topic_count;

    let output_path = match &options.output_dir {
        Some(dir) => resolve(base_dir, dir),
        None => base_dir.join(output_dir_name(&meta)),
    };

    info!(
        method = %meta.method.display_name(),
        topics = topic_count,
        output = %output_path.display(),
        "Assembling bundle"
    );

    let data_dir = output_path.join("data");
    let images_dir = output_path.join("images");
    let wordclouds_dir = images_dir.join("wordclouds");
    for dir in [&data_dir, &wordclouds_dir] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    copy(&data_file, &data_dir.join("coherence_scores.json"))?;

    let has_diversity = copy_if_present(
        &source_path.join(format!("{prefix}_diversity_scores.json")),
        &data_dir.join("diversity_scores.json"),
    )?;

    let has_top_docs = copy_if_present(
        &source_path.join(format!("{prefix}_top_docs.json")),
        &data_dir.join("top_docs.json"),
    )?;
    if !has_top_docs {
        warn!(folder = %source_path.display(), "No top documents export, dashboard will not load");
    }

    let has_temporal_csv = copy_if_present(
        &source_path.join(format!("{prefix}_temporal_topic_dist_quarter.csv")),
        &data_dir.join("temporal_topic_dist_quarter.csv"),
    )?;

    for (suffix, dest) in FIXED_IMAGES {
        copy_if_present(
            &source_path.join(format!("{prefix}_{suffix}")),
            &images_dir.join(dest),
        )?;
    }

    let has_tsne = copy_first(
        [
            format!("{prefix}_tsne_visualization.png"),
            format!("{prefix}_tsne.png"),
            "tsne.png".to_string(),
        ]
        .iter()
        .map(|name| source_path.join(name)),
        &images_dir.join("tsne.png"),
    )?;
    if !has_tsne {
        info!("t-SNE image not found in source folder");
    }

    let entries = sorted_files(&source_path)?;

    let umap = entries
        .iter()
        .find(|p| is_umap_image(p) && file_name(p).contains("visualization"))
        .or_else(|| entries.iter().find(|p| is_umap_image(p)));
    if let Some(umap) = umap {
        copy(umap, &images_dir.join("umap.png"))?;
        info!(file = %file_name(umap), "Copied UMAP visualization");
    }

    let violin = entries.iter().find(|p| is_violin_plot(p));
    if let Some(violin) = violin {
        copy(violin, &output_path.join("violin-plot.html"))?;
        info!(file = %file_name(violin), "Copied violin plot");
    }

    let mut wordclouds = 0;
    let wordclouds_src = source_path.join("wordclouds");
    if wordclouds_src.is_dir() {
        for wc in sorted_files(&wordclouds_src)? {
            let name = file_name(&wc);
            if name.starts_with("Topic ") && name.ends_with(".png") {
                copy(&wc, &wordclouds_dir.join(&name))?;
                wordclouds += 1;
            }
        }
    }

    let manifest = BundleManifest {
        title: dataset_title(&meta.dataset),
        dataset: meta.dataset,
        method: meta.method,
        topic_count,
        has_top_docs,
        has_diversity,
        has_tsne,
        has_umap: umap.is_some(),
        has_violin_plot: violin.is_some(),
        has_temporal_csv,
        wordclouds,
        generated_at: Utc::now(),
    };

    let manifest_path = output_path.join("bundle.json");
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    Ok(BundleReport {
        output_path,
        manifest,
    })
}

/// Assemble every correctly named folder under `source_dir`, in name order.
///
/// A folder that fails to assemble is logged and skipped.
pub fn assemble_all(source_dir: &Path, base_dir: &Path) -> Result<Vec<BundleReport>> {
    let source_path = resolve(base_dir, source_dir);
    if !source_path.is_dir() {
        anyhow::bail!("Source directory not found: {}", source_path.display());
    }

    let folders: Vec<PathBuf> = sorted_entries(&source_path)?
        .into_iter()
        .filter(|p| p.is_dir() && parse_folder_name(&file_name(p)).is_some())
        .collect();

    let pb = ProgressBar::new(folders.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Bundles [{bar:30}] {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let mut reports = Vec::new();
    for folder in &folders {
        pb.set_message(file_name(folder));
        match assemble(folder, base_dir, &BundleOptions::default()) {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(folder = %folder.display(), error = %e, "Failed to assemble bundle, skipping");
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(reports)
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let body = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&body).with_context(|| format!("Failed to parse {}", path.display()))
}

fn copy(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
    Ok(())
}

fn copy_if_present(src: &Path, dest: &Path) -> Result<bool> {
    if !src.is_file() {
        return Ok(false);
    }
    copy(src, dest)?;
    Ok(true)
}

fn copy_first(candidates: impl Iterator<Item = PathBuf>, dest: &Path) -> Result<bool> {
    for candidate in candidates {
        if copy_if_present(&candidate, dest)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?.into_iter().filter(|p| p.is_file()).collect())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_umap_image(path: &Path) -> bool {
    let name = file_name(path);
    name.contains("umap") && name.ends_with(".png")
}

// Matches `*violin*interactive*.html`.
fn is_violin_plot(path: &Path) -> bool {
    let name = file_name(path);
    match name.find("violin") {
        Some(at) => name[at + "violin".len()..].contains("interactive") && name.ends_with(".html"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violin_pattern_requires_order() {
        assert!(is_violin_plot(Path::new("x_violin_plot_interactive.html")));
        assert!(!is_violin_plot(Path::new("interactive_violin.html")));
        assert!(!is_violin_plot(Path::new("x_violin_interactive.png")));
    }

    #[test]
    fn umap_pattern() {
        assert!(is_umap_image(Path::new("prefix_umap_visualization.png")));
        assert!(is_umap_image(Path::new("umap.png")));
        assert!(!is_umap_image(Path::new("umap.csv")));
    }
}
