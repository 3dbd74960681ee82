// Temporal topic distribution dataset.
//
// Shapes `temporal_topic_dist_quarter.csv` (one row per period, one column
// per topic) into line-chart data: the `period` column becomes the x axis
// and every column whose header starts with `Topic` becomes a series.

use std::io::Read;

use anyhow::{Context, Result};
use serde::Serialize;

use super::chart::{topic_color, PALETTE};
use crate::store::keys::parse_topic_key;

/// Bundle-relative path of the temporal distribution CSV.
pub const TEMPORAL_PATH: &str = "data/temporal_topic_dist_quarter.csv";

const PERIOD_COLUMN: &str = "period";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalSeries {
    pub name: String,
    pub color: &'static str,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalChart {
    pub periods: Vec<String>,
    pub series: Vec<TemporalSeries>,
}

/// Build the chart from CSV text. Empty or unparseable cells become 0.0,
/// as do cells missing from short rows.
pub fn temporal_chart<R: Read>(reader: R) -> Result<TemporalChart> {
    let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv.headers().context("Failed to read temporal CSV header")?.clone();
    let period_index = headers.iter().position(|h| h == PERIOD_COLUMN);
    let topic_columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with("Topic"))
        .collect();

    let mut periods = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); topic_columns.len()];

    for (row, record) in csv.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read temporal CSV row {}", row + 1))?;

        periods.push(
            period_index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string(),
        );
        for (values, (index, _)) in columns.iter_mut().zip(&topic_columns) {
            values.push(record.get(*index).map(parse_cell).unwrap_or(0.0));
        }
    }

    let series = topic_columns
        .iter()
        .zip(columns)
        .enumerate()
        .map(|(position, ((_, name), values))| TemporalSeries {
            name: name.to_string(),
            color: parse_topic_key(name)
                .map(topic_color)
                .unwrap_or(PALETTE[position % PALETTE.len()]),
            values,
        })
        .collect();

    Ok(TemporalChart { periods, series })
}

fn parse_cell(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .unwrap_or(0.0)
}
