//! The built-in chart report.
//!
//! One document body, one bar chart and its embedded workbook, and one
//! picture. The data model serializes with PascalCase names so templates
//! address it as `Title`, `ChartData`, `p.Key` and so on.

use crate::services::pipeline::Manifest;
use crate::services::tabular::{CellValue, TabularGrid};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

pub const DOCUMENT_MEMBER: &str = "/word/document.xml";
pub const CHART_MEMBER: &str = "/word/charts/chart1.xml";
pub const IMAGE_MEMBER: &str = "/word/media/image1.png";
pub const WORKBOOK_MEMBER: &str = "/word/embeddings/Microsoft_Excel____.xlsx";

const HEADER: [&str; 2] = ["Name", "Score"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ChartPoint {
    pub key: String,
    pub value: i64,
}

impl ChartPoint {
    pub fn new(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ReportData {
    pub title: String,
    pub chart_data: Vec<ChartPoint>,
    pub description: String,
    pub chart_title: String,
}

impl ReportData {
    /// The illustrative data set served by the HTTP trigger.
    pub fn demo() -> Self {
        Self {
            title: "Rendering a Word document from templates".into(),
            chart_data: vec![
                ChartPoint::new("Alice", 100),
                ChartPoint::new("Bob", 88),
                ChartPoint::new("Carol", 66),
            ],
            description: "The chart below is a live chart, not a picture. Open it to edit the data."
                .into(),
            chart_title: "Exam scores".into(),
        }
    }

    /// Template data for the document and chart parts.
    pub fn template_data(&self) -> Value {
        let points: Vec<Value> = self
            .chart_data
            .iter()
            .map(|p| json!({ "Key": p.key, "Value": p.value }))
            .collect();
        json!({
            "Title": self.title,
            "ChartData": points,
            "Description": self.description,
            "ChartTitle": self.chart_title,
        })
    }

    /// Header row followed by one `(key, value)` row per chart point.
    pub fn to_grid(&self) -> TabularGrid {
        let mut grid = TabularGrid::new(self.chart_title.clone()).with_row(HEADER);
        for point in &self.chart_data {
            grid.push_row([
                CellValue::from(point.key.as_str()),
                CellValue::from(point.value),
            ]);
        }
        grid
    }
}

/// Manifest for the chart report: both XML parts are rendered from `data`,
/// the picture is replaced by `image_path` and the chart's workbook is
/// regenerated from the chart points.
pub fn build_manifest(data: &ReportData, image_path: &Path) -> Manifest {
    let value = data.template_data();

    Manifest::new()
        .template(DOCUMENT_MEMBER, value.clone())
        .template(CHART_MEMBER, value)
        .binary(IMAGE_MEMBER, image_path)
        .tabular(WORKBOOK_MEMBER, data.to_grid())
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod report_tests;
