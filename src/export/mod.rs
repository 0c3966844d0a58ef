use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::chart::{ChartConfig, ChartData};
use crate::error::ExportError;
use crate::models::DailyTimeline;

pub mod csv;
pub mod json;
#[cfg(feature = "charts")]
pub mod svg;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Svg,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "svg" => Ok(ExportFormat::Svg),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<Self>().ok())
    }
}

/// Write a timeline and its shaped chart in the requested format.
///
/// `config` supplies the sample timing (origin and resolution) used for the
/// CSV clock columns and the SVG x-axis.
pub fn export_timeline<P: AsRef<Path>>(
    timeline: &DailyTimeline,
    chart: &ChartData,
    config: &ChartConfig,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    let path = output_path.as_ref();

    match format {
        ExportFormat::Json => json::export_chart_document(timeline, chart, path)?,
        ExportFormat::Csv => csv::export_baseline_csv(&timeline.circadian_baseline, config, path)?,
        #[cfg(feature = "charts")]
        ExportFormat::Svg => svg::render_chart_svg(timeline, chart, config, path)?,
        #[cfg(not(feature = "charts"))]
        ExportFormat::Svg => {
            return Err(ExportError::UnsupportedFormat(
                "svg (build with --features charts)".to_string(),
            ))
        }
    }

    info!(path = %path.display(), format = ?format, "Export written");
    Ok(())
}
