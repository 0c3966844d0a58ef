use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::chart::ChartData;
use crate::error::ExportError;
use crate::models::DailyTimeline;

#[derive(Serialize)]
struct ChartDocument<'a> {
    daily_timeline: &'a DailyTimeline,
    chart: &'a ChartData,
}

/// Export a timeline together with its shaped chart data
pub fn export_chart_document<P: AsRef<Path>>(
    timeline: &DailyTimeline,
    chart: &ChartData,
    output_path: P,
) -> Result<(), ExportError> {
    export_json(
        &ChartDocument {
            daily_timeline: timeline,
            chart,
        },
        output_path,
    )
}

/// Export any serializable data structure to JSON
pub fn export_json<T, P>(data: &T, output_path: P) -> Result<(), ExportError>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let json_data = serde_json::to_string_pretty(data)
        .map_err(|e| ExportError::Serialization(e.to_string()))?;

    let mut file = std::fs::File::create(output_path)?;
    file.write_all(json_data.as_bytes())?;

    Ok(())
}
