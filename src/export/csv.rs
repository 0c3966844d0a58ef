use serde::Serialize;
use std::path::Path;

use crate::chart::ChartConfig;
use crate::error::ExportError;
use crate::timefmt;

#[derive(Serialize)]
struct BaselineRow {
    index: usize,
    hour: f64,
    clock: String,
    value: f64,
}

/// Export a baseline series, one row per sample, timed by the chart's origin and resolution
pub fn export_baseline_csv<P: AsRef<Path>>(
    values: &[f64],
    config: &ChartConfig,
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(output_path)?;

    for (index, &value) in values.iter().enumerate() {
        let hour = config.hour_of_index(index);
        writer.serialize(BaselineRow {
            index,
            hour,
            clock: timefmt::hour_to_clock_string(hour),
            value,
        })?;
    }

    writer.flush()?;
    Ok(())
}
