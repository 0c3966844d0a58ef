//! SVG rendering of the daily readiness chart (`charts` feature)

use plotters::prelude::*;
use std::path::Path;

use crate::chart::{ChartConfig, ChartData};
use crate::error::ExportError;
use crate::models::DailyTimeline;
use crate::timefmt;

const CHART_SIZE: (u32, u32) = (960, 420);

fn render_err<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Render(e.to_string())
}

fn tick_label(hour: &f64) -> String {
    timefmt::hour_to_short_label(hour.rem_euclid(24.0))
}

/// Axis position of a clock hour; the axis runs 24h forward from the origin
fn axis_hour(config: &ChartConfig, hour: f64) -> f64 {
    config.origin_hour + config.position_of_hour(hour) * config.resolution_hours
}

/// Draw the baseline curve, session overlay and peak markers
pub fn render_chart_svg(
    timeline: &DailyTimeline,
    chart: &ChartData,
    config: &ChartConfig,
    output_path: &Path,
) -> Result<(), ExportError> {
    let origin = config.origin_hour;
    let root = SVGBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let title = match timeline.date {
        Some(date) => format!("Cognitive readiness, {}", date),
        None => "Cognitive readiness".to_string(),
    };

    let mut ctx = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(32)
        .y_label_area_size(40)
        .build_cartesian_2d(origin..origin + 24.0, 0f64..100f64)
        .map_err(render_err)?;

    ctx.configure_mesh()
        .x_labels(9)
        .x_label_formatter(&tick_label)
        .y_desc("LRI")
        .draw()
        .map_err(render_err)?;

    ctx.draw_series(LineSeries::new(
        timeline
            .circadian_baseline
            .iter()
            .enumerate()
            .map(|(i, &v)| (origin + i as f64 * config.resolution_hours, v)),
        &BLUE,
    ))
    .map_err(render_err)?
    .label("Baseline")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    if !chart.session_points.is_empty() {
        ctx.draw_series(LineSeries::new(
            chart
                .session_points
                .iter()
                .map(|s| (axis_hour(config, s.hour), s.lri)),
            RED.stroke_width(2),
        ))
        .map_err(render_err)?
        .label("Session")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }

    ctx.draw_series(
        chart
            .peak_markers
            .iter()
            .map(|p| Circle::new((axis_hour(config, p.hour), p.lri), 4, RED.filled())),
    )
    .map_err(render_err)?;

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartShaper;
    use crate::source::{MockSource, TimelineSource};
    use tempfile::tempdir;

    #[test]
    fn test_render_mock_day() {
        let timeline = MockSource.daily_timeline().unwrap();
        let chart = ChartShaper::default().shape_timeline(&timeline);
        let dir = tempdir().unwrap();
        let path = dir.path().join("day.svg");

        render_chart_svg(&timeline, &chart, &ChartConfig::default(), &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Cognitive readiness"));
    }

    #[test]
    fn test_axis_hour_wraps_past_midnight() {
        let config = ChartConfig {
            origin_hour: 22.0,
            ..ChartConfig::default()
        };
        assert_eq!(axis_hour(&config, 23.0), 23.0);
        assert_eq!(axis_hour(&config, 9.25), 33.25);
        assert_eq!(tick_label(&33.0), "9am");
    }
}
