//! Chart data shaping
//!
//! Turns a baseline series, a measured session and peak/event markers into
//! display-ready points. Tick labels are derived from each sample's clock
//! hour, so a different stride or series length still labels correctly.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::warn;

use crate::baseline::{RESOLUTION_HOURS, SAMPLES_PER_DAY};
use crate::models::{DailyTimeline, LriSample, PeakEvent, SessionOverlay, TimelineEvent};
use crate::timefmt;

/// Chart shaping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Keep every `stride`-th baseline sample (12 = every 3 hours)
    pub stride: usize,

    /// Hours between baseline samples
    pub resolution_hours: f64,

    /// Clock hour of baseline sample 0
    pub origin_hour: f64,

    /// First hour of the peak-marker display domain
    pub display_start_hour: f64,

    /// Last hour of the peak-marker display domain
    pub display_end_hour: f64,

    /// Chart width in pixels
    pub width_px: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            stride: 12,
            resolution_hours: RESOLUTION_HOURS,
            origin_hour: 0.0,
            display_start_hour: 6.0,
            display_end_hour: 24.0,
            width_px: 330.0,
        }
    }
}

impl ChartConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.stride == 0 {
            return Err("chart.stride must be at least 1".to_string());
        }
        if !(self.resolution_hours > 0.0) {
            return Err(format!(
                "chart.resolution_hours must be positive, got {}",
                self.resolution_hours
            ));
        }
        if !(self.width_px > 0.0) {
            return Err(format!("chart.width_px must be positive, got {}", self.width_px));
        }
        if !(self.display_end_hour > self.display_start_hour) {
            return Err(format!(
                "chart display domain is empty: [{}, {}]",
                self.display_start_hour, self.display_end_hour
            ));
        }
        Ok(())
    }

    /// Clock hour of baseline sample `index`, wrapped into `[0, 24)`
    pub fn hour_of_index(&self, index: usize) -> f64 {
        (self.origin_hour + index as f64 * self.resolution_hours).rem_euclid(24.0)
    }

    /// Fractional sample position of clock `hour`, counted forward from the origin
    pub fn position_of_hour(&self, hour: f64) -> f64 {
        (hour - self.origin_hour).rem_euclid(24.0) / self.resolution_hours
    }
}

/// Downsampled baseline point with its clock label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTick {
    /// Index into the full baseline
    pub index: usize,
    pub hour: f64,
    pub label: String,
    pub value: f64,
}

/// Peak marker placed along the display domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakMarker {
    pub hour: f64,
    pub lri: f64,
    pub x_px: f64,
}

/// Event marker with its 24h time label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMarker {
    pub hour: f64,
    pub kind: String,
    pub icon: String,
    pub label: String,
    pub time_label: String,
}

/// Display-ready chart structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub baseline_ticks: Vec<BaselineTick>,
    pub session_points: Vec<LriSample>,
    /// Baseline index range covered by the session
    pub session_range: Option<Range<usize>>,
    pub peak_markers: Vec<PeakMarker>,
    pub event_markers: Vec<EventMarker>,
}

impl ChartData {
    /// True when there is no baseline to draw
    pub fn is_empty(&self) -> bool {
        self.baseline_ticks.is_empty()
    }
}

/// Shapes timeline data into [`ChartData`]
#[derive(Debug, Clone, Default)]
pub struct ChartShaper {
    config: ChartConfig,
}

impl ChartShaper {
    pub fn new(config: ChartConfig) -> Self {
        ChartShaper { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Shape a daily timeline document
    pub fn shape_timeline(&self, timeline: &DailyTimeline) -> ChartData {
        self.shape(
            &timeline.circadian_baseline,
            &timeline.measured_session,
            &timeline.gamma_peaks,
            &timeline.events,
        )
    }

    pub fn shape(
        &self,
        baseline: &[f64],
        session: &SessionOverlay,
        peaks: &[PeakEvent],
        events: &[TimelineEvent],
    ) -> ChartData {
        if !baseline.is_empty() && baseline.len() != SAMPLES_PER_DAY {
            warn!(
                samples = baseline.len(),
                expected = SAMPLES_PER_DAY,
                "Baseline has unexpected length; ticks cover only the samples given"
            );
        }

        ChartData {
            baseline_ticks: self.baseline_ticks(baseline),
            session_points: session.lri_values.clone(),
            session_range: self.session_range(session, baseline.len()),
            peak_markers: peaks.iter().map(|p| self.peak_marker(p)).collect(),
            event_markers: events.iter().map(event_marker).collect(),
        }
    }

    /// Clock hour of baseline sample `index`, wrapped into `[0, 24)`
    pub fn hour_of_index(&self, index: usize) -> f64 {
        self.config.hour_of_index(index)
    }

    /// Every `stride`-th sample, labelled by clock time
    pub fn baseline_ticks(&self, baseline: &[f64]) -> Vec<BaselineTick> {
        baseline
            .iter()
            .enumerate()
            .step_by(self.config.stride.max(1))
            .map(|(index, &value)| {
                let hour = self.hour_of_index(index);
                BaselineTick {
                    index,
                    hour,
                    label: timefmt::hour_to_short_label(hour),
                    value,
                }
            })
            .collect()
    }

    /// Horizontal pixel position of `hour` across the display domain
    pub fn x_position(&self, hour: f64) -> f64 {
        let c = &self.config;
        (hour - c.display_start_hour) / (c.display_end_hour - c.display_start_hour) * c.width_px
    }

    fn peak_marker(&self, peak: &PeakEvent) -> PeakMarker {
        PeakMarker {
            hour: peak.hour,
            lri: peak.lri,
            x_px: self.x_position(peak.hour),
        }
    }

    /// Baseline indices spanned by the session, clamped to the series length
    fn session_range(&self, session: &SessionOverlay, len: usize) -> Option<Range<usize>> {
        if len == 0 || !session.start_hour.is_finite() || !session.end_hour.is_finite() {
            return None;
        }

        let start_pos = self.config.position_of_hour(session.start_hour);
        let end_pos =
            start_pos + (session.end_hour - session.start_hour) / self.config.resolution_hours;

        let start = start_pos.floor().max(0.0) as usize;
        let end = end_pos.ceil().max(0.0) as usize;
        let start = start.min(len);
        let end = end.min(len);

        if start >= end {
            None
        } else {
            Some(start..end)
        }
    }
}

fn event_marker(event: &TimelineEvent) -> EventMarker {
    EventMarker {
        hour: event.hour,
        kind: event.kind.clone(),
        icon: event.icon.clone(),
        label: event.label.clone(),
        time_label: timefmt::hour_to_24h_string(event.hour),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::generate_baseline;
    use crate::models::Schedule;

    fn session() -> SessionOverlay {
        SessionOverlay {
            start_hour: 9.25,
            end_hour: 9.92,
            lri_values: vec![
                LriSample { hour: 9.25, lri: 64.0 },
                LriSample { hour: 9.42, lri: 82.0 },
            ],
        }
    }

    #[test]
    fn test_ticks_every_three_hours_from_midnight() {
        let baseline = generate_baseline(&Schedule::default(), &[]);
        let chart = ChartShaper::default().shape(baseline.values(), &session(), &[], &[]);

        let labels: Vec<&str> = chart.baseline_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["12am", "3am", "6am", "9am", "12pm", "3pm", "6pm", "9pm"]
        );
        assert_eq!(chart.baseline_ticks[3].index, 36);
        assert_eq!(chart.baseline_ticks[3].value, baseline.values()[36]);
    }

    #[test]
    fn test_labels_follow_origin_and_stride() {
        let shaper = ChartShaper::new(ChartConfig {
            stride: 8,
            origin_hour: 6.0,
            ..ChartConfig::default()
        });
        let ticks = shaper.baseline_ticks(&[50.0; 96]);
        assert_eq!(ticks.len(), 12);
        assert_eq!(ticks[0].label, "6am");
        assert_eq!(ticks[1].label, "8am");
        assert_eq!(ticks[9].label, "12am");
    }

    #[test]
    fn test_short_baseline_keeps_correct_labels() {
        let chart = ChartShaper::default().shape(&[30.0; 30], &session(), &[], &[]);
        let labels: Vec<&str> = chart.baseline_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["12am", "3am", "6am"]);
        assert_eq!(chart.session_range, None);
    }

    #[test]
    fn test_session_passthrough_and_range() {
        let baseline = [40.0; 96];
        let chart = ChartShaper::default().shape(&baseline, &session(), &[], &[]);
        assert_eq!(chart.session_points, session().lri_values);
        assert_eq!(chart.session_range, Some(37..40));
    }

    #[test]
    fn test_session_range_follows_origin() {
        let shaper = ChartShaper::new(ChartConfig {
            origin_hour: 6.0,
            ..ChartConfig::default()
        });
        let chart = shaper.shape(&[40.0; 72], &session(), &[], &[]);

        let range = chart.session_range.clone().unwrap();
        assert_eq!(range, 13..16);
        assert_eq!(shaper.hour_of_index(range.start), 9.25);
        assert!(shaper.hour_of_index(range.end - 1) < 9.92);
        assert!(shaper.hour_of_index(range.end) >= 9.92);
    }

    #[test]
    fn test_session_range_follows_resolution_and_wraps() {
        let half_hourly = ChartShaper::new(ChartConfig {
            resolution_hours: 0.5,
            ..ChartConfig::default()
        });
        let chart = half_hourly.shape(&[40.0; 48], &session(), &[], &[]);
        assert_eq!(chart.session_range, Some(18..20));

        // Series starting at 22:00: a 9:15 session is 11.25h in
        let evening = ChartShaper::new(ChartConfig {
            origin_hour: 22.0,
            ..ChartConfig::default()
        });
        let chart = evening.shape(&[40.0; 96], &session(), &[], &[]);
        assert_eq!(chart.session_range, Some(45..48));
        assert_eq!(evening.hour_of_index(45), 9.25);
    }

    #[test]
    fn test_peak_marker_positions() {
        let shaper = ChartShaper::new(ChartConfig {
            width_px: 180.0,
            ..ChartConfig::default()
        });
        let peaks = [
            PeakEvent { hour: 6.0, lri: 80.0, duration_min: None },
            PeakEvent { hour: 15.0, lri: 81.0, duration_min: Some(2.5) },
            PeakEvent { hour: 24.0, lri: 82.0, duration_min: None },
        ];
        let chart = shaper.shape(&[40.0; 96], &session(), &peaks, &[]);
        let xs: Vec<f64> = chart.peak_markers.iter().map(|m| m.x_px).collect();
        assert_eq!(xs, vec![0.0, 90.0, 180.0]);
    }

    #[test]
    fn test_event_markers() {
        let events = [TimelineEvent {
            hour: 7.25,
            kind: "workout".to_string(),
            icon: "run".to_string(),
            label: "Run".to_string(),
        }];
        let chart = ChartShaper::default().shape(&[40.0; 96], &session(), &[], &events);
        assert_eq!(chart.event_markers[0].time_label, "7:15");
        assert_eq!(chart.event_markers[0].kind, "workout");
    }

    #[test]
    fn test_empty_baseline() {
        let chart = ChartShaper::default().shape(&[], &session(), &[], &[]);
        assert!(chart.is_empty());
        assert_eq!(chart.session_range, None);
    }

    #[test]
    fn test_zero_stride_does_not_panic() {
        let shaper = ChartShaper::new(ChartConfig {
            stride: 0,
            ..ChartConfig::default()
        });
        assert!(shaper.config().validate().is_err());
        assert_eq!(shaper.baseline_ticks(&[1.0, 2.0, 3.0]).len(), 3);
    }
}
