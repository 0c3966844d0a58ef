use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;
use crate::timefmt;

/// Daily wake/sleep window in decimal 24h hours (6.5 = 6:30)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Hour the user wakes up
    pub wake_hour: f64,

    /// Hour the user goes to sleep
    pub sleep_hour: f64,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            wake_hour: 6.5,
            sleep_hour: 22.0,
        }
    }
}

impl Schedule {
    /// Create a validated schedule with `0 <= wake < sleep <= 24`
    pub fn new(wake_hour: f64, sleep_hour: f64) -> Result<Self, ScheduleError> {
        let schedule = Schedule {
            wake_hour,
            sleep_hour,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check the schedule invariants without consuming it
    pub fn validate(&self) -> Result<(), ScheduleError> {
        check_clock_hour("wake_hour", self.wake_hour)?;
        check_clock_hour("sleep_hour", self.sleep_hour)?;

        if self.wake_hour >= self.sleep_hour {
            return Err(ScheduleError::WakeNotBeforeSleep {
                wake_hour: self.wake_hour,
                sleep_hour: self.sleep_hour,
            });
        }

        Ok(())
    }

    /// Length of the awake window in hours
    pub fn hours_awake(&self) -> f64 {
        self.sleep_hour - self.wake_hour
    }

    /// True if `hour` falls inside the inclusive awake window
    pub fn is_awake_at(&self, hour: f64) -> bool {
        hour >= self.wake_hour && hour <= self.sleep_hour
    }
}

fn check_clock_hour(field: &'static str, value: f64) -> Result<(), ScheduleError> {
    if !value.is_finite() {
        return Err(ScheduleError::NonFinite { field, value });
    }
    if !(0.0..=24.0).contains(&value) {
        return Err(ScheduleError::OutOfRange { field, value });
    }
    Ok(())
}

/// A single exercise event; only its start time drives the boost model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEvent {
    /// Start time as decimal 24h hour
    pub time_hour: f64,

    /// Duration in minutes
    pub duration_minutes: f64,
}

impl WorkoutEvent {
    /// Create a validated workout event
    pub fn new(time_hour: f64, duration_minutes: f64) -> Result<Self, ScheduleError> {
        let workout = WorkoutEvent {
            time_hour,
            duration_minutes,
        };
        workout.validate()?;
        Ok(workout)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !self.time_hour.is_finite() {
            return Err(ScheduleError::NonFinite {
                field: "time_hour",
                value: self.time_hour,
            });
        }
        if !self.duration_minutes.is_finite() {
            return Err(ScheduleError::NonFinite {
                field: "duration_minutes",
                value: self.duration_minutes,
            });
        }
        if self.duration_minutes < 0.0 {
            return Err(ScheduleError::NegativeDuration {
                minutes: self.duration_minutes,
            });
        }
        Ok(())
    }
}

impl FromStr for WorkoutEvent {
    type Err = ScheduleError;

    /// Parse `HOUR[,MINUTES]`, where HOUR is `7.25` or `07:15`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ScheduleError::InvalidWorkout {
            input: s.to_string(),
            reason,
        };

        let mut parts = s.splitn(2, ',');
        let hour_part = parts.next().unwrap_or("").trim();
        let time_hour = timefmt::parse_hour(hour_part).map_err(|e| invalid(e.to_string()))?;

        let duration_minutes = match parts.next() {
            Some(minutes) => minutes
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(format!("duration: {}", e)))?,
            None => 0.0,
        };

        WorkoutEvent::new(time_hour, duration_minutes)
    }
}

/// Workout as reported by the backend, with an absolute start time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub workout_type: String,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: f64,
    #[serde(default)]
    pub is_high_intensity: bool,
}

impl WorkoutRecord {
    /// Project onto the time-of-day event used by the boost model
    pub fn to_event(&self) -> WorkoutEvent {
        WorkoutEvent {
            time_hour: timefmt::hour_of_day(&self.start_time),
            duration_minutes: self.duration_minutes,
        }
    }
}

/// One measured LRI value at a decimal hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LriSample {
    pub hour: f64,
    pub lri: f64,
}

/// Measured EEG session overlaid on the baseline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionOverlay {
    pub start_hour: f64,
    pub end_hour: f64,
    pub lri_values: Vec<LriSample>,
}

impl SessionOverlay {
    /// Session length in minutes
    pub fn duration_minutes(&self) -> f64 {
        (self.end_hour - self.start_hour) * 60.0
    }

    /// Highest LRI sample, if any
    pub fn peak(&self) -> Option<LriSample> {
        self.lri_values
            .iter()
            .copied()
            .fold(None, |best: Option<LriSample>, s| match best {
                Some(b) if b.lri >= s.lri => Some(b),
                _ => Some(s),
            })
    }
}

/// High-LRI moment detected by the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakEvent {
    pub hour: f64,
    pub lri: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
}

/// Wake/workout marker shown above the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub hour: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub label: String,
}

/// Coarse day segment derived from wake time and clock hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    MorningPeak,
    AfternoonDip,
    EveningPeak,
    Sleep,
}

impl PhaseLabel {
    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseLabel::MorningPeak => "morning_peak",
            PhaseLabel::AfternoonDip => "afternoon_dip",
            PhaseLabel::EveningPeak => "evening_peak",
            PhaseLabel::Sleep => "sleep",
        }
    }

    /// Display copy for the session context card
    pub fn description(&self) -> &'static str {
        match self {
            PhaseLabel::MorningPeak => "Morning peak period",
            PhaseLabel::AfternoonDip => "Afternoon recovery",
            PhaseLabel::EveningPeak => "Evening peak period",
            PhaseLabel::Sleep => "Sleep period",
        }
    }
}

impl fmt::Display for PhaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wake/sleep times as the backend names them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserSchedule {
    pub wake_time: f64,
    pub sleep_time: f64,
}

impl From<UserSchedule> for Schedule {
    fn from(s: UserSchedule) -> Self {
        Schedule {
            wake_hour: s.wake_time,
            sleep_hour: s.sleep_time,
        }
    }
}

impl From<Schedule> for UserSchedule {
    fn from(s: Schedule) -> Self {
        UserSchedule {
            wake_time: s.wake_hour,
            sleep_time: s.sleep_hour,
        }
    }
}

/// Daily timeline document as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTimeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_schedule: Option<UserSchedule>,

    /// 96 samples at 15-minute resolution
    pub circadian_baseline: Vec<f64>,

    pub measured_session: SessionOverlay,

    #[serde(default)]
    pub gamma_peaks: Vec<PeakEvent>,

    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

impl DailyTimeline {
    /// Schedule of the document, or the given fallback
    pub fn schedule_or(&self, fallback: Schedule) -> Schedule {
        self.user_schedule.map(Schedule::from).unwrap_or(fallback)
    }

    /// Replace the served baseline with one computed locally
    pub fn with_computed_baseline(mut self, schedule: Schedule, workouts: &[WorkoutEvent]) -> Self {
        let series = crate::baseline::generate_baseline(&schedule, workouts);
        self.circadian_baseline = series.into_values();
        self.user_schedule = Some(schedule.into());
        self
    }

    /// Workout events derived from the `workout` markers
    pub fn workout_events(&self) -> Vec<WorkoutEvent> {
        self.events
            .iter()
            .filter(|e| e.kind == "workout")
            .map(|e| WorkoutEvent {
                time_hour: e.hour,
                duration_minutes: 0.0,
            })
            .collect()
    }
}

/// Absolute time span of a measured session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SessionWindow {
    pub fn duration_minutes(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_validation() {
        assert!(Schedule::new(6.5, 22.0).is_ok());
        assert_eq!(
            Schedule::new(22.0, 6.0),
            Err(ScheduleError::WakeNotBeforeSleep {
                wake_hour: 22.0,
                sleep_hour: 6.0
            })
        );
        assert!(matches!(
            Schedule::new(6.0, 6.0),
            Err(ScheduleError::WakeNotBeforeSleep { .. })
        ));
        assert!(matches!(
            Schedule::new(f64::NAN, 22.0),
            Err(ScheduleError::NonFinite { field: "wake_hour", .. })
        ));
        assert!(matches!(
            Schedule::new(6.0, 25.0),
            Err(ScheduleError::OutOfRange { field: "sleep_hour", .. })
        ));
    }

    #[test]
    fn test_awake_window_is_inclusive() {
        let schedule = Schedule::default();
        assert!(schedule.is_awake_at(6.5));
        assert!(schedule.is_awake_at(22.0));
        assert!(!schedule.is_awake_at(22.25));
        assert_eq!(schedule.hours_awake(), 15.5);
    }

    #[test]
    fn test_workout_parsing() {
        let w: WorkoutEvent = "7.25,32".parse().unwrap();
        assert_eq!(w.time_hour, 7.25);
        assert_eq!(w.duration_minutes, 32.0);

        let w: WorkoutEvent = "07:15".parse().unwrap();
        assert_eq!(w.time_hour, 7.25);
        assert_eq!(w.duration_minutes, 0.0);

        assert!(matches!(
            "7.25,-5".parse::<WorkoutEvent>(),
            Err(ScheduleError::NegativeDuration { .. })
        ));
        assert!(matches!(
            "soon".parse::<WorkoutEvent>(),
            Err(ScheduleError::InvalidWorkout { .. })
        ));
    }

    #[test]
    fn test_phase_label_serde() {
        let json = serde_json::to_string(&PhaseLabel::AfternoonDip).unwrap();
        assert_eq!(json, "\"afternoon_dip\"");
        let parsed: PhaseLabel = serde_json::from_str("\"evening_peak\"").unwrap();
        assert_eq!(parsed, PhaseLabel::EveningPeak);
        assert_eq!(PhaseLabel::Sleep.to_string(), "sleep");
    }

    #[test]
    fn test_session_peak() {
        let session = SessionOverlay {
            start_hour: 9.25,
            end_hour: 9.75,
            lri_values: vec![
                LriSample { hour: 9.25, lri: 64.0 },
                LriSample { hour: 9.5, lri: 84.0 },
                LriSample { hour: 9.75, lri: 70.0 },
            ],
        };
        assert_eq!(session.peak().unwrap().lri, 84.0);
        assert!((session.duration_minutes() - 30.0).abs() < 1e-9);
        assert!(SessionOverlay::default().peak().is_none());
    }

    #[test]
    fn test_timeline_event_type_field() {
        let json = r#"{"hour": 7.25, "type": "workout", "icon": "run", "label": "Run"}"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, "workout");
    }
}
