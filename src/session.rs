//! Session context summary
//!
//! Assembles the "your peak window" card data: when the session ran, how
//! long after exercise, which circadian phase it fell in and how many peak
//! moments it contained.

use serde::{Deserialize, Serialize};

use crate::boost::{BoostTier, BOOST_WINDOW_HOURS};
use crate::models::{LriSample, PeakEvent, PhaseLabel, Schedule, SessionWindow, WorkoutRecord};
use crate::phase::classify_phase;
use crate::timefmt;

/// LRI above which a sample counts as a peak moment
pub const PEAK_LRI_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTime {
    pub start: String,
    pub end: String,
    pub duration_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCircumstances {
    /// Hours since the last workout started; negative if it is still ahead
    pub post_exercise_hours: Option<f64>,
    pub circadian_phase: PhaseLabel,
    pub workout_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPerformance {
    pub peak_moments: usize,
    #[serde(default)]
    pub flow_minutes: Option<f64>,
}

/// Session context document as served by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_time: SessionTime,
    pub context: SessionCircumstances,
    pub performance: SessionPerformance,
}

impl SessionContext {
    /// Build the context for a measured session
    pub fn assemble(
        window: &SessionWindow,
        schedule: &Schedule,
        last_workout: Option<&WorkoutRecord>,
        peaks: &[PeakEvent],
        flow_minutes: Option<f64>,
    ) -> Self {
        let start_hour = timefmt::hour_of_day(&window.start);
        let end_hour = timefmt::hour_of_day(&window.end);

        let post_exercise_hours =
            timefmt::elapsed_hours_between(&window.start, last_workout.map(|w| &w.start_time));

        SessionContext {
            session_time: SessionTime {
                start: timefmt::hour_to_clock_string(start_hour),
                end: timefmt::hour_to_clock_string(end_hour),
                duration_minutes: window.duration_minutes().round(),
            },
            context: SessionCircumstances {
                post_exercise_hours,
                circadian_phase: classify_phase(start_hour, schedule.wake_hour),
                workout_type: last_workout.map(|w| w.workout_type.clone()),
            },
            performance: SessionPerformance {
                peak_moments: peaks.len(),
                flow_minutes,
            },
        }
    }

    /// Post-exercise timing copy for this session
    pub fn timing_context(&self) -> Option<String> {
        timing_context(self.context.post_exercise_hours)
    }

    /// Boost tier the session started in
    pub fn boost_tier(&self) -> BoostTier {
        self.context
            .post_exercise_hours
            .map(BoostTier::from_elapsed)
            .unwrap_or(BoostTier::None)
    }
}

/// Describe where a session sits relative to the last workout.
///
/// One to four hours after exercise is the optimal window; under an hour is
/// "immediately"; anything else, including no workout, gets no copy.
pub fn timing_context(post_exercise_hours: Option<f64>) -> Option<String> {
    match post_exercise_hours {
        Some(h) if (1.0..=BOOST_WINDOW_HOURS).contains(&h) => {
            Some(format!("{}h post-exercise (optimal window)", h.round()))
        }
        Some(h) if h > 0.0 && h < 1.0 => Some("Immediately post-exercise".to_string()),
        _ => None,
    }
}

/// Count samples whose LRI exceeds `threshold`
pub fn count_peak_moments(samples: &[LriSample], threshold: f64) -> usize {
    samples.iter().filter(|s| s.lri > threshold).count()
}
