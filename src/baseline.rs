//! Circadian baseline curve
//!
//! Produces the synthetic "typical alertness" curve for a day at 15-minute
//! resolution. Awake samples combine a constant floor, a half-sine envelope
//! across the awake span, a linear morning rise and a fixed early-afternoon
//! dip, then apply the post-exercise boost and clamp. Asleep samples take a
//! flat low value.
//!
//! Generation is total: degenerate or non-finite schedules are not rejected
//! here (use [`generate_validated`] for that). NaN input propagates to NaN
//! samples.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

use crate::boost;
use crate::error::ScheduleError;
use crate::models::{Schedule, WorkoutEvent};

/// Number of samples in a day
pub const SAMPLES_PER_DAY: usize = 96;

/// Spacing between samples in hours
pub const RESOLUTION_HOURS: f64 = 0.25;

/// Samples per hour of clock time
pub const SAMPLES_PER_HOUR: f64 = 1.0 / RESOLUTION_HOURS;

/// Shape constants of the baseline model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Value emitted outside the awake window
    pub sleep_value: f64,

    /// Constant alertness floor while awake
    pub floor: f64,

    /// Amplitude of the half-sine envelope over the awake span
    pub sine_amplitude: f64,

    /// Hours after waking during which the morning rise applies
    pub morning_ramp_hours: f64,

    /// Morning rise per hour after waking
    pub morning_ramp_rate: f64,

    /// Start of the afternoon dip, hours after waking (inclusive)
    pub dip_start_hours: f64,

    /// End of the afternoon dip, hours after waking (exclusive)
    pub dip_end_hours: f64,

    /// Penalty subtracted during the afternoon dip
    pub dip_penalty: f64,

    /// Lower clamp for awake samples
    pub min_awake: f64,

    /// Upper clamp for awake samples
    pub max_awake: f64,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        BaselineConfig {
            sleep_value: 20.0,
            floor: 40.0,
            sine_amplitude: 25.0,
            morning_ramp_hours: 4.0,
            morning_ramp_rate: 8.0,
            dip_start_hours: 6.0,
            dip_end_hours: 9.0,
            dip_penalty: 15.0,
            min_awake: 30.0,
            max_awake: 95.0,
        }
    }
}

impl BaselineConfig {
    pub fn validate(&self) -> Result<(), String> {
        let constants = [
            ("sleep_value", self.sleep_value),
            ("floor", self.floor),
            ("sine_amplitude", self.sine_amplitude),
            ("morning_ramp_hours", self.morning_ramp_hours),
            ("morning_ramp_rate", self.morning_ramp_rate),
            ("dip_start_hours", self.dip_start_hours),
            ("dip_end_hours", self.dip_end_hours),
            ("dip_penalty", self.dip_penalty),
            ("min_awake", self.min_awake),
            ("max_awake", self.max_awake),
        ];
        if let Some((name, value)) = constants.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("baseline.{} must be finite, got {}", name, value));
        }

        if self.min_awake > self.max_awake {
            return Err(format!(
                "baseline.min_awake ({}) exceeds baseline.max_awake ({})",
                self.min_awake, self.max_awake
            ));
        }
        if self.dip_start_hours > self.dip_end_hours {
            return Err(format!(
                "baseline.dip_start_hours ({}) exceeds baseline.dip_end_hours ({})",
                self.dip_start_hours, self.dip_end_hours
            ));
        }
        Ok(())
    }
}

/// One day of baseline alertness, 96 samples from midnight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaselineSeries {
    values: Vec<f64>,
}

impl BaselineSeries {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clock hour of sample `index`
    pub fn hour_at(index: usize) -> f64 {
        index as f64 * RESOLUTION_HOURS
    }

    /// Sample covering clock hour `hour`, if within the day
    pub fn value_at_hour(&self, hour: f64) -> Option<f64> {
        if !(0.0..24.0).contains(&hour) {
            return None;
        }
        let index = (hour * SAMPLES_PER_HOUR).floor() as usize;
        self.values.get(index).copied()
    }

    /// `(hour, value)` pairs in clock order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (Self::hour_at(i), v))
    }

    /// Earliest sample with the highest value
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.iter().fold(None, |best, (hour, value)| match best {
            Some((_, best_value)) if best_value >= value => best,
            _ => Some((hour, value)),
        })
    }
}

/// Baseline curve generator
#[derive(Debug, Clone, Default)]
pub struct BaselineGenerator {
    config: BaselineConfig,
}

impl BaselineGenerator {
    /// Create generator with default model constants
    pub fn new() -> Self {
        BaselineGenerator {
            config: BaselineConfig::default(),
        }
    }

    /// Create generator with custom model constants, rejecting invalid ones
    pub fn with_config(config: BaselineConfig) -> Result<Self, String> {
        config.validate()?;
        Ok(BaselineGenerator { config })
    }

    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// Generate the 96-sample baseline for a schedule and its workouts
    pub fn generate(&self, schedule: &Schedule, workouts: &[WorkoutEvent]) -> BaselineSeries {
        let values: Vec<f64> = (0..SAMPLES_PER_DAY)
            .map(|i| self.sample(BaselineSeries::hour_at(i), schedule, workouts))
            .collect();

        debug!(
            wake_hour = schedule.wake_hour,
            sleep_hour = schedule.sleep_hour,
            workouts = workouts.len(),
            "Generated circadian baseline"
        );

        BaselineSeries { values }
    }

    /// Value of the curve at clock hour `hour`
    pub fn sample(&self, hour: f64, schedule: &Schedule, workouts: &[WorkoutEvent]) -> f64 {
        let c = &self.config;

        if hour < schedule.wake_hour || hour > schedule.sleep_hour {
            return c.sleep_value;
        }

        let value = self.pre_boost_value(hour - schedule.wake_hour, schedule.hours_awake());
        let boosted = boost::apply_boost(value, hour, workouts);

        // Bounds are finite and ordered (see `with_config`); a NaN value stays NaN
        boosted.clamp(c.min_awake, c.max_awake)
    }

    /// Awake value before boost and clamping
    fn pre_boost_value(&self, hours_after_wake: f64, hours_awake: f64) -> f64 {
        let c = &self.config;

        let envelope = (hours_after_wake / hours_awake * PI).sin() * c.sine_amplitude;
        let morning_rise = if hours_after_wake < c.morning_ramp_hours {
            hours_after_wake * c.morning_ramp_rate
        } else {
            0.0
        };
        let afternoon_dip =
            if hours_after_wake >= c.dip_start_hours && hours_after_wake < c.dip_end_hours {
                c.dip_penalty
            } else {
                0.0
            };

        c.floor + envelope + morning_rise - afternoon_dip
    }
}

/// Generate a baseline with the default model
pub fn generate_baseline(schedule: &Schedule, workouts: &[WorkoutEvent]) -> BaselineSeries {
    BaselineGenerator::new().generate(schedule, workouts)
}

/// Generate a baseline after checking the schedule and every workout
pub fn generate_validated(
    schedule: &Schedule,
    workouts: &[WorkoutEvent],
) -> Result<BaselineSeries, ScheduleError> {
    schedule.validate()?;
    for workout in workouts {
        workout.validate()?;
    }
    Ok(generate_baseline(schedule, workouts))
}
