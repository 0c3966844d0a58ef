//! Post-exercise alertness boost
//!
//! Exercise raises alertness for roughly four hours afterwards, strongest in
//! the first hour. Each workout contributes a tiered multiplier and multiple
//! workouts compose multiplicatively.

use serde::{Deserialize, Serialize};

use crate::models::WorkoutEvent;

/// Length of the post-exercise window in hours
pub const BOOST_WINDOW_HOURS: f64 = 4.0;

/// Tiered boost by time elapsed since the workout started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostTier {
    /// 0-1h after the workout
    Immediate,
    /// 1-2h after the workout
    Elevated,
    /// 2-4h after the workout
    Residual,
    /// Before the workout, or 4h and more after it
    None,
}

impl BoostTier {
    /// Classify elapsed hours since a workout.
    ///
    /// Both ends of the window are exclusive: a workout starting exactly at
    /// the evaluated hour does not boost it yet.
    pub fn from_elapsed(elapsed_hours: f64) -> Self {
        if !(elapsed_hours > 0.0 && elapsed_hours < BOOST_WINDOW_HOURS) {
            BoostTier::None
        } else if elapsed_hours < 1.0 {
            BoostTier::Immediate
        } else if elapsed_hours < 2.0 {
            BoostTier::Elevated
        } else {
            BoostTier::Residual
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            BoostTier::Immediate => 1.5,
            BoostTier::Elevated => 1.3,
            BoostTier::Residual => 1.1,
            BoostTier::None => 1.0,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BoostTier::Immediate => "Immediately post-exercise (50% boost)",
            BoostTier::Elevated => "Post-exercise window (30% boost)",
            BoostTier::Residual => "Late post-exercise window (10% boost)",
            BoostTier::None => "No post-exercise boost",
        }
    }
}

/// Multiplier contributed by one workout `elapsed_hours` ago
pub fn boost_multiplier(elapsed_hours: f64) -> f64 {
    BoostTier::from_elapsed(elapsed_hours).multiplier()
}

/// Product of every workout's multiplier at `hour`
pub fn combined_boost(hour: f64, workouts: &[WorkoutEvent]) -> f64 {
    workouts
        .iter()
        .map(|w| boost_multiplier(hour - w.time_hour))
        .product()
}

/// Scale a pre-boost alertness value by the combined workout boost
pub fn apply_boost(value: f64, hour: f64, workouts: &[WorkoutEvent]) -> f64 {
    value * combined_boost(hour, workouts)
}
