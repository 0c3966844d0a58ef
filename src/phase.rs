//! Circadian phase classifier
//!
//! Splits the waking day into morning peak, afternoon dip and evening peak
//! by hours since wake time. Everything else is sleep.

use crate::models::PhaseLabel;

/// Hours after waking beyond which the day counts as sleep
pub const AWAKE_SPAN_HOURS: f64 = 16.0;

/// End of the morning peak, hours after waking (exclusive)
pub const MORNING_PEAK_END: f64 = 5.0;

/// End of the afternoon dip, hours after waking (exclusive)
pub const AFTERNOON_DIP_END: f64 = 9.0;

/// Classify a clock hour into a circadian phase relative to wake time.
///
/// Boundaries belong to the later phase: exactly five hours after waking is
/// already the afternoon dip. Sixteen hours after waking is still evening.
pub fn classify_phase(hour: f64, wake_hour: f64) -> PhaseLabel {
    let hours_after_wake = hour - wake_hour;

    if hours_after_wake < 0.0 || hours_after_wake > AWAKE_SPAN_HOURS {
        PhaseLabel::Sleep
    } else if hours_after_wake < MORNING_PEAK_END {
        PhaseLabel::MorningPeak
    } else if hours_after_wake < AFTERNOON_DIP_END {
        PhaseLabel::AfternoonDip
    } else {
        PhaseLabel::EveningPeak
    }
}
