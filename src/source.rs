//! Timeline data sources
//!
//! The timeline and session context normally come from the backend. This
//! module reads them from a JSON export or serves a built-in demo day, and
//! the choice (plus whether a failing file falls back to the demo day) is
//! plain configuration handed in at construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::baseline::generate_baseline;
use crate::error::{Result, SourceError};
use crate::models::{
    DailyTimeline, LriSample, PeakEvent, Schedule, SessionOverlay, SessionWindow,
    TimelineEvent, WorkoutRecord,
};
use crate::session::SessionContext;
use crate::timefmt::parse_timestamp;

/// Where timeline data comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSource {
    /// Built-in demo day
    Mock,
    /// JSON document exported from the backend
    File { path: PathBuf },
}

/// Data source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    /// Serve the demo day when the configured source fails
    pub fallback_to_mock: bool,

    pub source: DataSource,
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings {
            source: DataSource::Mock,
            fallback_to_mock: false,
        }
    }
}

/// Provider of daily timeline and session context documents
pub trait TimelineSource {
    /// Human-readable source name for logs and errors
    fn name(&self) -> String;

    fn daily_timeline(&self) -> Result<DailyTimeline>;

    fn session_context(&self) -> Result<SessionContext>;
}

/// Build the source described by the settings
pub fn source_from_settings(settings: &DataSettings) -> Box<dyn TimelineSource> {
    match (&settings.source, settings.fallback_to_mock) {
        (DataSource::Mock, _) => Box::new(MockSource),
        (DataSource::File { path }, false) => Box::new(FileSource::new(path.clone())),
        (DataSource::File { path }, true) => {
            Box::new(FallbackSource::new(FileSource::new(path.clone())))
        }
    }
}

/// Demo day: wake 6:30, a 7:15 run, a 40-minute session from 9:15
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSource;

impl MockSource {
    const DATE: (i32, u32, u32) = (2025, 11, 9);

    fn schedule() -> Schedule {
        Schedule::default()
    }

    fn run() -> Result<WorkoutRecord> {
        Ok(WorkoutRecord {
            workout_type: "Running".to_string(),
            start_time: parse_timestamp("2025-11-09T07:15:00Z")?,
            duration_minutes: 32.0,
            is_high_intensity: true,
        })
    }

    fn gamma_peaks() -> Vec<PeakEvent> {
        [(9.42, 82.0, 5.0), (9.62, 78.0, 7.5), (9.83, 81.0, 2.5)]
            .into_iter()
            .map(|(hour, lri, duration)| PeakEvent {
                hour,
                lri,
                duration_min: Some(duration),
            })
            .collect()
    }

    fn measured_session() -> SessionOverlay {
        const SAMPLES: [(f64, f64); 16] = [
            (9.25, 64.0),
            (9.29, 68.0),
            (9.33, 72.0),
            (9.38, 76.0),
            (9.42, 82.0),
            (9.46, 84.0),
            (9.50, 78.0),
            (9.54, 74.0),
            (9.58, 70.0),
            (9.62, 68.0),
            (9.67, 72.0),
            (9.71, 76.0),
            (9.75, 78.0),
            (9.79, 74.0),
            (9.83, 70.0),
            (9.88, 66.0),
        ];

        SessionOverlay {
            start_hour: 9.25,
            end_hour: 9.92,
            lri_values: SAMPLES
                .iter()
                .map(|&(hour, lri)| LriSample { hour, lri })
                .collect(),
        }
    }
}

impl TimelineSource for MockSource {
    fn name(&self) -> String {
        "mock".to_string()
    }

    fn daily_timeline(&self) -> Result<DailyTimeline> {
        let schedule = Self::schedule();
        let run = Self::run()?.to_event();
        let (y, m, d) = Self::DATE;

        Ok(DailyTimeline {
            date: NaiveDate::from_ymd_opt(y, m, d),
            user_schedule: Some(schedule.into()),
            circadian_baseline: generate_baseline(&schedule, &[run]).into_values(),
            measured_session: Self::measured_session(),
            gamma_peaks: Self::gamma_peaks(),
            events: vec![
                TimelineEvent {
                    hour: schedule.wake_hour,
                    kind: "wake".to_string(),
                    icon: "😴".to_string(),
                    label: "Wake".to_string(),
                },
                TimelineEvent {
                    hour: run.time_hour,
                    kind: "workout".to_string(),
                    icon: "🏃".to_string(),
                    label: "Run".to_string(),
                },
            ],
        })
    }

    fn session_context(&self) -> Result<SessionContext> {
        let window = SessionWindow {
            start: parse_timestamp("2025-11-09T09:15:00Z")?,
            end: parse_timestamp("2025-11-09T09:55:00Z")?,
        };

        Ok(SessionContext::assemble(
            &window,
            &Self::schedule(),
            Some(&Self::run()?),
            &Self::gamma_peaks(),
            Some(19.5),
        ))
    }
}

/// File contents: a bundle, or a bare daily timeline
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TimelineDocument {
    Bundle {
        daily_timeline: DailyTimeline,
        #[serde(default)]
        session_context: Option<SessionContext>,
    },
    Bare(DailyTimeline),
}

/// Reads a JSON timeline export from disk on every request
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }

    fn load(&self) -> std::result::Result<TimelineDocument, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::FileNotFound {
                path: self.path.clone(),
            });
        }

        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;

        let document = serde_json::from_str(&content).map_err(|e| SourceError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        debug!(path = %self.path.display(), "Loaded timeline document");
        Ok(document)
    }
}

impl TimelineSource for FileSource {
    fn name(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn daily_timeline(&self) -> Result<DailyTimeline> {
        match self.load()? {
            TimelineDocument::Bundle { daily_timeline, .. } => Ok(daily_timeline),
            TimelineDocument::Bare(timeline) => Ok(timeline),
        }
    }

    fn session_context(&self) -> Result<SessionContext> {
        match self.load()? {
            TimelineDocument::Bundle {
                session_context: Some(context),
                ..
            } => Ok(context),
            _ => Err(SourceError::Missing {
                kind: "session context",
                source_name: self.name(),
            }
            .into()),
        }
    }
}

/// Wraps a source and serves the demo day when it fails
#[derive(Debug, Clone)]
pub struct FallbackSource<S> {
    primary: S,
    fallback: MockSource,
}

impl<S: TimelineSource> FallbackSource<S> {
    pub fn new(primary: S) -> Self {
        FallbackSource {
            primary,
            fallback: MockSource,
        }
    }
}

impl<S: TimelineSource> TimelineSource for FallbackSource<S> {
    fn name(&self) -> String {
        format!("{} (mock fallback)", self.primary.name())
    }

    fn daily_timeline(&self) -> Result<DailyTimeline> {
        self.primary.daily_timeline().or_else(|e| {
            warn!(source = %self.primary.name(), error = %e, "Timeline unavailable, using mock data");
            self.fallback.daily_timeline()
        })
    }

    fn session_context(&self) -> Result<SessionContext> {
        self.primary.session_context().or_else(|e| {
            warn!(source = %self.primary.name(), error = %e, "Session context unavailable, using mock data");
            self.fallback.session_context()
        })
    }
}
