use brainrs::baseline::{generate_baseline, generate_validated, BaselineSeries, SAMPLES_PER_DAY};
use brainrs::boost::{boost_multiplier, combined_boost};
use brainrs::chart::{ChartConfig, ChartShaper};
use brainrs::config::AppConfig;
use brainrs::export::{self, ExportFormat};
use brainrs::models::{PhaseLabel, Schedule, WorkoutEvent};
use brainrs::phase::classify_phase;
use brainrs::session::{count_peak_moments, PEAK_LRI_THRESHOLD};
use brainrs::source::{source_from_settings, DataSettings, DataSource, MockSource, TimelineSource};

/// Integration tests that exercise the complete timeline workflows

#[cfg(test)]
mod integration_tests {
    use super::*;
    use tempfile::tempdir;

    fn run_at(time_hour: f64) -> WorkoutEvent {
        WorkoutEvent {
            time_hour,
            duration_minutes: 32.0,
        }
    }

    #[test]
    fn test_length_for_any_schedule() {
        for (wake, sleep) in [(0.0, 23.75), (6.5, 22.0), (9.0, 12.0), (20.0, 4.0)] {
            let schedule = Schedule {
                wake_hour: wake,
                sleep_hour: sleep,
            };
            assert_eq!(generate_baseline(&schedule, &[]).len(), SAMPLES_PER_DAY);
        }
    }

    #[test]
    fn test_awake_range_and_sleep_value() {
        let schedule = Schedule::default();
        let series = generate_baseline(&schedule, &[run_at(7.25), run_at(8.0)]);

        for (hour, value) in series.iter() {
            if schedule.is_awake_at(hour) {
                assert!((30.0..=95.0).contains(&value), "{} at {}", value, hour);
            } else {
                assert_eq!(value, 20.0, "asleep at {}", hour);
            }
        }
        assert_eq!(series.values()[26], 40.0);
        assert_eq!(series.values()[89], 20.0);
    }

    #[test]
    fn test_boost_tiers_decrease_with_elapsed_time() {
        let tiers: Vec<f64> = [0.5, 1.5, 3.0, 4.0].iter().map(|&h| boost_multiplier(h)).collect();
        assert_eq!(tiers, vec![1.5, 1.3, 1.1, 1.0]);
        assert!(tiers.windows(2).all(|w| w[0] > w[1]));

        for elapsed in [-2.0, -0.01, 0.0, 4.0, 7.5] {
            assert_eq!(boost_multiplier(elapsed), 1.0);
        }
    }

    #[test]
    fn test_phase_boundaries() {
        let wake = 6.5;
        assert_eq!(classify_phase(wake + 5.0, wake), PhaseLabel::AfternoonDip);
        assert_eq!(classify_phase(wake + 4.999, wake), PhaseLabel::MorningPeak);
        assert_eq!(classify_phase(wake + 9.0, wake), PhaseLabel::EveningPeak);
        assert_eq!(classify_phase(wake + 16.0, wake), PhaseLabel::EveningPeak);
        assert_eq!(classify_phase(wake + 16.25, wake), PhaseLabel::Sleep);
    }

    #[test]
    fn test_generation_is_pure() {
        let schedule = Schedule::default();
        let workouts = [run_at(7.25)];
        assert_eq!(
            generate_baseline(&schedule, &workouts),
            generate_baseline(&schedule, &workouts)
        );
    }

    #[test]
    fn test_overlapping_workouts_compose() {
        // At 9.0 the 8.5 workout is 0.5h old and the 7.5 one is 1.5h old
        let multiplier = combined_boost(9.0, &[run_at(8.5), run_at(7.5)]);
        assert!((multiplier - 1.95).abs() < 1e-12);
    }

    #[test]
    fn test_one_hour_after_run_is_elevated_tier() {
        let schedule = Schedule::default();
        let with_run = generate_baseline(&schedule, &[run_at(7.25)]);
        let without = generate_baseline(&schedule, &[]);

        let boosted = with_run.value_at_hour(8.25).unwrap();
        let plain = without.value_at_hour(8.25).unwrap();
        assert!((boosted - plain * 1.3).abs() < 1e-9, "{} vs {}", boosted, plain);
    }

    #[test]
    fn test_validated_generation_rejects_bad_input() {
        let inverted = Schedule {
            wake_hour: 22.0,
            sleep_hour: 6.0,
        };
        assert!(generate_validated(&inverted, &[]).is_err());
        assert!(generate_validated(&Schedule::default(), &[run_at(f64::NAN)]).is_err());
        assert!(generate_validated(&Schedule::default(), &[run_at(7.0)]).is_ok());
    }

    #[test]
    fn test_mock_timeline_to_chart() {
        let timeline = MockSource.daily_timeline().unwrap();
        let chart = ChartShaper::default().shape_timeline(&timeline);

        assert_eq!(chart.baseline_ticks.len(), 8);
        assert_eq!(chart.baseline_ticks[4].label, "12pm");
        assert_eq!(chart.session_points.len(), timeline.measured_session.lri_values.len());
        assert_eq!(chart.peak_markers.len(), 3);
        assert!(chart.peak_markers.iter().all(|m| m.x_px > 0.0 && m.x_px < 330.0));
        assert_eq!(chart.event_markers[1].time_label, "7:15");

        let ctx = MockSource.session_context().unwrap();
        assert_eq!(ctx.context.circadian_phase, PhaseLabel::MorningPeak);
        assert_eq!(ctx.performance.peak_moments, 3);
    }

    #[test]
    fn test_mock_session_peak_moments() {
        let timeline = MockSource.daily_timeline().unwrap();
        let samples = &timeline.measured_session.lri_values;

        // Samples exactly at 70 do not count
        assert_eq!(count_peak_moments(samples, PEAK_LRI_THRESHOLD), 10);
        assert_eq!(count_peak_moments(samples, 80.0), 2);
        assert_eq!(count_peak_moments(samples, 100.0), 0);
    }

    #[test]
    fn test_recomputed_timeline_matches_served_baseline() {
        let timeline = MockSource.daily_timeline().unwrap();
        let schedule = timeline.schedule_or(Schedule::default());
        let workouts = timeline.workout_events();

        let recomputed = timeline.clone().with_computed_baseline(schedule, &workouts);
        assert_eq!(recomputed.circadian_baseline, timeline.circadian_baseline);
    }

    #[test]
    fn test_export_then_read_back_through_file_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("day.json");

        let timeline = MockSource.daily_timeline().unwrap();
        export::json::export_json(&serde_json::json!({ "daily_timeline": timeline }), &path)
            .unwrap();

        let settings = DataSettings {
            fallback_to_mock: false,
            source: DataSource::File { path: path.clone() },
        };
        let source = source_from_settings(&settings);
        let loaded = source.daily_timeline().unwrap();
        assert_eq!(loaded.date, timeline.date);
        assert_eq!(loaded.circadian_baseline.len(), SAMPLES_PER_DAY);

        // The bundle has no session context and there is no fallback
        assert!(source.session_context().is_err());
    }

    #[test]
    fn test_missing_file_falls_back_when_configured() {
        let dir = tempdir().unwrap();
        let settings = DataSettings {
            fallback_to_mock: true,
            source: DataSource::File {
                path: dir.path().join("missing.json"),
            },
        };
        let source = source_from_settings(&settings);
        assert_eq!(
            source.daily_timeline().unwrap(),
            MockSource.daily_timeline().unwrap()
        );

        let strict = DataSettings {
            fallback_to_mock: false,
            ..settings
        };
        assert!(source_from_settings(&strict).daily_timeline().is_err());
    }

    #[test]
    fn test_config_drives_chart_and_csv_export() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.set_value("chart.stride", "4").unwrap();
        config.save_to_file(&config_path).unwrap();
        let config = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(
            config.chart,
            ChartConfig {
                stride: 4,
                ..ChartConfig::default()
            }
        );

        let timeline = MockSource.daily_timeline().unwrap();
        let chart = ChartShaper::new(config.chart.clone()).shape_timeline(&timeline);
        assert_eq!(chart.baseline_ticks.len(), 24);
        assert_eq!(chart.baseline_ticks[1].label, "1am");

        let csv_path = dir.path().join("day.csv");
        let format = ExportFormat::from_path(&csv_path).unwrap();
        export::export_timeline(&timeline, &chart, &config.chart, format, &csv_path).unwrap();

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), SAMPLES_PER_DAY);
        assert_eq!(&rows[30][2], "7:30 AM");
        assert_eq!(
            rows[30][3].parse::<f64>().unwrap(),
            timeline.circadian_baseline[30]
        );
        assert_eq!(BaselineSeries::hour_at(30), 7.5);
    }
}
