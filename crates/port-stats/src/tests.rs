//! Unit and integration tests for port-stats.

use port_core::{
    FixedInterval, Intensity, PortConfig, PortObserver, ResourceState, SimTime, TankerId,
    TankerStage,
};
use port_sim::SchedulerBuilder;

use crate::{SimulationReport, StatisticsCollector};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOUR: f64 = 3_600.0;
const TOL: f64 = 1e-6;

/// One tow, one line; arrivals every 2h, 1h tow legs, 3h service, 10h run.
fn scenario_a(require_positive_duration: bool) -> SimulationReport {
    let cfg = PortConfig {
        simulation_time:       10.0 * HOUR,
        processing_line_count: 1,
        tow_count:             1,
        ..PortConfig::default()
    };
    let mut s = SchedulerBuilder::new(cfg)
        .build_with_sources(FixedInterval(2.0 * HOUR), FixedInterval(HOUR), FixedInterval(3.0 * HOUR))
        .unwrap();
    let mut stats = StatisticsCollector::new().require_positive_duration(require_positive_duration);
    s.run(&mut stats).unwrap();
    assert_eq!(stats.ended_at(), Some(s.now()));
    stats.finalize(s.now()).unwrap()
}

/// `(start, duration, load)` triples in hours.
fn load_steps(curve: &[crate::BusynessState]) -> Vec<(f64, f64, f64)> {
    curve
        .iter()
        .map(|b| (b.start_time.0 / HOUR, b.duration / HOUR, b.load_percent))
        .collect()
}

// ── TankerLifecycle ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;
    use crate::TankerLifecycle;

    #[test]
    fn stuck_path_durations() {
        let mut l = TankerLifecycle::new(TankerId(1), SimTime(10.0));
        l.record(TankerStage::InQueue, SimTime(10.0));
        l.record(TankerStage::ProcessedByTow, SimTime(12.0));
        l.record(TankerStage::ProcessedByLine, SimTime(13.0));
        l.record(TankerStage::StuckInProcessingLine, SimTime(20.0));
        l.record(TankerStage::DispatchedByTow, SimTime(24.0));
        l.record(TankerStage::LeftSystem, SimTime(25.0));

        assert!(l.has_been_processed);
        assert_eq!(l.time_in_queue, 2.0);
        assert_eq!(l.tow_process_time, 2.0);
        assert_eq!(l.time_on_process_line, 7.0);
        assert_eq!(l.time_while_stuck_in_processing_line, 4.0);
        assert_eq!(l.time_in_system, 15.0);
        assert_eq!(l.stuck_in_processing_line_at, Some(SimTime(20.0)));
        assert_eq!(l.left_system_at, Some(SimTime(25.0)));
    }

    #[test]
    fn fractional_times_sum_exactly() {
        let mut l = TankerLifecycle::new(TankerId(2), SimTime(0.1));
        l.record(TankerStage::ProcessedByTow, SimTime(0.3));
        l.record(TankerStage::ProcessedByLine, SimTime(0.7));
        l.record(TankerStage::StuckInProcessingLine, SimTime(1.9));
        l.record(TankerStage::DispatchedByTow, SimTime(2.2));
        l.record(TankerStage::LeftSystem, SimTime(56398.345788595354));
        assert_eq!(l.time_in_system, l.stage_total());
        assert_eq!(
            l.time_in_queue
                + l.tow_process_time
                + l.time_on_process_line
                + l.time_while_stuck_in_processing_line,
            l.time_in_system
        );
    }

    #[test]
    fn censored_in_queue() {
        let mut l = TankerLifecycle::new(TankerId(4), SimTime(30.0));
        l.censor(SimTime(100.0));
        assert!(!l.has_been_processed);
        assert_eq!(l.time_in_queue, 70.0);
        assert_eq!(l.time_in_system, 70.0);
        assert_eq!(l.processed_by_tow_at, None);
    }

    #[test]
    fn censor_ignores_processed() {
        let mut l = TankerLifecycle::new(TankerId(1), SimTime(0.0));
        l.record(TankerStage::ProcessedByTow, SimTime(1.0));
        l.record(TankerStage::ProcessedByLine, SimTime(2.0));
        l.record(TankerStage::DispatchedByTow, SimTime(3.0));
        l.record(TankerStage::LeftSystem, SimTime(4.0));
        l.censor(SimTime(50.0));
        assert_eq!(l.time_in_system, 4.0);
        assert_eq!(l.time_on_process_line, 1.0);
    }
}

// ── ServingEntityStatistics ───────────────────────────────────────────────────

#[cfg(test)]
mod serving_tests {
    use port_core::EntityKind;

    use super::*;
    use crate::ServingEntityStatistics;

    #[test]
    fn intervals_close_on_next_record_and_at_horizon() {
        let mut s = ServingEntityStatistics::new(EntityKind::Tow, 1);
        s.record(ResourceState::Idle, SimTime(0.0));
        s.record(ResourceState::Working, SimTime(4.0));
        s.record(ResourceState::Idle, SimTime(10.0));
        s.finalize(SimTime(20.0));

        let durations: Vec<f64> = s.intervals.iter().map(|i| i.duration).collect();
        assert_eq!(durations, vec![4.0, 6.0, 10.0]);
        assert_eq!(s.idle_time, 14.0);
        assert_eq!(s.working_time, 6.0);
        assert_eq!(s.working_share(SimTime(20.0)), 0.3);
        assert_eq!(s.idle_share(SimTime(20.0)), 0.7);
        assert_eq!(s.intervals[1].end(), SimTime(10.0));
    }

    #[test]
    fn zero_horizon_share_is_zero() {
        let s = ServingEntityStatistics::new(EntityKind::ProcessingLine, 2);
        assert_eq!(s.working_share(SimTime::ZERO), 0.0);
    }
}

// ── Busyness aggregation ──────────────────────────────────────────────────────

#[cfg(test)]
mod busyness_tests {
    use super::*;
    use crate::{BusynessSample, aggregate_busyness, queue_length_curve};

    fn sample(entity: u32, state: ResourceState, time: f64, duration: f64) -> BusynessSample {
        BusynessSample { entity, state, time: SimTime(time), duration }
    }

    #[test]
    fn two_entities_half_load() {
        use ResourceState::*;
        let samples = vec![
            sample(1, Idle, 0.0, 5.0),
            sample(2, Idle, 0.0, 10.0),
            sample(1, Working, 5.0, 5.0),
            sample(1, Idle, 10.0, 10.0),
            sample(2, Working, 10.0, 10.0),
        ];
        let curve = aggregate_busyness(&samples, SimTime(20.0), true);
        let steps: Vec<(f64, f64, f64)> =
            curve.iter().map(|b| (b.start_time.0, b.duration, b.load_percent)).collect();
        assert_eq!(steps, vec![(0.0, 5.0, 50.0), (5.0, 5.0, 50.0), (10.0, 10.0, 50.0)]);
    }

    #[test]
    fn step_carries_load_after_its_closing_batch() {
        use ResourceState::*;
        let samples = vec![
            sample(1, Idle, 0.0, 10.0),
            sample(1, Working, 10.0, 5.0),
            sample(1, Idle, 15.0, 5.0),
        ];
        let curve = aggregate_busyness(&samples, SimTime(20.0), true);
        let steps: Vec<(f64, f64, f64)> =
            curve.iter().map(|b| (b.start_time.0, b.duration, b.load_percent)).collect();
        assert_eq!(steps, vec![(0.0, 10.0, 100.0), (10.0, 5.0, 0.0), (15.0, 5.0, 0.0)]);
    }

    #[test]
    fn policy_decides_same_instant_release_and_reacquire() {
        use ResourceState::*;
        let samples = vec![
            sample(1, Idle, 0.0, 2.0),
            sample(1, Working, 2.0, 3.0),
            sample(1, Idle, 5.0, 0.0),
            sample(1, Working, 5.0, 5.0),
        ];
        let strict = aggregate_busyness(&samples, SimTime(10.0), true);
        let loose = aggregate_busyness(&samples, SimTime(10.0), false);
        assert_eq!(strict.last().unwrap().load_percent, 100.0);
        assert_eq!(loose.last().unwrap().load_percent, 0.0);
    }

    #[test]
    fn no_samples_covers_horizon_at_zero_load() {
        let curve = aggregate_busyness(&[], SimTime(50.0), true);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].start_time, SimTime::ZERO);
        assert_eq!(curve[0].duration, 50.0);
        assert_eq!(curve[0].load_percent, 0.0);
    }

    #[test]
    fn samples_at_horizon_are_ignored() {
        let samples = vec![sample(1, ResourceState::Working, 10.0, 0.0)];
        let curve = aggregate_busyness(&samples, SimTime(10.0), false);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].load_percent, 0.0);
    }

    #[test]
    fn queue_length_nets_same_instant_deltas() {
        let deltas = vec![
            (SimTime(1.0), 1),
            (SimTime(1.0), -1),
            (SimTime(2.0), 1),
            (SimTime(3.0), 1),
            (SimTime(4.0), -1),
        ];
        let curve = queue_length_curve(&deltas, SimTime(6.0));
        let steps: Vec<(f64, usize)> = curve.iter().map(|q| (q.start_time.0, q.length)).collect();
        assert_eq!(steps, vec![(0.0, 0), (1.0, 0), (2.0, 1), (3.0, 2), (4.0, 1)]);
        assert_eq!(curve.last().unwrap().duration, 2.0);
    }
}

// ── Histogram builder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod histogram_tests {
    use crate::{StatsError, build_histogram, observed_histogram};

    #[test]
    fn heights_sum_to_sample_count() {
        let values = [0.0, 1.0, 2.5, 9.9, 10.0, 4.4, 4.4];
        let h = build_histogram(&values, 0.0, 10.0, 10).unwrap();
        assert_eq!(h.items.len(), 10);
        assert_eq!(h.total(), values.len() as u32);
        assert_eq!(h.items[9].height, 2);
        assert_eq!(h.items[4].height, 2);
    }

    #[test]
    fn buckets_are_equal_width_and_cover_range() {
        let h = build_histogram(&[], 2.0, 12.0, 5).unwrap();
        assert_eq!(h.items.first().unwrap().start, 2.0);
        assert_eq!(h.items.last().unwrap().end, 12.0);
        for item in &h.items {
            assert!((item.end - item.start - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn edge_value_goes_to_first_matching_bucket() {
        let h = build_histogram(&[10.0], 0.0, 20.0, 2).unwrap();
        assert_eq!(h.items[0].height, 1);
        assert_eq!(h.items[1].height, 0);
    }

    #[test]
    fn value_outside_range_is_fatal() {
        let err = build_histogram(&[10.5], 0.0, 10.0, 10).unwrap_err();
        assert!(matches!(err, StatsError::HistogramOutOfRange { value, .. } if value == 10.5));
        assert!(build_histogram(&[-0.01], 0.0, 10.0, 10).is_err());
    }

    #[test]
    fn zero_buckets_rejected() {
        assert!(matches!(
            build_histogram(&[1.0], 0.0, 1.0, 0),
            Err(StatsError::InvalidBucketCount)
        ));
        assert!(matches!(
            build_histogram(&[1.0], 2.0, 1.0, 3),
            Err(StatsError::InvalidRange { .. })
        ));
    }

    #[test]
    fn observed_range_starts_at_zero() {
        let h = observed_histogram(&[3.0, 6.0], 10).unwrap();
        assert_eq!((h.start, h.end), (0.0, 6.0));
        assert_eq!(h.total(), 2);

        let empty = observed_histogram(&[], 10).unwrap();
        assert_eq!((empty.start, empty.end), (0.0, 0.0));
        assert_eq!(empty.total(), 0);
    }
}

// ── Collector over a full run ─────────────────────────────────────────────────

#[cfg(test)]
mod collector_tests {
    use super::*;

    #[test]
    fn scenario_counts_and_averages() {
        let r = scenario_a(true);
        assert_eq!(r.horizon, SimTime(10.0 * HOUR));
        assert_eq!((r.arrived, r.processed, r.unprocessed), (4, 1, 3));
        assert_eq!(r.tankers.len(), 4);

        assert_eq!(r.averages.time_in_queue, 0.0);
        assert_eq!(r.averages.tow_process_time, 2.0 * HOUR);
        assert_eq!(r.averages.time_on_process_line, 3.0 * HOUR);
        assert_eq!(r.averages.time_while_stuck_in_processing_line, 0.0);
        assert_eq!(r.averages.time_in_system, 5.0 * HOUR);
    }

    #[test]
    fn scenario_censors_unfinished_tankers() {
        let r = scenario_a(true);
        let t2 = &r.tankers[1];
        assert_eq!(t2.id, TankerId(2));
        assert!(!t2.has_been_processed);
        assert_eq!(t2.time_in_queue, 3.0 * HOUR);
        assert_eq!(t2.tow_process_time, HOUR);
        assert_eq!(t2.time_on_process_line, 2.0 * HOUR);
        assert_eq!(t2.time_in_system, 6.0 * HOUR);

        let t3 = &r.tankers[2];
        assert_eq!(t3.stage(), TankerStage::InQueue);
        assert_eq!(t3.time_in_queue, 4.0 * HOUR);
        assert_eq!(t3.time_in_system, 4.0 * HOUR);
    }

    #[test]
    fn scenario_resource_totals() {
        let r = scenario_a(true);
        assert_eq!(r.tows.len(), 1);
        assert_eq!(r.tows[0].working_time, 3.0 * HOUR);
        assert_eq!(r.tows[0].idle_time, 7.0 * HOUR);
        assert_eq!(r.lines[0].working_time, 8.0 * HOUR);
        assert_eq!(r.lines[0].idle_time, 2.0 * HOUR);
    }

    #[test]
    fn scenario_load_curves() {
        let strict = scenario_a(true);
        assert_eq!(
            load_steps(&strict.tow_load),
            vec![
                (0.0, 2.0, 100.0),
                (2.0, 1.0, 0.0),
                (3.0, 3.0, 100.0),
                (6.0, 1.0, 100.0),
                (7.0, 1.0, 0.0),
                (8.0, 2.0, 0.0),
            ]
        );
        assert_eq!(
            load_steps(&strict.line_load),
            vec![(0.0, 2.0, 100.0), (2.0, 5.0, 100.0), (7.0, 3.0, 100.0)]
        );

        // Without the duration filter the release at 7h wins over the
        // re-acquisition at the same instant.
        let loose = scenario_a(false);
        assert_eq!(load_steps(&loose.tow_load)[3], (6.0, 1.0, 0.0));
        assert_eq!(load_steps(&loose.line_load)[1], (2.0, 5.0, 0.0));
        assert_eq!(load_steps(&loose.line_load)[2], (7.0, 3.0, 0.0));
    }

    #[test]
    fn mean_load_is_time_weighted() {
        let r = scenario_a(true);
        assert_eq!(SimulationReport::mean_load(&r.tow_load), 60.0);
        assert_eq!(SimulationReport::mean_load(&[]), 0.0);
    }

    #[test]
    fn scenario_queue_length() {
        let r = scenario_a(true);
        let steps: Vec<(f64, usize)> =
            r.queue_length.iter().map(|q| (q.start_time.0 / HOUR, q.length)).collect();
        assert_eq!(steps, vec![(0.0, 0), (2.0, 0), (4.0, 1), (6.0, 2), (7.0, 1), (8.0, 2)]);
    }

    #[test]
    fn scenario_histograms_use_processed_only() {
        let r = scenario_a(true);
        assert_eq!(r.time_in_queue_histogram.total(), 1);
        assert_eq!(r.time_on_process_line_histogram.end, 3.0 * HOUR);
        assert_eq!(r.time_on_process_line_histogram.items[9].height, 1);
        assert_eq!(r.time_stuck_in_processing_line_histogram.total(), 1);
    }

    #[test]
    fn no_processed_tankers_averages_zero() {
        let mut stats = StatisticsCollector::new();
        stats.notify(&port_core::Notification::Tanker {
            tanker: TankerId(1),
            time:   SimTime(5.0),
            stage:  TankerStage::InQueue,
        });
        let r = stats.finalize(SimTime(10.0)).unwrap();
        assert_eq!(r.averages, crate::TankerAverages::default());
        assert_eq!(r.unprocessed, 1);
        assert_eq!(r.tankers[0].time_in_queue, 5.0);
        assert_eq!(r.time_in_queue_histogram.total(), 0);
    }
}

// ── Properties under random draws ─────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use super::*;

    fn random_report(seed: u64) -> SimulationReport {
        let cfg = PortConfig {
            simulation_time:           14.0 * 24.0 * HOUR,
            processing_line_count:     2,
            tow_count:                 1,
            tanker_intensity:          Intensity::hours(2.0, 10.0),
            tow_intensity:             Intensity::hours(0.5, 3.0),
            processing_line_intensity: Intensity::hours(8.0, 16.0),
            seed,
            ..PortConfig::default()
        };
        let mut s = SchedulerBuilder::new(cfg).build().unwrap();
        let mut stats = StatisticsCollector::new();
        s.run(&mut stats).unwrap();
        stats.finalize(s.now()).unwrap()
    }

    fn assert_covers(starts_durations: &[(f64, f64)], horizon: f64) {
        assert_eq!(starts_durations[0].0, 0.0);
        for pair in starts_durations.windows(2) {
            assert!(pair[1].0 > pair[0].0);
            assert!((pair[0].0 + pair[0].1 - pair[1].0).abs() < TOL);
        }
        let (start, duration) = *starts_durations.last().unwrap();
        assert!((start + duration - horizon).abs() < TOL);
    }

    #[test]
    fn stage_durations_add_up() {
        for seed in 0..8 {
            let r = random_report(seed);
            assert!(r.processed > 0);
            for t in &r.tankers {
                let parts = t.time_in_queue
                    + t.tow_process_time
                    + t.time_on_process_line
                    + t.time_while_stuck_in_processing_line;
                assert_eq!(parts, t.time_in_system, "tanker {}", t.id);
            }
        }
    }

    #[test]
    fn load_curves_bounded_and_cover_horizon() {
        for seed in 0..8 {
            let r = random_report(seed);
            let h = r.horizon.0;
            for curve in [&r.tow_load, &r.line_load] {
                assert!(curve.iter().all(|b| (0.0..=100.0).contains(&b.load_percent)));
                let sd: Vec<(f64, f64)> = curve.iter().map(|b| (b.start_time.0, b.duration)).collect();
                assert_covers(&sd, h);
            }
            let sd: Vec<(f64, f64)> =
                r.queue_length.iter().map(|q| (q.start_time.0, q.duration)).collect();
            assert_covers(&sd, h);
        }
    }

    #[test]
    fn histogram_mass_and_resource_time() {
        for seed in 0..8 {
            let r = random_report(seed);
            for h in [
                &r.time_in_queue_histogram,
                &r.time_on_process_line_histogram,
                &r.time_stuck_in_processing_line_histogram,
            ] {
                assert_eq!(h.total() as usize, r.processed);
            }
            for s in r.tows.iter().chain(&r.lines) {
                assert!((s.idle_time + s.working_time - r.horizon.0).abs() < TOL);
            }
            assert_eq!(r.arrived, r.tankers.len());
            assert_eq!(r.arrived, r.processed + r.unprocessed);
        }
    }
}
