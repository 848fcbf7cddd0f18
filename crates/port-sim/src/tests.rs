//! Integration tests for port-sim.

use port_core::{
    FixedInterval, Intensity, NoopObserver, NotificationLog, PortConfig, SimTime, TankerId,
    TankerStage,
};

use crate::{Scheduler, SchedulerBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOUR: f64 = 3_600.0;

fn config(horizon: f64, lines: u32, tows: u32) -> PortConfig {
    PortConfig {
        simulation_time:       horizon,
        processing_line_count: lines,
        tow_count:             tows,
        ..PortConfig::default()
    }
}

/// Scheduler with constant arrival, tow-leg and line-service durations.
fn fixed(
    cfg: PortConfig,
    arrival: f64,
    tow_leg: f64,
    service: f64,
) -> Scheduler<FixedInterval> {
    SchedulerBuilder::new(cfg)
        .build_with_sources(FixedInterval(arrival), FixedInterval(tow_leg), FixedInterval(service))
        .unwrap()
}

fn stages(log: &NotificationLog, id: u32) -> Vec<(f64, TankerStage)> {
    log.stages_of(TankerId(id)).into_iter().map(|(t, s)| (t.0, s)).collect()
}

// ── SchedulerBuilder validation ───────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use port_core::PortError;

    use super::*;
    use crate::SimError;

    #[test]
    fn default_config_builds() {
        let s = SchedulerBuilder::new(PortConfig::default()).build().unwrap();
        assert_eq!(s.now(), SimTime::ZERO);
        assert_eq!(s.coalescing_tolerance(), 5.0);
    }

    #[test]
    fn reversed_intensity_rejected_before_run() {
        let cfg = PortConfig {
            tanker_intensity: Intensity::new(10.0, 1.0),
            ..PortConfig::default()
        };
        let err = SchedulerBuilder::new(cfg).build().err().unwrap();
        assert!(matches!(err, SimError::Core(PortError::InvalidIntensity { .. })));
    }

    #[test]
    fn negative_tolerance_rejected() {
        let result = SchedulerBuilder::new(PortConfig::default())
            .coalescing_tolerance(-1.0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn tolerance_override() {
        let s = SchedulerBuilder::new(PortConfig::default())
            .coalescing_tolerance(0.5)
            .build()
            .unwrap();
        assert_eq!(s.coalescing_tolerance(), 0.5);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// One tow, one line; arrivals every 2h, 1h tow legs, 3h service.
    #[test]
    fn single_tow_single_line_timeline() {
        let mut s = fixed(config(10.0 * HOUR, 1, 1), 2.0 * HOUR, HOUR, 3.0 * HOUR);
        let mut log = NotificationLog::new();
        s.run(&mut log).unwrap();

        assert_eq!(
            stages(&log, 1),
            vec![
                (2.0 * HOUR, TankerStage::InQueue),
                (2.0 * HOUR, TankerStage::ProcessedByTow),
                (3.0 * HOUR, TankerStage::ProcessedByLine),
                (6.0 * HOUR, TankerStage::DispatchedByTow),
                (7.0 * HOUR, TankerStage::LeftSystem),
            ]
        );
        // The second tanker waits for the line released at 7h.
        assert_eq!(
            stages(&log, 2)[..2],
            [(4.0 * HOUR, TankerStage::InQueue), (7.0 * HOUR, TankerStage::ProcessedByTow)]
        );
    }

    /// A tanker whose refill ends while the only tow is busy gets stuck, and
    /// is served before the waiting queue once the tow frees up.
    #[test]
    fn stuck_tanker_gets_tow_first() {
        let mut s = SchedulerBuilder::new(config(8.0, 2, 1))
            .coalescing_tolerance(0.0)
            .build_with_sources(FixedInterval(1.0), FixedInterval(2.0), FixedInterval(1.0))
            .unwrap();
        let mut log = NotificationLog::new();
        s.run(&mut log).unwrap();

        assert_eq!(
            stages(&log, 1),
            vec![
                (1.0, TankerStage::InQueue),
                (1.0, TankerStage::ProcessedByTow),
                (3.0, TankerStage::ProcessedByLine),
                (4.0, TankerStage::StuckInProcessingLine),
                (5.0, TankerStage::DispatchedByTow),
                (7.0, TankerStage::LeftSystem),
            ]
        );
        // Tanker 2 was paired at 3 with the second line, finishes at 6 and
        // waits for the tow released at 7.
        assert_eq!(
            stages(&log, 2),
            vec![
                (2.0, TankerStage::InQueue),
                (3.0, TankerStage::ProcessedByTow),
                (5.0, TankerStage::ProcessedByLine),
                (6.0, TankerStage::StuckInProcessingLine),
                (7.0, TankerStage::DispatchedByTow),
            ]
        );
        // Tanker 3 (arrived at 3) is still queued at the horizon.
        assert_eq!(s.tankers().stage(TankerId(3)), Some(TankerStage::InQueue));
    }

    #[test]
    fn events_within_tolerance_fire_together() {
        let mut s = fixed(config(19.0, 1, 1), 10.0, 3.0, 1.0);
        let mut log = NotificationLog::new();
        s.run(&mut log).unwrap();

        // The 20.0 arrival falls within 5 of the 17.0 releases and fires at 17.
        assert_eq!(log.ticks, vec![SimTime(10.0), SimTime(13.0), SimTime(14.0), SimTime(17.0)]);
        assert_eq!(stages(&log, 2)[0], (17.0, TankerStage::InQueue));
        assert_eq!(stages(&log, 2)[1], (17.0, TankerStage::ProcessedByTow));
    }
}

// ── Horizon & stepping ────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use port_core::{Notification, PortObserver};

    use super::*;

    #[derive(Default)]
    struct EndCounter {
        ends:    usize,
        horizon: Option<SimTime>,
        latest:  SimTime,
    }

    impl PortObserver for EndCounter {
        fn notify(&mut self, n: &Notification) {
            self.latest = self.latest.max(n.time());
        }

        fn on_sim_end(&mut self, horizon: SimTime) {
            self.ends += 1;
            self.horizon = Some(horizon);
        }
    }

    #[test]
    fn run_stops_at_horizon() {
        let mut s = fixed(config(100.0, 1, 1), 7.0, 2.0, 3.0);
        let mut obs = EndCounter::default();
        s.run(&mut obs).unwrap();
        assert_eq!(s.now(), SimTime(100.0));
        assert!(s.is_finished());
        assert_eq!(obs.ends, 1);
        assert_eq!(obs.horizon, Some(SimTime(100.0)));
        assert!(obs.latest < SimTime(100.0));
    }

    #[test]
    fn step_after_finish_is_noop() {
        let mut s = fixed(config(10.0, 1, 1), 4.0, 1.0, 1.0);
        s.run(&mut NoopObserver).unwrap();
        let mut obs = EndCounter::default();
        assert!(!s.step(&mut obs).unwrap());
        assert_eq!(obs.ends, 0);
    }

    #[test]
    fn event_at_horizon_does_not_fire() {
        let mut s = fixed(config(10.0, 1, 1), 10.0, 1.0, 1.0);
        let mut log = NotificationLog::new();
        s.run(&mut log).unwrap();
        assert!(log.ticks.is_empty());
        assert!(stages(&log, 1).is_empty());
        assert_eq!(s.tankers_created(), 1);
    }

    #[test]
    fn first_step_sets_up_resources() {
        let mut s = fixed(config(100.0, 3, 2), 10.0, 1.0, 1.0);
        assert!(s.step(&mut NoopObserver).unwrap());
        assert_eq!(s.lines().capacity(), 3);
        assert_eq!(s.tows().capacity(), 2);
        assert_eq!(s.now(), SimTime(10.0));
    }

    #[test]
    fn zero_tows_never_serves() {
        let mut s = fixed(config(100.0, 2, 0), 10.0, 1.0, 1.0);
        s.run(&mut NoopObserver).unwrap();
        assert_eq!(s.tankers().count(TankerStage::InQueue), 9);
    }
}

// ── Fatal errors ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod error_tests {
    use port_core::{Tanker, Tow, TowId};
    use port_pool::PoolError;

    use super::*;
    use crate::{PortEvent, SimError};

    #[test]
    fn stale_event_detected() {
        let mut s = fixed(config(100.0, 1, 1), 10.0, 1.0, 1.0);
        s.setup(&mut NoopObserver).unwrap();
        s.tow_events
            .push(PortEvent::Tow { at: SimTime(20.0), tow: Tow::new(TowId(9)) }, s.now())
            .unwrap();
        s.clock.advance_to(SimTime(25.0)).unwrap();
        let err = s.step(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::StaleEvent { queue: "tow", at, now }
            if at == SimTime(20.0) && now == SimTime(25.0)));
    }

    #[test]
    fn inconsistent_contention_detected() {
        let mut s = fixed(config(100.0, 1, 1), 10.0, 1.0, 1.0);
        s.setup(&mut NoopObserver).unwrap();
        s.tankers.enqueue(Tanker::new(TankerId(99)), s.now(), &mut NoopObserver).unwrap();
        let err = s.step(&mut NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            SimError::InconsistentContention { tanker: TankerId(99), idle_tows: 1, idle_lines: 1, .. }
        ));
    }

    #[test]
    fn foreign_tow_release_rejected() {
        let mut s = fixed(config(100.0, 1, 1), 10.0, 1.0, 1.0);
        s.setup(&mut NoopObserver).unwrap();
        assert!(s.tows().is_sealed() && s.lines().is_sealed());
        s.tow_events
            .push(PortEvent::Tow { at: SimTime(5.0), tow: Tow::new(TowId(9)) }, s.now())
            .unwrap();
        let err = s.step(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Pool(PoolError::UnknownId { id: 9, .. })));
        assert_eq!(s.tows().capacity(), 1);
    }

    #[test]
    fn past_scheduling_surfaces_as_pool_error() {
        let mut s = fixed(config(100.0, 1, 1), 10.0, 1.0, 1.0);
        s.clock.advance_to(SimTime(50.0)).unwrap();
        let err = s
            .tow_events
            .push(PortEvent::Tow { at: SimTime(40.0), tow: Tow::new(TowId(1)) }, s.now())
            .unwrap_err();
        let err: SimError = err.into();
        assert!(matches!(err, SimError::Pool(PoolError::PastScheduling { .. })));
    }
}

// ── Invariants under random draws ─────────────────────────────────────────────

#[cfg(test)]
mod property_tests {
    use super::*;

    fn busy_config(seed: u64) -> PortConfig {
        PortConfig {
            simulation_time:           30.0 * 24.0 * HOUR,
            processing_line_count:     3,
            tow_count:                 2,
            tanker_intensity:          Intensity::hours(1.0, 8.0),
            tow_intensity:             Intensity::hours(0.5, 2.0),
            processing_line_intensity: Intensity::hours(10.0, 20.0),
            coalescing_tolerance:      5.0,
            seed,
        }
    }

    #[test]
    fn pools_and_tracker_stay_consistent() {
        for seed in 0..10 {
            let cfg = busy_config(seed);
            let mut s = SchedulerBuilder::new(cfg.clone()).build().unwrap();
            let mut prev = SimTime(-1.0);
            while s.step(&mut NoopObserver).unwrap() {
                assert!(s.now() > prev, "clock must strictly increase between ticks");
                prev = s.now();
                assert_eq!(
                    s.tows().idle_count() + s.tows().working_count(),
                    cfg.tow_count as usize
                );
                assert_eq!(
                    s.lines().idle_count() + s.lines().working_count(),
                    cfg.processing_line_count as usize
                );
                assert!(s.tankers().is_consistent());
            }
        }
    }

    #[test]
    fn same_seed_same_trace() {
        let mut a = NotificationLog::new();
        let mut b = NotificationLog::new();
        SchedulerBuilder::new(busy_config(7)).build().unwrap().run(&mut a).unwrap();
        SchedulerBuilder::new(busy_config(7)).build().unwrap().run(&mut b).unwrap();
        assert!(!a.notifications.is_empty());
        assert_eq!(a.notifications, b.notifications);
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = NotificationLog::new();
        let mut b = NotificationLog::new();
        SchedulerBuilder::new(busy_config(1)).build().unwrap().run(&mut a).unwrap();
        SchedulerBuilder::new(busy_config(2)).build().unwrap().run(&mut b).unwrap();
        assert_ne!(a.notifications, b.notifications);
    }
}
