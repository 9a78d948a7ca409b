use super::FlightComputer;
use super::command::{Command, CommandError};
use super::common::vec2d::Vec2D;
use super::event::{FlightEvent, FlightEventKind};
use super::flight_state::{ControlMode, FlightState};
use super::safety::{DerivedTelemetry, SafetyLevel, eta};
use super::telemetry::TelemetrySnapshot;
use crate::config::SimConfig;
use chrono::TimeDelta;
use tokio::sync::mpsc;

const EPS: f64 = 1e-9;

/// Deterministic config: fixed seed, no descent jitter, instant takeoff.
fn test_config() -> SimConfig {
    SimConfig {
        jitter_amplitude: 0.0,
        takeoff_delay: TimeDelta::zero(),
        rng_seed: Some(7),
        ..SimConfig::default()
    }
}

fn computer(config: SimConfig) -> (FlightComputer, mpsc::Receiver<FlightEvent>) {
    let (tx, rx) = mpsc::channel(64);
    (FlightComputer::new(config, tx), rx)
}

fn assert_unchanged(before: &TelemetrySnapshot, after: &TelemetrySnapshot) {
    assert_eq!(before.state, after.state);
    assert_eq!(before.control, after.control);
    assert_eq!(before.position, after.position);
    assert!((before.altitude - after.altitude).abs() < EPS);
    assert!((before.speed - after.speed).abs() < EPS);
    assert!((before.battery - after.battery).abs() < EPS);
    assert_eq!(before.target.is_some(), after.target.is_some());
}

fn drain_kinds(rx: &mut mpsc::Receiver<FlightEvent>) -> Vec<FlightEventKind> {
    let mut kinds = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        kinds.push(ev.kind);
    }
    kinds
}

#[test]
fn initial_state_matches_defaults() {
    let (f_cont, _rx) = computer(test_config());
    let snap = f_cont.telemetry();
    assert_eq!(snap.state, FlightState::Flying);
    assert_eq!(snap.control, ControlMode::Auto);
    assert_eq!(snap.position, Vec2D::new(400.0, 300.0));
    assert!((snap.altitude - 120.0).abs() < EPS);
    assert!((snap.speed - 5.2).abs() < EPS);
    assert!((snap.battery - 85.0).abs() < EPS);
    assert!(snap.target.is_none());
    assert!(snap.distance.is_none());
    assert!(snap.eta.is_none());
}

#[test]
fn select_target_rejects_out_of_bounds() {
    let (mut f_cont, _rx) = computer(test_config());
    let before = f_cont.telemetry();
    let res = f_cont.handle_command(Command::SelectTarget { x: 900.0, y: 50.0 });
    assert_eq!(res, Err(CommandError::OutOfBoundsTarget { x: 900.0, y: 50.0 }));
    assert!(f_cont.target().is_none());
    assert_unchanged(&before, &f_cont.telemetry());
}

#[test]
fn select_target_requires_flying_auto() {
    let (mut f_cont, _rx) = computer(test_config());
    f_cont.toggle_manual();
    assert!(matches!(
        f_cont.select_target(Vec2D::new(500.0, 200.0)),
        Err(CommandError::InvalidStateTransition { .. })
    ));
    f_cont.toggle_manual();

    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    assert!(matches!(
        f_cont.select_target(Vec2D::new(100.0, 100.0)),
        Err(CommandError::InvalidStateTransition { .. })
    ));

    f_cont.cancel_landing().unwrap();
    f_cont.takeoff().unwrap();
    assert_eq!(f_cont.state(), FlightState::TakingOff);
    assert!(matches!(
        f_cont.select_target(Vec2D::new(100.0, 100.0)),
        Err(CommandError::InvalidStateTransition { .. })
    ));
}

#[test]
fn landing_requires_target() {
    let (mut f_cont, _rx) = computer(test_config());
    let before = f_cont.telemetry();
    assert!(matches!(
        f_cont.start_landing(),
        Err(CommandError::InvalidStateTransition { .. })
    ));
    assert_unchanged(&before, &f_cont.telemetry());
}

#[test]
fn landing_rejected_while_already_landing() {
    let (mut f_cont, _rx) = computer(test_config());
    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    assert!(matches!(
        f_cont.start_landing(),
        Err(CommandError::InvalidStateTransition { .. })
    ));
}

#[test]
fn takeoff_rejected_while_landing() {
    let (mut f_cont, _rx) = computer(test_config());
    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    assert!(matches!(f_cont.takeoff(), Err(CommandError::InvalidStateTransition { .. })));
    assert_eq!(f_cont.state(), FlightState::Landing);
}

#[test]
fn cancel_rejected_outside_landing() {
    let (mut f_cont, _rx) = computer(test_config());
    assert!(matches!(
        f_cont.cancel_landing(),
        Err(CommandError::InvalidStateTransition { .. })
    ));
}

#[test]
fn descent_reaches_target_and_lands() {
    let config = test_config();
    let steps = config.descent_steps;
    let (mut f_cont, mut rx) = computer(config);
    let target = Vec2D::new(500.0, 200.0);
    f_cont.select_target(target).unwrap();
    f_cont.start_landing().unwrap();

    let mut last_altitude = f_cont.telemetry().altitude;
    for i in 1..steps {
        f_cont.drift_tick();
        let descent = f_cont.descent().expect("descent in progress");
        assert_eq!(descent.step(), i);
        let altitude = f_cont.telemetry().altitude;
        assert!(altitude < last_altitude);
        last_altitude = altitude;
    }
    assert_eq!(f_cont.state(), FlightState::Landing);

    f_cont.drift_tick();
    let snap = f_cont.telemetry();
    assert_eq!(snap.state, FlightState::Landed);
    assert!(snap.altitude.abs() < EPS);
    assert!(snap.speed.abs() < EPS);
    assert!(snap.position.euclid_distance(&target) < EPS);
    assert!(f_cont.target().is_none());
    assert!(f_cont.descent().is_none());

    let kinds = drain_kinds(&mut rx);
    assert_eq!(kinds, vec![FlightEventKind::LandingStarted, FlightEventKind::LandingCompleted]);
}

#[test]
fn cancel_retains_target_and_allows_reland() {
    let (mut f_cont, mut rx) = computer(test_config());
    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    for _ in 0..10 {
        f_cont.drift_tick();
    }
    f_cont.cancel_landing().unwrap();
    assert_eq!(f_cont.state(), FlightState::Flying);
    assert!(f_cont.descent().is_none());
    assert!(f_cont.target().is_some());

    // Takeoff is re-enabled and so is an immediate re-land.
    f_cont.start_landing().unwrap();
    assert_eq!(f_cont.descent().unwrap().step(), 0);

    let kinds = drain_kinds(&mut rx);
    assert_eq!(
        kinds,
        vec![
            FlightEventKind::LandingStarted,
            FlightEventKind::LandingCancelled,
            FlightEventKind::LandingStarted
        ]
    );
}

#[test]
fn drift_after_cancel_recovers_cruise_bands_in_one_step() {
    let config = test_config();
    let (alt_lo, alt_hi) = config.altitude_band;
    let (spd_lo, spd_hi) = config.speed_band;
    let (mut f_cont, _rx) = computer(config);
    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    for _ in 0..50 {
        f_cont.drift_tick();
    }
    f_cont.cancel_landing().unwrap();
    assert!(f_cont.telemetry().altitude < alt_lo);
    assert!(f_cont.telemetry().speed < spd_lo);

    // No gradual climb-out is modeled: the first idle drift tick clamps
    // altitude and speed straight back into the cruise bands.
    f_cont.drift_tick();
    let snap = f_cont.telemetry();
    assert!(snap.altitude >= alt_lo && snap.altitude <= alt_hi);
    assert!(snap.speed >= spd_lo && snap.speed <= spd_hi);
}

#[test]
fn safety_level_thresholds() {
    assert_eq!(SafetyLevel::from_altitude(0.0), SafetyLevel::High);
    assert_eq!(SafetyLevel::from_altitude(19.99), SafetyLevel::High);
    assert_eq!(SafetyLevel::from_altitude(20.0), SafetyLevel::Medium);
    assert_eq!(SafetyLevel::from_altitude(49.99), SafetyLevel::Medium);
    assert_eq!(SafetyLevel::from_altitude(50.0), SafetyLevel::Low);
    assert_eq!(SafetyLevel::from_altitude(120.0), SafetyLevel::Low);
}

#[test]
fn eta_guards_divide_by_zero() {
    assert_eq!(eta(100.0, 10.0), Some(10.0));
    assert_eq!(eta(100.0, 0.0), None);

    let derived = DerivedTelemetry::compute(Vec2D::zero(), None, 120.0, 0.0);
    assert!(derived.eta.is_none());
}

#[test]
fn snapshot_renders_sentinels() {
    let (f_cont, _rx) = computer(test_config());
    let rendered = f_cont.telemetry().to_string();
    assert!(rendered.contains("dist -- eta --s"));
}

#[test]
fn idle_drift_stays_within_bounds() {
    let config = SimConfig { rng_seed: Some(42), ..SimConfig::default() };
    let viewport = config.viewport;
    let (alt_lo, alt_hi) = config.altitude_band;
    let (spd_lo, spd_hi) = config.speed_band;
    let (mut f_cont, _rx) = computer(config);
    for _ in 0..10_000 {
        f_cont.drift_tick();
        let snap = f_cont.telemetry();
        assert!(viewport.contains(snap.position));
        assert!(snap.altitude >= alt_lo && snap.altitude <= alt_hi);
        assert!(snap.speed >= spd_lo && snap.speed <= spd_hi);
    }
}

#[test]
fn manual_mode_freezes_drift() {
    let (mut f_cont, _rx) = computer(test_config());
    f_cont.toggle_manual();
    assert_eq!(f_cont.control(), ControlMode::Manual);
    let before = f_cont.telemetry();
    for _ in 0..100 {
        f_cont.drift_tick();
    }
    assert_unchanged(&before, &f_cont.telemetry());
}

#[test]
fn manual_mode_does_not_stop_running_descent() {
    let (mut f_cont, _rx) = computer(test_config());
    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    f_cont.toggle_manual();
    f_cont.drift_tick();
    assert_eq!(f_cont.descent().unwrap().step(), 1);
    assert_eq!(f_cont.state(), FlightState::Landing);
}

#[test]
fn battery_is_monotonically_non_increasing() {
    let (mut f_cont, _rx) = computer(test_config());
    let mut last = f_cont.telemetry().battery;
    for i in 0..1_000 {
        f_cont.drift_tick();
        if i % 5 == 0 {
            f_cont.battery_tick();
        }
        let battery = f_cont.telemetry().battery;
        assert!(battery <= last);
        last = battery;
    }
}

#[test]
fn battery_clamps_at_zero_and_rests_when_landed() {
    let config = SimConfig { initial_battery: 0.025, ..test_config() };
    let (mut f_cont, _rx) = computer(config);
    for _ in 0..5 {
        f_cont.battery_tick();
    }
    assert!(f_cont.telemetry().battery.abs() < EPS);

    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    for _ in 0..100 {
        f_cont.drift_tick();
    }
    assert_eq!(f_cont.state(), FlightState::Landed);
    f_cont.battery_tick();
    assert!(f_cont.telemetry().battery.abs() < EPS);
}

#[test]
fn takeoff_completes_and_resets_cruise_values() {
    let (mut f_cont, mut rx) = computer(test_config());
    f_cont.takeoff().unwrap();
    assert_eq!(f_cont.state(), FlightState::TakingOff);

    // Deadline is zero in the test config, so the next tick completes it.
    f_cont.drift_tick();
    let snap = f_cont.telemetry();
    assert_eq!(snap.state, FlightState::Flying);
    assert_eq!(snap.position, Vec2D::new(400.0, 300.0));
    assert!((snap.altitude - 120.0).abs() < EPS);
    assert!((snap.speed - 5.2).abs() < EPS);
    assert_eq!(drain_kinds(&mut rx), vec![FlightEventKind::TakeoffCompleted]);
}

#[test]
fn retakeoff_allowed_after_landing() {
    let (mut f_cont, _rx) = computer(test_config());
    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    for _ in 0..100 {
        f_cont.drift_tick();
    }
    assert_eq!(f_cont.state(), FlightState::Landed);

    f_cont.takeoff().unwrap();
    assert_eq!(f_cont.state(), FlightState::TakingOff);
    f_cont.drift_tick();
    assert_eq!(f_cont.state(), FlightState::Flying);
}

#[test]
fn toggle_manual_is_legal_in_any_state() {
    let (mut f_cont, _rx) = computer(test_config());
    f_cont.handle_command(Command::ToggleManual).unwrap();
    assert_eq!(f_cont.control(), ControlMode::Manual);
    f_cont.handle_command(Command::ToggleManual).unwrap();

    f_cont.select_target(Vec2D::new(500.0, 200.0)).unwrap();
    f_cont.start_landing().unwrap();
    f_cont.handle_command(Command::ToggleManual).unwrap();
    assert_eq!(f_cont.control(), ControlMode::Manual);
    assert_eq!(f_cont.state(), FlightState::Landing);
}

#[test]
fn descent_refreshes_derived_fields_every_stride() {
    let (mut f_cont, _rx) = computer(test_config());
    let target = Vec2D::new(500.0, 200.0);
    f_cont.select_target(target).unwrap();
    let initial_distance = f_cont.telemetry().distance.unwrap();
    f_cont.start_landing().unwrap();

    // Steps 1..=9 leave the cached derived fields untouched.
    for _ in 0..9 {
        f_cont.drift_tick();
    }
    assert!((f_cont.telemetry().distance.unwrap() - initial_distance).abs() < EPS);

    // The 10th step refreshes them from the converged position.
    f_cont.drift_tick();
    assert!(f_cont.telemetry().distance.unwrap() < initial_distance);
}
