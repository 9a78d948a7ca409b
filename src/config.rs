use crate::flight_control::common::vec2d::Vec2D;
use crate::flight_control::common::viewport::Viewport;
use crate::warn;
use chrono::TimeDelta;
use std::{env, time::Duration};

/// Tunables for the simulated vehicle and its tick loops.
///
/// Defaults mirror the reference scenario: an 800x600 viewport, cruise at
/// 120 m altitude and 5.2 m/s, a 100-step descent, and a 3 s takeoff climb.
/// `SKYLARK_SEED` and `SKYLARK_TICK_MS` override the RNG seed and the fast
/// tick interval at startup.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub viewport: Viewport,
    pub cruise_altitude: f64,
    pub cruise_speed: f64,
    pub initial_battery: f64,
    /// Total interpolation steps of one descent, one step per fast tick.
    pub descent_steps: u32,
    /// Derived ETA/safety fields refresh every this many descent steps.
    pub derived_refresh_stride: u32,
    /// Per-axis position noise during descent, in viewport units.
    pub jitter_amplitude: f64,
    /// Per-axis position noise of the idle drift, in viewport units.
    pub drift_amplitude: f64,
    pub altitude_band: (f64, f64),
    pub speed_band: (f64, f64),
    pub tick_interval: Duration,
    pub battery_interval: Duration,
    pub battery_decay: f64,
    pub takeoff_delay: TimeDelta,
    /// Fixed seed for deterministic runs. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(Vec2D::new(0.0, 0.0), Vec2D::new(800.0, 600.0)),
            cruise_altitude: 120.0,
            cruise_speed: 5.2,
            initial_battery: 85.0,
            descent_steps: 100,
            derived_refresh_stride: 10,
            jitter_amplitude: 1.0,
            drift_amplitude: 0.5,
            altitude_band: (115.0, 125.0),
            speed_band: (4.5, 6.0),
            tick_interval: Duration::from_millis(100),
            battery_interval: Duration::from_secs(5),
            battery_decay: 0.01,
            takeoff_delay: TimeDelta::seconds(3),
            rng_seed: None,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(seed) = env::var("SKYLARK_SEED") {
            match seed.parse::<u64>() {
                Ok(s) => config.rng_seed = Some(s),
                Err(_) => warn!("Ignoring unparsable SKYLARK_SEED: {seed}"),
            }
        }
        if let Ok(tick) = env::var("SKYLARK_TICK_MS") {
            match tick.parse::<u64>() {
                Ok(ms) if ms > 0 => config.tick_interval = Duration::from_millis(ms),
                _ => warn!("Ignoring unparsable SKYLARK_TICK_MS: {tick}"),
            }
        }
        config
    }
}
