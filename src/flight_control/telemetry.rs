use super::common::vec2d::Vec2D;
use super::flight_state::{ControlMode, FlightState};
use super::landing_target::LandingTarget;
use super::safety::SafetyLevel;
use crate::config::SimConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// The single mutable kinematic/battery/status record of the vehicle.
///
/// Setters preserve the model invariants instead of panicking: altitude and
/// speed never go below zero and battery stays in `[0, 100]` and never
/// increases. Position clamping is the caller's job since only the flight
/// computer knows the viewport.
#[derive(Debug)]
pub struct VehicleState {
    pos: Vec2D<f64>,
    altitude: f64,
    speed: f64,
    battery: f64,
    state: FlightState,
    control: ControlMode,
}

impl VehicleState {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            pos: config.viewport.center(),
            altitude: config.cruise_altitude,
            speed: config.cruise_speed,
            battery: config.initial_battery.clamp(0.0, 100.0),
            state: FlightState::Flying,
            control: ControlMode::Auto,
        }
    }

    pub fn pos(&self) -> Vec2D<f64> { self.pos }

    pub fn altitude(&self) -> f64 { self.altitude }

    pub fn speed(&self) -> f64 { self.speed }

    pub fn battery(&self) -> f64 { self.battery }

    pub fn state(&self) -> FlightState { self.state }

    pub fn control(&self) -> ControlMode { self.control }

    pub fn set_pos(&mut self, pos: Vec2D<f64>) { self.pos = pos; }

    pub fn set_altitude(&mut self, altitude: f64) { self.altitude = altitude.max(0.0); }

    pub fn set_speed(&mut self, speed: f64) { self.speed = speed.max(0.0); }

    /// Drains `amount` from the battery, clamped to zero. Battery is
    /// monotonically non-increasing; recharge is not modeled.
    pub fn drain_battery(&mut self, amount: f64) {
        self.battery = (self.battery - amount.max(0.0)).max(0.0);
    }

    pub fn set_state(&mut self, state: FlightState) { self.state = state; }

    pub fn set_control(&mut self, control: ControlMode) { self.control = control; }
}

/// Pull-based read model of the full telemetry surface.
///
/// Shaped like the status payload the downstream presentation layer
/// consumes; `distance` and `eta` are `None` while undefined and render as
/// `--` in the console view.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetrySnapshot {
    pub state: FlightState,
    pub status: &'static str,
    pub control: ControlMode,
    pub position: Vec2D<f64>,
    pub altitude: f64,
    pub speed: f64,
    pub battery: f64,
    pub target: Option<LandingTarget>,
    pub distance: Option<f64>,
    pub eta: Option<f64>,
    pub safety_level: SafetyLevel,
    pub timestamp: DateTime<Utc>,
}

impl Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fmt_opt = |v: Option<f64>| v.map_or_else(|| "--".to_string(), |d| format!("{d:.1}"));
        write!(
            f,
            "{} [{}] pos {} alt {:.1}m spd {:.2}m/s bat {:.2}% dist {} eta {}s safety {}",
            self.status,
            self.control,
            self.position,
            self.altitude,
            self.speed,
            self.battery,
            fmt_opt(self.distance),
            fmt_opt(self.eta),
            self.safety_level,
        )
    }
}
