use serde::Serialize;
use strum_macros::Display;

/// Operational state of the simulated vehicle.
///
/// Legal transitions: `Flying -> TakingOff` (command, also from `Landed`),
/// `TakingOff -> Flying` (automatic after the climb delay),
/// `Flying -> Landing` (command, requires a selected target),
/// `Landing -> Landed` (automatic at full descent progress) and
/// `Landing -> Flying` (cancel command). Everything else is rejected.
#[derive(Display, Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FlightState {
    Flying,
    TakingOff,
    Landing,
    Landed,
}

impl FlightState {
    /// Human-readable status line shown by the console and carried in
    /// telemetry snapshots.
    pub fn status_text(self) -> &'static str {
        match self {
            FlightState::Flying => "flying",
            FlightState::TakingOff => "taking off",
            FlightState::Landing => "auto-landing",
            FlightState::Landed => "landed",
        }
    }
}

/// Whether the operator or the autopilot steers the vehicle.
///
/// Orthogonal to `FlightState`: manual mode suppresses idle drift and
/// target selection, but a descent already in progress keeps running.
#[derive(Display, Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Auto,
    Manual,
}

impl ControlMode {
    pub fn toggled(self) -> Self {
        match self {
            ControlMode::Auto => ControlMode::Manual,
            ControlMode::Manual => ControlMode::Auto,
        }
    }

    pub fn is_manual(self) -> bool { self == ControlMode::Manual }
}
