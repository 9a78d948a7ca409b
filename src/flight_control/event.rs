use super::telemetry::TelemetrySnapshot;
use serde::Serialize;
use strum_macros::Display;

#[derive(Display, Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FlightEventKind {
    TakeoffCompleted,
    LandingStarted,
    LandingCompleted,
    LandingCancelled,
}

/// Notification for downstream collaborators (webhook formatters etc.),
/// carrying the telemetry at the moment of the transition. Dispatch is
/// fire-and-forget: a full or closed channel never affects the simulation.
#[derive(Debug, Clone, Serialize)]
pub struct FlightEvent {
    pub kind: FlightEventKind,
    pub snapshot: TelemetrySnapshot,
}
