use super::flight_state::FlightState;
use std::fmt::{Display, Formatter};
use strum_macros::Display as StrumDisplay;

/// Typed operator commands consumed by the flight computer.
///
/// The external layer (console, tests) enqueues these over a channel and
/// the supervisor drains and applies them at the start of each tick, which
/// keeps command handling deterministic and replayable.
#[derive(StrumDisplay, Debug, PartialEq, Clone, Copy)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    SelectTarget { x: f64, y: f64 },
    Takeoff,
    StartLanding,
    CancelLanding,
    ToggleManual,
}

/// Why a command was rejected. All rejections are local and recoverable;
/// the vehicle state is left untouched.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CommandError {
    /// The command is not legal in the current operational state.
    InvalidStateTransition { cmd: Command, state: FlightState },
    /// Selection coordinates lie outside the viewport.
    OutOfBoundsTarget { x: f64, y: f64 },
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidStateTransition { cmd, state } => {
                write!(f, "command '{cmd}' is not legal while {state}")
            }
            CommandError::OutOfBoundsTarget { x, y } => {
                write!(f, "target ({x:.1}, {y:.1}) is outside the viewport")
            }
        }
    }
}

impl std::error::Error for CommandError {}
