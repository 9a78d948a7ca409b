pub(crate) mod command;
pub(crate) mod common;
pub(crate) mod descent;
pub(crate) mod event;
mod flight_computer;
mod flight_state;
pub(crate) mod landing_target;
pub(crate) mod safety;
mod supervisor;
pub(crate) mod telemetry;

pub use flight_computer::FlightComputer;
pub use flight_state::{ControlMode, FlightState};
pub use supervisor::Supervisor;

#[cfg(test)]
mod tests;
