use super::command::{Command, CommandError};
use super::common::vec2d::Vec2D;
use super::descent::DescentProgress;
use super::event::{FlightEvent, FlightEventKind};
use super::flight_state::{ControlMode, FlightState};
use super::landing_target::LandingTarget;
use super::safety::DerivedTelemetry;
use super::telemetry::{TelemetrySnapshot, VehicleState};
use crate::config::SimConfig;
use crate::{event, info};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;

/// The landing state machine.
///
/// Owns the single `VehicleState`, the live landing target, the transient
/// descent progress and the pending takeoff deadline. All mutation happens
/// synchronously inside `handle_command` or the tick methods, which the
/// supervisor calls under one write lock; there is no other writer.
///
/// Timer-driven transitions are modeled as deadlines and counters checked
/// by the tick instead of free-running timers: the takeoff climb completes
/// when `takeoff_due` passes, and a descent only advances inside
/// `drift_tick`, so a new landing attempt structurally cannot leave a stale
/// descent loop behind.
pub struct FlightComputer {
    vehicle: VehicleState,
    target: Option<LandingTarget>,
    descent: Option<DescentProgress>,
    takeoff_due: Option<DateTime<Utc>>,
    derived: DerivedTelemetry,
    rng: StdRng,
    event_tx: mpsc::Sender<FlightEvent>,
    config: SimConfig,
}

impl FlightComputer {
    pub fn new(config: SimConfig, event_tx: mpsc::Sender<FlightEvent>) -> Self {
        let vehicle = VehicleState::new(&config);
        let rng = config.rng_seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let derived =
            DerivedTelemetry::compute(vehicle.pos(), None, vehicle.altitude(), vehicle.speed());
        Self {
            vehicle,
            target: None,
            descent: None,
            takeoff_due: None,
            derived,
            rng,
            event_tx,
            config,
        }
    }

    /// Applies one operator command. Illegal commands are rejected with a
    /// reported precondition failure and leave all state untouched.
    pub fn handle_command(&mut self, cmd: Command) -> Result<(), CommandError> {
        match cmd {
            Command::SelectTarget { x, y } => self.select_target(Vec2D::new(x, y)),
            Command::Takeoff => self.takeoff(),
            Command::StartLanding => self.start_landing(),
            Command::CancelLanding => self.cancel_landing(),
            Command::ToggleManual => {
                self.toggle_manual();
                Ok(())
            }
        }
    }

    /// Records a landing target. Only legal while flying under autopilot
    /// control and within the viewport.
    pub fn select_target(&mut self, point: Vec2D<f64>) -> Result<(), CommandError> {
        let cmd = Command::SelectTarget { x: point.x(), y: point.y() };
        if self.vehicle.state() != FlightState::Flying || self.vehicle.control().is_manual() {
            return Err(self.rejected(cmd));
        }
        if !self.config.viewport.contains(point) {
            return Err(CommandError::OutOfBoundsTarget { x: point.x(), y: point.y() });
        }
        self.target = Some(LandingTarget::new(point));
        self.refresh_derived();
        info!("Landing target set to {point}");
        Ok(())
    }

    /// Starts (or re-arms) the takeoff climb. Illegal only while landing.
    pub fn takeoff(&mut self) -> Result<(), CommandError> {
        if self.vehicle.state() == FlightState::Landing {
            return Err(self.rejected(Command::Takeoff));
        }
        self.vehicle.set_state(FlightState::TakingOff);
        self.takeoff_due = Some(Utc::now() + self.config.takeoff_delay);
        info!("Takeoff initiated, airborne in {}s", self.config.takeoff_delay.num_seconds());
        Ok(())
    }

    /// Begins the descent toward the selected target. Requires a target and
    /// the baseline flying state. Replacing the descent here also discards
    /// any progress left over from a cancelled attempt.
    pub fn start_landing(&mut self) -> Result<(), CommandError> {
        if self.vehicle.state() != FlightState::Flying || self.target.is_none() {
            return Err(self.rejected(Command::StartLanding));
        }
        self.descent = Some(DescentProgress::new(
            self.vehicle.altitude(),
            self.vehicle.speed(),
            self.config.descent_steps,
        ));
        self.vehicle.set_state(FlightState::Landing);
        info!("Auto-landing started over {} steps", self.config.descent_steps);
        self.emit(FlightEventKind::LandingStarted);
        Ok(())
    }

    /// Aborts a running descent and returns to flight. The selected target
    /// is retained, so a subsequent `start_landing` succeeds without
    /// reselection.
    ///
    /// Altitude and speed hold their cancel values until the next idle
    /// drift tick clamps them back into the cruise bands in one step; the
    /// simulation does not model a gradual climb-out.
    pub fn cancel_landing(&mut self) -> Result<(), CommandError> {
        if self.vehicle.state() != FlightState::Landing {
            return Err(self.rejected(Command::CancelLanding));
        }
        self.descent = None;
        self.vehicle.set_state(FlightState::Flying);
        self.refresh_derived();
        info!("Landing cancelled, holding at {:.1}m", self.vehicle.altitude());
        self.emit(FlightEventKind::LandingCancelled);
        Ok(())
    }

    /// Flips between autopilot and manual control. Legal in any state.
    pub fn toggle_manual(&mut self) {
        let control = self.vehicle.control().toggled();
        self.vehicle.set_control(control);
        info!("Control mode switched to {control}");
    }

    /// One fast simulation tick: completes a due takeoff, advances a
    /// running descent, or applies idle drift while flying on autopilot.
    pub fn drift_tick(&mut self) {
        if let Some(due) = self.takeoff_due {
            if Utc::now() >= due {
                self.complete_takeoff();
                return;
            }
        }
        match self.vehicle.state() {
            FlightState::Landing => self.descent_step(),
            FlightState::Flying if !self.vehicle.control().is_manual() => self.idle_drift(),
            _ => {}
        }
    }

    /// One slow tick: battery decays while the vehicle is not landed.
    pub fn battery_tick(&mut self) {
        if self.vehicle.state() != FlightState::Landed {
            self.vehicle.drain_battery(self.config.battery_decay);
        }
    }

    /// Snapshot of the full telemetry surface for external readers.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            state: self.vehicle.state(),
            status: self.vehicle.state().status_text(),
            control: self.vehicle.control(),
            position: self.vehicle.pos(),
            altitude: self.vehicle.altitude(),
            speed: self.vehicle.speed(),
            battery: self.vehicle.battery(),
            target: self.target,
            distance: self.derived.distance,
            eta: self.derived.eta,
            safety_level: self.derived.safety,
            timestamp: Utc::now(),
        }
    }

    pub fn state(&self) -> FlightState { self.vehicle.state() }

    pub fn control(&self) -> ControlMode { self.vehicle.control() }

    pub fn target(&self) -> Option<&LandingTarget> { self.target.as_ref() }

    pub fn descent(&self) -> Option<&DescentProgress> { self.descent.as_ref() }

    fn descent_step(&mut self) {
        let (complete, altitude, speed, remaining, refresh) = {
            let Some(descent) = self.descent.as_mut() else { return };
            descent.advance();
            (
                descent.is_complete(),
                descent.altitude(),
                descent.speed(),
                descent.steps_remaining(),
                descent.step() % self.config.derived_refresh_stride == 0,
            )
        };
        if complete {
            self.finalize_landing();
            return;
        }
        let Some(target) = self.target.as_ref().map(LandingTarget::point) else { return };
        self.vehicle.set_altitude(altitude);
        self.vehicle.set_speed(speed);
        // Decaying-remainder interpolation: each step covers 1/remaining of
        // the leftover distance, so the path converges on the target without
        // being a fixed-velocity line.
        let pos = self.vehicle.pos();
        let delta = pos.to(&target) / f64::from(remaining);
        let jitter = self.jitter();
        let next = self.config.viewport.clamp(pos + delta + jitter);
        self.vehicle.set_pos(next);
        if refresh {
            self.refresh_derived();
        }
    }

    fn finalize_landing(&mut self) {
        self.vehicle.set_altitude(0.0);
        self.vehicle.set_speed(0.0);
        self.vehicle.set_state(FlightState::Landed);
        self.descent = None;
        self.target = None;
        self.refresh_derived();
        info!("Touchdown confirmed at {}", self.vehicle.pos());
        self.emit(FlightEventKind::LandingCompleted);
    }

    fn complete_takeoff(&mut self) {
        self.takeoff_due = None;
        self.vehicle.set_pos(self.config.viewport.center());
        self.vehicle.set_altitude(self.config.cruise_altitude);
        self.vehicle.set_speed(self.config.cruise_speed);
        self.vehicle.set_state(FlightState::Flying);
        self.refresh_derived();
        info!("Takeoff complete, cruising at {:.0}m", self.config.cruise_altitude);
        self.emit(FlightEventKind::TakeoffCompleted);
    }

    fn idle_drift(&mut self) {
        let amp = self.config.drift_amplitude;
        let wander = Vec2D::new(
            self.rng.random_range(-amp..=amp),
            self.rng.random_range(-amp..=amp),
        );
        let pos = self.config.viewport.clamp(self.vehicle.pos() + wander);
        self.vehicle.set_pos(pos);
        // The band clamps also recover cruise altitude/speed in one step
        // after a cancelled descent left the vehicle below them.
        let (alt_lo, alt_hi) = self.config.altitude_band;
        let altitude = self.vehicle.altitude() + self.rng.random_range(-0.5..=0.5);
        self.vehicle.set_altitude(altitude.clamp(alt_lo, alt_hi));
        let (spd_lo, spd_hi) = self.config.speed_band;
        let speed = self.vehicle.speed() + self.rng.random_range(-0.05..=0.05);
        self.vehicle.set_speed(speed.clamp(spd_lo, spd_hi));
        self.refresh_derived();
    }

    /// Bounded per-axis position noise emulating real flight disturbance.
    fn jitter(&mut self) -> Vec2D<f64> {
        let amp = self.config.jitter_amplitude;
        if amp > 0.0 {
            Vec2D::new(self.rng.random_range(-amp..=amp), self.rng.random_range(-amp..=amp))
        } else {
            Vec2D::zero()
        }
    }

    fn refresh_derived(&mut self) {
        self.derived = DerivedTelemetry::compute(
            self.vehicle.pos(),
            self.target.as_ref(),
            self.vehicle.altitude(),
            self.vehicle.speed(),
        );
    }

    fn rejected(&self, cmd: Command) -> CommandError {
        CommandError::InvalidStateTransition { cmd, state: self.vehicle.state() }
    }

    fn emit(&self, kind: FlightEventKind) {
        let notification = FlightEvent { kind, snapshot: self.telemetry() };
        if self.event_tx.try_send(notification).is_err() {
            event!("Notifier not keeping up, dropped {kind}");
        }
    }
}
