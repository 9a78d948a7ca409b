use super::command::Command;
use super::flight_computer::FlightComputer;
use crate::config::SimConfig;
use crate::warn;
use std::{sync::Arc, time::Duration};
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio_util::sync::CancellationToken;

/// Drives the simulation clock.
///
/// Two independent periodic loops share the single write lock on the
/// flight computer: the fast tick (idle drift and descent interpolation)
/// and the slow battery decay tick. Queued operator commands are drained
/// under the same lock right before each fast tick, so command handling
/// and tick mutation are mutually exclusive by construction. Both loops
/// stop when the cancellation token fires.
pub struct Supervisor {
    f_cont_lock: Arc<RwLock<FlightComputer>>,
    cmd_rx: Mutex<mpsc::Receiver<Command>>,
    tick_interval: Duration,
    battery_interval: Duration,
}

impl Supervisor {
    const CMD_CHANNEL_CAPACITY: usize = 32;

    /// Creates a new `Supervisor` and the command queue feeding it.
    pub fn new(
        f_cont_lock: Arc<RwLock<FlightComputer>>,
        config: &SimConfig,
    ) -> (Supervisor, mpsc::Sender<Command>) {
        let (tx, rx) = mpsc::channel(Self::CMD_CHANNEL_CAPACITY);
        (
            Self {
                f_cont_lock,
                cmd_rx: Mutex::new(rx),
                tick_interval: config.tick_interval,
                battery_interval: config.battery_interval,
            },
            tx,
        )
    }

    /// Fast loop: drain pending commands, then advance the simulation by
    /// one tick.
    pub async fn run_tick_loop(&self, c_tok: CancellationToken) {
        let mut cmd_rx = self.cmd_rx.lock().await;
        loop {
            {
                let mut f_cont = self.f_cont_lock.write().await;
                while let Ok(cmd) = cmd_rx.try_recv() {
                    if let Err(e) = f_cont.handle_command(cmd) {
                        warn!("Rejected: {e}");
                    }
                }
                f_cont.drift_tick();
            }
            tokio::select! {
                () = c_tok.cancelled() => return,
                () = tokio::time::sleep(self.tick_interval) => {}
            }
        }
    }

    /// Slow loop: battery decay while not landed.
    pub async fn run_battery_loop(&self, c_tok: CancellationToken) {
        loop {
            tokio::select! {
                () = c_tok.cancelled() => return,
                () = tokio::time::sleep(self.battery_interval) => {}
            }
            self.f_cont_lock.write().await.battery_tick();
        }
    }
}
