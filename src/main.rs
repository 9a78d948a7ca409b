#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod console;
mod flight_control;
mod logger;

use crate::config::SimConfig;
use crate::console::Console;
use crate::flight_control::event::FlightEvent;
use crate::flight_control::{FlightComputer, Supervisor};
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let sim_config = SimConfig::from_env();
    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let f_cont_lock = Arc::new(RwLock::new(FlightComputer::new(sim_config.clone(), event_tx)));

    let (supervisor, cmd_tx) = Supervisor::new(Arc::clone(&f_cont_lock), &sim_config);
    let supervisor = Arc::new(supervisor);
    let c_tok = CancellationToken::new();

    let supervisor_clone = Arc::clone(&supervisor);
    let tick_tok = c_tok.clone();
    tokio::spawn(async move {
        supervisor_clone.run_tick_loop(tick_tok).await;
    });
    let supervisor_clone_clone = Arc::clone(&supervisor);
    let battery_tok = c_tok.clone();
    tokio::spawn(async move {
        supervisor_clone_clone.run_battery_loop(battery_tok).await;
    });
    tokio::spawn(run_notifier(event_rx));

    info!("Simulated autopilot landing controller up");
    Console::new(Arc::clone(&f_cont_lock), cmd_tx).run().await;

    c_tok.cancel();
    info!("Shutting down");
}

/// Stand-in for the downstream notification collaborator: consumes flight
/// events and reports them. Failures here can never touch the simulation.
async fn run_notifier(mut event_rx: mpsc::Receiver<FlightEvent>) {
    while let Some(notification) = event_rx.recv().await {
        info!("Event {}: {}", notification.kind, notification.snapshot);
        if let Ok(json) = serde_json::to_string(&notification) {
            event!("{json}");
        }
    }
}
