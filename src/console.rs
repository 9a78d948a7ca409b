use crate::flight_control::FlightComputer;
use crate::flight_control::command::Command;
use crate::{info, log, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{RwLock, mpsc};

enum ConsoleInput {
    Command(Command),
    Status,
    Help,
    Quit,
}

/// Interactive operator console.
///
/// Reads one command per stdin line and enqueues it for the supervisor;
/// `status` reads the telemetry snapshot directly (pull model) and prints
/// it as JSON. The console never mutates the flight computer itself.
pub struct Console {
    f_cont_lock: Arc<RwLock<FlightComputer>>,
    cmd_tx: mpsc::Sender<Command>,
}

impl Console {
    pub fn new(f_cont_lock: Arc<RwLock<FlightComputer>>, cmd_tx: mpsc::Sender<Command>) -> Self {
        Self { f_cont_lock, cmd_tx }
    }

    pub async fn run(&self) {
        Self::print_help();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match Self::parse(line) {
                Ok(ConsoleInput::Command(cmd)) => {
                    if self.cmd_tx.send(cmd).await.is_err() {
                        warn!("Command queue closed, exiting console");
                        return;
                    }
                }
                Ok(ConsoleInput::Status) => {
                    let snapshot = self.f_cont_lock.read().await.telemetry();
                    log!("{snapshot}");
                    match serde_json::to_string_pretty(&snapshot) {
                        Ok(json) => println!("{json}"),
                        Err(e) => warn!("Snapshot serialization failed: {e}"),
                    }
                }
                Ok(ConsoleInput::Help) => Self::print_help(),
                Ok(ConsoleInput::Quit) => return,
                Err(msg) => warn!("{msg}"),
            }
        }
    }

    fn parse(line: &str) -> Result<ConsoleInput, String> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().unwrap_or_default().to_lowercase();
        match verb.as_str() {
            "target" => {
                let x = Self::parse_coord(tokens.next(), "x")?;
                let y = Self::parse_coord(tokens.next(), "y")?;
                Ok(ConsoleInput::Command(Command::SelectTarget { x, y }))
            }
            "takeoff" => Ok(ConsoleInput::Command(Command::Takeoff)),
            "land" => Ok(ConsoleInput::Command(Command::StartLanding)),
            "cancel" => Ok(ConsoleInput::Command(Command::CancelLanding)),
            "manual" => Ok(ConsoleInput::Command(Command::ToggleManual)),
            "status" => Ok(ConsoleInput::Status),
            "help" => Ok(ConsoleInput::Help),
            "quit" | "exit" => Ok(ConsoleInput::Quit),
            other => Err(format!("Unknown command '{other}', try 'help'")),
        }
    }

    fn parse_coord(token: Option<&str>, axis: &str) -> Result<f64, String> {
        token
            .ok_or_else(|| format!("Missing {axis} coordinate, usage: target X Y"))?
            .parse::<f64>()
            .map_err(|_| format!("Unparsable {axis} coordinate, usage: target X Y"))
    }

    fn print_help() {
        info!(
            "Commands: target X Y | takeoff | land | cancel | manual | status | help | quit"
        );
    }
}
