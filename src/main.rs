/* 3rd party libraries */
use clap::{Arg, Command as Cli};
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::io::BufRead;
use std::thread::Builder;
use std::time::Duration;

/* Custom libraries */
use building::Building;
use config::SimConfig;

/* Modules */
mod building;
mod car;
mod command;
mod config;
mod dispatcher;
mod shared;

/* Main */
fn main() {
    env_logger::init();

    let matches = Cli::new("liftsim")
        .about("Multi-elevator dispatch and control simulator")
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("tick-ms")
                .long("tick-ms")
                .takes_value(true)
                .default_value("100")
                .help("Wall-clock milliseconds per simulation tick"),
        )
        .get_matches();

    // Load the configuration
    let config = match matches.value_of("config") {
        Some(path) => unwrap_or_exit!(config::load_config(path)),
        None => SimConfig::default(),
    };
    let tick_ms: u64 = unwrap_or_exit!(matches.value_of("tick-ms").unwrap().parse());

    let mut building = unwrap_or_exit!(Building::new(config));
    info!(
        "liftsim started: {} cars, floors {}..={}",
        building.config().building.car_count,
        building.config().building.min_floor,
        building.config().building.max_floor
    );

    // Console input arrives on its own thread; commands queue up between
    // ticks and apply in arrival order at the next tick boundary.
    let (line_tx, line_rx) = cbc::unbounded::<String>();
    let console_thread = Builder::new().name("console".into());
    console_thread
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if line_tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        })
        .unwrap();

    let ticker = cbc::tick(Duration::from_millis(tick_ms));
    let mut queued: Vec<String> = Vec::new();

    loop {
        cbc::select! {
            recv(line_rx) -> line => match line {
                Ok(line) => queued.push(line),
                Err(_) => break, // stdin closed
            },
            recv(ticker) -> _ => {
                for line in queued.drain(..) {
                    if !handle_line(&mut building, &line) {
                        return;
                    }
                }
                building.tick();
            }
        }
    }
}

/// Applies one console line. Returns false when the driver should exit.
/// `snapshot` and `quit` are driver words, not simulation commands.
fn handle_line(building: &mut Building, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return true;
    }
    match line {
        "quit" => return false,
        "snapshot" => {
            let snapshot = building.snapshot();
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("failed to render snapshot: {}", e),
            }
            return true;
        }
        _ => {}
    }
    match command::parse(line, building.config()) {
        Ok(parsed) => {
            if let Err(e) = building.execute(parsed) {
                warn!("rejected '{}': {}", line, e);
            }
        }
        Err(e) => warn!("rejected '{}': {}", line, e),
    }
    true
}
