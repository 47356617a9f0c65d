// iritop
//
// Live view of an IOTA IRI node and its neighbors.
//
// Quit:  q / Esc / Ctrl-C

use chrono::Local;
use crossbeam::channel;
use crossterm::event;
use iritop::view::Surface;
use iritop::{Dashboard, HttpNodeApi};
use iritop_tools::keys::{map_event, Input};
use iritop_tools::tui::Tui;
use iritop_tools::{init_logging, parse_cli, CliAction, RunConfig, VERSION};
use std::io;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error("Error fetching data from node: {0}")]
    Fetch(iritop::Error),
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let config = match parse_cli(&args) {
        Ok(CliAction::Run(config)) => config,
        Ok(CliAction::Help(usage)) => {
            println!("{usage}");
            return ExitCode::SUCCESS;
        }
        Ok(CliAction::Version) => {
            println!("iritop {VERSION}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("iritop: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &config.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("iritop: cannot open log file {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }

    let api = match config.node_api() {
        Ok(api) => api,
        Err(e) => {
            eprintln!("iritop: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("IRITop connecting to node {} ...", config.node);
    info!(node = %config.node, version = VERSION, "starting");

    let mut dashboard = Dashboard::new(config.dashboard_settings());
    if let Err(e) = dashboard.poll(&api) {
        eprintln!("{}", Failure::Fetch(e));
        return ExitCode::FAILURE;
    }
    dashboard.set_status(last_update());

    let mut tui = match Tui::setup() {
        Ok(tui) => tui,
        Err(e) => {
            eprintln!("{}", Failure::Terminal(e));
            return ExitCode::FAILURE;
        }
    };
    Tui::install_panic_hook();

    let result = run(&mut tui, &mut dashboard, &api, &config);
    tui.teardown();

    match result {
        Ok(()) => {
            info!(polls = dashboard.polls(), "quit");
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!(error = %e, "exiting");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    tui: &mut Tui,
    dashboard: &mut Dashboard,
    api: &HttpNodeApi,
    config: &RunConfig,
) -> Result<(), Failure> {
    // Keyboard handler
    let (key_tx, key_rx) = channel::unbounded();
    std::thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if key_tx.send(ev).is_err() {
                break;
            }
        }
    });

    draw(tui, dashboard)?;
    let mut last_poll = Instant::now();
    let tick = channel::tick(config.blink_delay);
    loop {
        crossbeam::select! {
            recv(key_rx) -> ev => {
                let Ok(ev) = ev else {
                    warn!("keyboard input closed");
                    return Ok(());
                };
                match map_event(&ev) {
                    Some(Input::Quit) => return Ok(()),
                    Some(Input::Command(command)) => {
                        dashboard.handle(command);
                        draw(tui, dashboard)?;
                    }
                    None => {}
                }
            }

            recv(tick) -> _ => {
                if last_poll.elapsed() >= config.poll_delay {
                    dashboard.poll(api).map_err(Failure::Fetch)?;
                    last_poll = Instant::now();
                    dashboard.set_status(last_update());
                }
                draw(tui, dashboard)?;
            }
        }
    }
}

fn draw(tui: &mut Tui, dashboard: &mut Dashboard) -> io::Result<()> {
    let (rows, cols) = tui.size()?;
    match dashboard.render(rows, cols) {
        Some(frame) => tui.present(&frame),
        None => Ok(()),
    }
}

fn last_update() -> String {
    format!("Updated {}", Local::now().format("%H:%M:%S"))
}
