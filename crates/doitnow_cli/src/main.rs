//! DO-IT-NOW terminal entry point.
//!
//! # Responsibility
//! - Resolve configuration and start file logging.
//! - Open the record store and hand stdin/stdout to the session loop.
//!
//! # Usage
//!
//! ```bash
//! doitnow                         # ./txt_files
//! doitnow --data-dir /srv/tasks
//! DOITNOW_LOG=debug doitnow
//! ```

mod app;
mod config;
mod prompt;
mod views;

use app::{App, SystemClock};
use clap::Parser;
use config::{AppConfig, CliArgs};
use doitnow_core::{init_logging, FileRecordStore};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    let config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    // The UI owns the console; a logger failure only costs the log files.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = match FileRecordStore::open(&config.data_dir) {
        Ok(store) => store,
        Err(err) => {
            error!("event=store_open module=cli status=error");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut app = match App::new(store, SystemClock, stdin.lock(), stdout.lock()) {
        Ok(app) => app,
        Err(err) => {
            error!("event=session_load module=cli status=error");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match app.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=session_io module=cli status=error");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
