//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `nexpose_bulk` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - The password prompt
//! - Mapping the outcome to an exit code
//!
//! All core functionality is implemented in the library crate.

use std::io;
use std::process;

use nexpose_bulk::cli::{parse_args, write_template, Invocation};
use nexpose_bulk::credentials::{prompt_password, ConsoleTerminal};
use nexpose_bulk::error_handling::ConfigError;
use nexpose_bulk::initialization::init_logger_with;
use nexpose_bulk::{run, EXIT_FAILURE, EXIT_SUCCESS};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match parse_args(std::env::args_os()) {
        Ok(Invocation::ShowTemplate) => {
            let code = match write_template(&mut io::stdout()) {
                Ok(()) => EXIT_SUCCESS,
                Err(_) => EXIT_FAILURE,
            };
            process::exit(code);
        }
        Ok(Invocation::Run(config)) => config,
        Err(e) => {
            if e.wants_help_hint() {
                eprintln!("{}", e);
                eprintln!("--help for help");
            } else if let ConfigError::Usage(usage) = &e {
                // clap renders its own help, version and usage text
                let _ = usage.print();
            }
            process::exit(e.exit_code());
        }
    };

    if let Err(e) = init_logger_with(config.log_level.clone().into(), config.log_format.clone()) {
        eprintln!("nexpose_bulk error: {}", e);
        process::exit(EXIT_FAILURE);
    }

    let password = match prompt_password(&mut ConsoleTerminal::new(), &config.username) {
        Ok(password) => password,
        Err(e) => {
            eprintln!();
            eprintln!("nexpose_bulk error: cannot read password: {}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    println!();
    println!(
        "Connecting to {}:{} as {}...",
        config.host, config.port, config.username
    );

    let code = match run(&config, &password, &mut io::stdout()).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("nexpose_bulk error: {:#}", e);
            EXIT_FAILURE
        }
    };
    process::exit(code);
}
