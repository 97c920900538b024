use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use impulse_workspace::{load_input_map, load_trace};
use impulsed::cli::{Cli, Command};
use impulsed::error::AppError;
use impulsed::replay::{format_report, replay};
use impulsed::{logging, print_debug, print_error, print_info, print_warning};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if logging::setup(cli.verbose, cli.no_color).is_err() {
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Check { map } => {
            let manager = load_input_map(&map)?.build()?;
            let settings = manager.settings();
            print_info!(
                "{}: {} actions over {} devices",
                map.display(),
                manager.actions()?.len(),
                manager.device_count()?
            );
            print_debug!(
                "axis dead zone {}, change epsilon {}, controller as second device: {}",
                settings.axis_deadzone,
                settings.change_epsilon,
                settings.controller_as_second_device
            );
        }
        Command::Actions { map } => {
            let manager = load_input_map(&map)?.build()?;
            for action in manager.actions()? {
                print_info!("{action}");
            }
        }
        Command::Replay { map, trace, device } => {
            let document = load_input_map(&map)?;
            let events = load_trace(&trace)?;
            print_debug!("replaying {} events from {}", events.len(), trace.display());

            let outcome = replay(&document, &events, device)?;
            print_info!(
                "{} routed, {} discarded, {} notifications",
                outcome.routed,
                outcome.discarded,
                outcome.notifications.len()
            );
            for (index, report) in &outcome.reports {
                print_info!("device {index}:");
                for line in format_report(report) {
                    print_info!("  {line}");
                }
            }
            for (index, err) in &outcome.failures {
                print_warning!("event #{index}: {err}");
            }
            if !outcome.is_clean() {
                return Err(AppError::ReplayFailed(outcome.failures.len(), events.len()));
            }
        }
    }
    Ok(())
}
