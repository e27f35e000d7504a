//! lastthird binary entry point.
//!
//! Dispatches the parsed command-line action. Computation failures never reach
//! this level; only setup problems (configuration, arguments) end the process
//! with a failure status.

use lastthird::args::{self, CliAction, ParsedArgs};
use lastthird::commands;
use lastthird::constants::EXIT_FAILURE;
use lastthird::logger::Log;

fn main() {
    let parsed = ParsedArgs::from_env();

    let outcome = match parsed.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::ListCities => {
            commands::cities::handle_list_cities_command();
            Ok(())
        }
        CliAction::Run {
            debug_enabled,
            watch,
            options,
        } => {
            Log::set_debug(debug_enabled);
            if watch {
                commands::watch::handle_watch_command(&options)
            } else {
                // A plain run prints only the result
                Log::set_enabled(debug_enabled);
                commands::run::handle_run_command(&options)
            }
        }
    };

    if let Err(e) = outcome {
        Log::set_enabled(true);
        Log::log_pipe();
        Log::log_error(&format!("{:#}", e));
        Log::log_end();
        std::process::exit(EXIT_FAILURE);
    }
}
