//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports help, version, and
//! debug flags, the manual anchor overrides, and the query parameters, while
//! reporting unknown or incomplete options.

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::logger::Log;

/// Options for a computation run taken from the command line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunOptions {
    pub maghrib: Option<String>,
    pub fajr: Option<String>,
    pub city: Option<String>,
    pub date: Option<NaiveDate>,
    pub method: Option<u8>,
    pub config_path: Option<PathBuf>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Compute once, or keep recomputing on demand when `watch` is set
    Run {
        debug_enabled: bool,
        watch: bool,
        options: RunOptions,
    },
    /// Print the built-in reference cities and exit
    ListCities,
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown or invalid arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut display_help = false;
        let mut display_version = false;
        let mut list_cities = false;
        let mut watch = false;
        let mut options = RunOptions::default();
        let mut error_found = false;

        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg_str = args_vec[i].as_str();
            match arg_str {
                "--help" | "-h" => display_help = true,
                "--version" | "-V" | "-v" => display_version = true,
                "--debug" | "-d" => debug_enabled = true,
                "--watch" | "-w" => watch = true,
                "--list-cities" | "-l" => list_cities = true,
                "--maghrib" | "-m" | "--fajr" | "-f" | "--city" | "-c" | "--date"
                | "--method" | "--config" => {
                    let Some(value) = args_vec.get(i + 1) else {
                        Log::log_warning(&format!("Missing value for {}", arg_str));
                        error_found = true;
                        i += 1;
                        continue;
                    };

                    if !apply_option(&mut options, arg_str, value) {
                        error_found = true;
                    }
                    i += 1; // Skip the consumed value
                }
                _ => {
                    if arg_str.starts_with('-') {
                        Log::log_warning(&format!("Unknown option: {}", arg_str));
                    } else {
                        Log::log_warning(&format!("Unexpected argument: {}", arg_str));
                    }
                    error_found = true;
                }
            }
            i += 1;
        }

        let action = if display_version {
            CliAction::ShowVersion
        } else if error_found {
            CliAction::ShowHelpDueToError
        } else if display_help {
            CliAction::ShowHelp
        } else if list_cities {
            CliAction::ListCities
        } else {
            CliAction::Run {
                debug_enabled,
                watch,
                options,
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Store one option value. Returns `false` and warns if the value is invalid.
fn apply_option(options: &mut RunOptions, flag: &str, value: &str) -> bool {
    match flag {
        "--maghrib" | "-m" => options.maghrib = Some(value.to_string()),
        "--fajr" | "-f" => options.fajr = Some(value.to_string()),
        "--city" | "-c" => options.city = Some(value.to_string()),
        "--config" => options.config_path = Some(PathBuf::from(value)),
        "--date" => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => options.date = Some(date),
            Err(_) => {
                Log::log_warning(&format!("Invalid date (use YYYY-MM-DD): {}", value));
                return false;
            }
        },
        "--method" => match value.parse::<u8>() {
            Ok(method) => options.method = Some(method),
            Err(_) => {
                Log::log_warning(&format!("Invalid method id: {}", value));
                return false;
            }
        },
        _ => return false,
    }
    true
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_decorated(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_end();
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: lastthird [OPTIONS]");
    Log::log_block_start("Options:");
    Log::log_indented("-m, --maghrib <HH:MM>     Use this Maghrib time instead of the fetched one");
    Log::log_indented("-f, --fajr <HH:MM>        Use this Fajr time instead of the fetched one");
    Log::log_indented("-c, --city <NAME>         City to query (see --list-cities)");
    Log::log_indented("    --date <YYYY-MM-DD>   Date to query (default: today at the city)");
    Log::log_indented("    --method <ID>         Calculation method id");
    Log::log_indented("    --config <PATH>       Use this config file");
    Log::log_indented("-w, --watch               Keep running and recompute on demand");
    Log::log_indented("-l, --list-cities         List the built-in reference cities");
    Log::log_indented("-d, --debug               Enable detailed debug output");
    Log::log_indented("-h, --help                Print help information");
    Log::log_indented("-V, --version             Print version information");
    Log::log_end();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(options: RunOptions) -> CliAction {
        CliAction::Run {
            debug_enabled: false,
            watch: false,
            options,
        }
    }

    #[test]
    fn test_parse_no_args() {
        let parsed = ParsedArgs::parse(vec!["lastthird"]);
        assert_eq!(parsed.action, run(RunOptions::default()));
    }

    #[test]
    fn test_parse_debug_and_watch_flags() {
        let parsed = ParsedArgs::parse(vec!["lastthird", "-d", "--watch"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: true,
                watch: true,
                options: RunOptions::default(),
            }
        );
    }

    #[test]
    fn test_parse_overrides() {
        let parsed = ParsedArgs::parse(vec!["lastthird", "--maghrib", "18:42", "-f", "05:10"]);
        assert_eq!(
            parsed.action,
            run(RunOptions {
                maghrib: Some("18:42".into()),
                fajr: Some("05:10".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_override_values_are_not_validated_here() {
        // Format problems surface as the computation's failure message
        let parsed = ParsedArgs::parse(vec!["lastthird", "-m", "later"]);
        assert_eq!(
            parsed.action,
            run(RunOptions {
                maghrib: Some("later".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_parse_query_options() {
        let parsed = ParsedArgs::parse(vec![
            "lastthird",
            "--city",
            "Oran",
            "--date",
            "2025-03-07",
            "--method",
            "2",
            "--config",
            "/tmp/custom.toml",
        ]);
        assert_eq!(
            parsed.action,
            run(RunOptions {
                city: Some("Oran".into()),
                date: NaiveDate::from_ymd_opt(2025, 3, 7),
                method: Some(2),
                config_path: Some(PathBuf::from("/tmp/custom.toml")),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_parse_invalid_values() {
        for args in [
            vec!["lastthird", "--date", "07-03-2025"],
            vec!["lastthird", "--method", "three"],
            vec!["lastthird", "--method", "300"],
        ] {
            assert_eq!(
                ParsedArgs::parse(args).action,
                CliAction::ShowHelpDueToError
            );
        }
    }

    #[test]
    fn test_parse_missing_value() {
        let parsed = ParsedArgs::parse(vec!["lastthird", "--fajr"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_unknown_flag() {
        let parsed = ParsedArgs::parse(vec!["lastthird", "--unknown"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);

        let parsed = ParsedArgs::parse(vec!["lastthird", "stray"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_help_and_list() {
        assert_eq!(
            ParsedArgs::parse(vec!["lastthird", "-h"]).action,
            CliAction::ShowHelp
        );
        assert_eq!(
            ParsedArgs::parse(vec!["lastthird", "--list-cities"]).action,
            CliAction::ListCities
        );
        // Help takes precedence over listing
        assert_eq!(
            ParsedArgs::parse(vec!["lastthird", "-l", "--help"]).action,
            CliAction::ShowHelp
        );
    }

    #[test]
    fn test_version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["lastthird", "--version", "--help", "--bogus"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }
}
