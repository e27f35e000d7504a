//! Implementation of the default one-shot computation.
//!
//! The configuration file and the command-line options are merged into one
//! [`RunSetup`], the anchors are resolved (fetching only what is missing), and
//! the summary or the fixed failure message is printed to stdout.

use anyhow::{Context, Result};

use crate::args::RunOptions;
use crate::cities::resolve_city;
use crate::config::Config;
use crate::constants::{MAXIMUM_METHOD, MINIMUM_METHOD};
use crate::logger::Log;
use crate::summary::{Overrides, run_once};
use crate::timings::{AladhanClient, TimingsQuery};
use crate::utils::format_coordinates;

/// Everything a computation needs once config and CLI are combined.
#[derive(Debug, Clone)]
pub struct RunSetup {
    pub config: Config,
    pub query: TimingsQuery,
    pub overrides: Overrides,
}

impl RunSetup {
    /// Load the configuration (`--config` or the default location) and merge the CLI options.
    pub fn load(options: &RunOptions) -> Result<Self> {
        let (config, path) = match &options.config_path {
            Some(path) => (Config::load_from_path(path)?, path.clone()),
            None => (Config::load()?, Config::get_config_path()?),
        };

        config.log_config(&path);
        Self::from_parts(config, options)
    }

    /// Merge an already loaded configuration with the CLI options.
    ///
    /// Command-line values win over configuration values field by field.
    /// Without `--date` the query uses today's date at the resolved location.
    pub fn from_parts(config: Config, options: &RunOptions) -> Result<Self> {
        let location = match options.city.as_deref() {
            Some(name) => resolve_city(name)
                .with_context(|| format!("Unknown city '{}'. Use --list-cities", name))?,
            None => config.location()?,
        };

        let method = match options.method {
            Some(method) => {
                validate_method(method)?;
                method
            }
            None => config.method(),
        };

        let date = options.date.unwrap_or_else(|| location.today());

        let overrides = Overrides::new(options.maghrib.clone(), options.fajr.clone())
            .or(&config.overrides());

        Ok(Self {
            config,
            query: TimingsQuery {
                date,
                location,
                method,
            },
            overrides,
        })
    }

    /// Debug output describing the resolved query.
    pub fn log_query(&self) {
        Log::log_debug(&format!(
            "Query: {} ({}) on {} with method {}",
            self.query.location.name,
            format_coordinates(self.query.location.latitude, self.query.location.longitude),
            self.query.date.format("%Y-%m-%d"),
            self.query.method
        ));
        if let Some(maghrib) = &self.overrides.maghrib {
            Log::log_debug(&format!("Maghrib override in effect: {}", maghrib));
        }
        if let Some(fajr) = &self.overrides.fajr {
            Log::log_debug(&format!("Fajr override in effect: {}", fajr));
        }
    }
}

/// Validate a method id using the same range as config validation
fn validate_method(method: u8) -> Result<()> {
    if !(MINIMUM_METHOD..=MAXIMUM_METHOD).contains(&method) {
        anyhow::bail!(
            "Method must be between {} and {} (got {})",
            MINIMUM_METHOD,
            MAXIMUM_METHOD,
            method
        );
    }
    Ok(())
}

/// Handle the default invocation: compute once and print the result.
///
/// Computation failures are not errors here, they print the fixed failure
/// message. Only configuration and setup problems are returned.
pub fn handle_run_command(options: &RunOptions) -> Result<()> {
    Log::log_version();

    let setup = RunSetup::load(options)?;
    setup.log_query();

    let client = AladhanClient::new(&setup.config).context("Failed to create HTTP client")?;
    let text = run_once(
        &client,
        &setup.query,
        &setup.overrides,
        setup.config.language(),
    );

    Log::log_pipe();
    println!("{}", text);
    Log::log_end();
    Ok(())
}
