//! Configuration system for lastthird.
//!
//! Settings are read from `lastthird.toml` in `$XDG_CONFIG_HOME/lastthird/`.
//! A commented default file is written on first run. Every key is optional:
//!
//! ```toml
//! #[Location]
//! city = "Bechar"                   # Reference city or any city in the world database
//! latitude = 30.510294              # Explicit coordinates win over `city`
//! longitude = -2.812593
//!
//! #[Timings service]
//! method = 3                        # Calculation method id (0-23)
//! api_url = "https://api.aladhan.com/v1"
//! timeout_secs = 10
//! max_retries = 2
//! retry_delay_ms = 1000
//!
//! #[Output]
//! language = "en"                   # "en" or "ar"
//!
//! #[Manual overrides]
//! maghrib = "18:42"                 # Used instead of the fetched value
//! fajr = "05:10"
//! ```
//!
//! Command-line overrides take precedence over the `maghrib`/`fajr` keys.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cities::{Location, default_city, resolve_city};
use crate::constants::*;
use crate::logger::Log;
use crate::night::parse_time_of_day;
use crate::summary::Overrides;

/// Language used for summary labels and the failure message.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

/// Configuration structure for lastthird settings.
///
/// Most fields are optional; accessors fall back to the defaults in
/// [`crate::constants`].
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub method: Option<u8>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub language: Option<Language>,
    pub maghrib: Option<String>,
    pub fajr: Option<String>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Write a commented default config file, creating parent directories.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let city = default_city();
        let config_content = ConfigBuilder::new()
            .add_section("Location")
            .add_setting(
                "city",
                &format!("\"{}\"", city.name),
                "Reference city or any city in the world database",
            )
            .add_section("Timings service")
            .add_setting(
                "method",
                &DEFAULT_METHOD.to_string(),
                &format!(
                    "Calculation method id ({}-{})",
                    MINIMUM_METHOD, MAXIMUM_METHOD
                ),
            )
            .add_setting(
                "api_url",
                &format!("\"{}\"", DEFAULT_API_URL),
                "Base URL of the timings API",
            )
            .add_setting(
                "timeout_secs",
                &DEFAULT_TIMEOUT_SECS.to_string(),
                &format!(
                    "Request timeout in seconds ({}-{})",
                    MINIMUM_TIMEOUT_SECS, MAXIMUM_TIMEOUT_SECS
                ),
            )
            .add_setting(
                "max_retries",
                &DEFAULT_MAX_RETRIES.to_string(),
                &format!("Retries on transient failures (0-{})", MAXIMUM_RETRIES),
            )
            .add_setting(
                "retry_delay_ms",
                &DEFAULT_RETRY_DELAY_MS.to_string(),
                &format!("Delay between retries (0-{} ms)", MAXIMUM_RETRY_DELAY_MS),
            )
            .add_section("Output")
            .add_setting(
                "language",
                &format!("\"{}\"", DEFAULT_LANGUAGE),
                "Summary language: \"en\" or \"ar\"",
            )
            .build();

        fs::write(path, config_content).context("Failed to write default config file")?;
        Ok(())
    }

    /// Load from a specific path. Does NOT create the file if it is missing.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        validate_config(&config)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        Ok(config)
    }

    /// Load from the default location, writing a default file first if needed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
            Log::log_block_start(&format!(
                "Created default configuration at {}",
                crate::utils::path_for_display(&config_path)
            ));
        }

        Self::load_from_path(&config_path)
    }

    pub fn method(&self) -> u8 {
        self.method.unwrap_or(DEFAULT_METHOD)
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn retry_delay_ms(&self) -> u64 {
        self.retry_delay_ms.unwrap_or(DEFAULT_RETRY_DELAY_MS)
    }

    pub fn language(&self) -> Language {
        self.language.unwrap_or_default()
    }

    /// Manual overrides stored in the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides::new(self.maghrib.clone(), self.fajr.clone())
    }

    /// Resolve the query location.
    ///
    /// Explicit coordinates win, then `city`, then the default reference city.
    pub fn location(&self) -> Result<Location> {
        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            return Ok(Location {
                name: self
                    .city
                    .clone()
                    .unwrap_or_else(|| "Custom location".to_string()),
                latitude,
                longitude,
            });
        }

        match self.city.as_deref() {
            Some(name) => resolve_city(name)
                .with_context(|| format!("Unknown city '{}'. Use --list-cities", name)),
            None => Ok(default_city().into()),
        }
    }

    pub fn log_config(&self, path: &Path) {
        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            crate::utils::path_for_display(path)
        ));

        match self.location() {
            Ok(location) => Log::log_indented(&format!(
                "Location: {} ({})",
                location.name,
                crate::utils::format_coordinates(location.latitude, location.longitude)
            )),
            Err(e) => Log::log_indented(&format!("Location: {}", e)),
        }
        Log::log_indented(&format!("Calculation method: {}", self.method()));
        Log::log_indented(&format!("API: {}", self.api_url()));
        Log::log_indented(&format!(
            "Timeout: {}s, retries: {}, retry delay: {}ms",
            self.timeout_secs(),
            self.max_retries(),
            self.retry_delay_ms()
        ));
        Log::log_indented(&format!("Language: {}", self.language().as_str()));

        if let Some(maghrib) = &self.maghrib {
            Log::log_indented(&format!("Maghrib override: {}", maghrib));
        }
        if let Some(fajr) = &self.fajr {
            Log::log_indented(&format!("Fajr override: {}", fajr));
        }
    }
}

/// Validate ranges and formats of every configured value.
pub fn validate_config(config: &Config) -> Result<()> {
    match (config.latitude, config.longitude) {
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                anyhow::bail!("Latitude must be between -90 and 90 degrees (got {})", lat);
            }
            if !(-180.0..=180.0).contains(&lon) {
                anyhow::bail!(
                    "Longitude must be between -180 and 180 degrees (got {})",
                    lon
                );
            }
        }
        (None, None) => {}
        _ => anyhow::bail!("Latitude and longitude must be set together"),
    }

    if let Some(method) = config.method {
        if !(MINIMUM_METHOD..=MAXIMUM_METHOD).contains(&method) {
            anyhow::bail!(
                "Method must be between {} and {} (got {})",
                MINIMUM_METHOD,
                MAXIMUM_METHOD,
                method
            );
        }
    }

    if let Some(url) = &config.api_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("api_url must start with http:// or https:// (got {})", url);
        }
    }

    if let Some(timeout) = config.timeout_secs {
        if !(MINIMUM_TIMEOUT_SECS..=MAXIMUM_TIMEOUT_SECS).contains(&timeout) {
            anyhow::bail!(
                "Timeout must be between {} and {} seconds",
                MINIMUM_TIMEOUT_SECS,
                MAXIMUM_TIMEOUT_SECS
            );
        }
    }

    if let Some(retries) = config.max_retries {
        if retries > MAXIMUM_RETRIES {
            anyhow::bail!("max_retries must be at most {}", MAXIMUM_RETRIES);
        }
    }

    if let Some(delay) = config.retry_delay_ms {
        if delay > MAXIMUM_RETRY_DELAY_MS {
            anyhow::bail!("retry_delay_ms must be at most {}", MAXIMUM_RETRY_DELAY_MS);
        }
    }

    for (key, value) in [("maghrib", &config.maghrib), ("fajr", &config.fajr)] {
        if let Some(raw) = value {
            if !raw.trim().is_empty() {
                parse_time_of_day(raw)
                    .with_context(|| format!("Invalid {} override. Use HH:MM format", key))?;
            }
        }
    }

    Ok(())
}

struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    /// Render with comments aligned one space after the longest setting.
    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}
