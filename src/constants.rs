//! Application constants and default values for lastthird.
//!
//! This module contains the configuration defaults, validation limits,
//! and operational constants used throughout the application.

// ═══ Time Arithmetic ═══

pub const MINUTES_PER_DAY: i64 = 1440;

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_API_URL: &str = "https://api.aladhan.com/v1";
pub const DEFAULT_METHOD: u8 = 3; // Muslim World League
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_LANGUAGE: &str = "en";

// ═══ Validation Limits ═══

pub const MINIMUM_METHOD: u8 = 0;
pub const MAXIMUM_METHOD: u8 = 23; // Highest calculation method id known to the API

pub const MINIMUM_TIMEOUT_SECS: u64 = 1;
pub const MAXIMUM_TIMEOUT_SECS: u64 = 60;

pub const MAXIMUM_RETRIES: u32 = 5;
pub const MAXIMUM_RETRY_DELAY_MS: u64 = 10_000;

// ═══ Config File Layout ═══

pub const CONFIG_DIR_NAME: &str = "lastthird";
pub const CONFIG_FILE_NAME: &str = "lastthird.toml";

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure

// ═══ Test Constants ═══
#[cfg(test)]
pub mod test_constants {
    pub const TEST_MAGHRIB: &str = "18:00";
    pub const TEST_FAJR: &str = "05:00";
    pub const TEST_BOUNDARY: &str = "01:20";
}
