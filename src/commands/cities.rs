//! Implementation of the --list-cities command.

use crate::cities::{City, REFERENCE_CITIES, default_city};
use crate::logger::Log;
use crate::utils::format_coordinates;

/// One listing line for a reference city.
pub fn city_line(city: &City) -> String {
    let marker = if city.name == default_city().name {
        " (default)"
    } else {
        ""
    };
    format!(
        "{:<12} {:<10} {}{}",
        city.name,
        city.local_name,
        format_coordinates(city.latitude, city.longitude),
        marker
    )
}

/// Print the built-in reference cities.
pub fn handle_list_cities_command() {
    Log::log_version();
    Log::log_block_start("Reference cities:");
    for city in REFERENCE_CITIES {
        Log::log_indented(&city_line(city));
    }
    Log::log_block_start("Other names are looked up in the world city database");
    Log::log_indented("Pass any of them, or another city name, with --city <NAME>");
    Log::log_end();
}
