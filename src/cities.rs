//! Reference locations used to parameterize the timings query.
//!
//! The built-in list is a process-lifetime constant. Names that are not in
//! the list are looked up in the world city database shipped with the
//! `cities` crate, so any reasonably sized city can be queried by name.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

/// A built-in reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    /// Name as written in Arabic labels
    pub local_name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Built-in reference cities. The first entry is the default.
pub const REFERENCE_CITIES: &[City] = &[
    City {
        name: "Bechar",
        local_name: "بشار",
        latitude: 30.5102939,
        longitude: -2.8125926,
    },
    City {
        name: "Algiers",
        local_name: "الجزائر العاصمة",
        latitude: 36.7525,
        longitude: 3.04197,
    },
    City {
        name: "Oran",
        local_name: "وهران",
        latitude: 35.6971,
        longitude: -0.6359,
    },
    City {
        name: "Constantine",
        local_name: "قسنطينة",
        latitude: 36.365,
        longitude: 6.6147,
    },
];

pub fn default_city() -> &'static City {
    &REFERENCE_CITIES[0]
}

/// A resolved query location, either a reference city, a database city,
/// or raw coordinates from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&City> for Location {
    fn from(city: &City) -> Self {
        Location {
            name: city.name.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

impl Location {
    /// IANA timezone of the location's coordinates.
    pub fn timezone(&self) -> Tz {
        determine_timezone_from_coordinates(self.latitude, self.longitude)
    }

    /// Today's calendar date at the location.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone()).date_naive()
    }
}

/// Find a built-in reference city by English or Arabic name, ignoring case.
pub fn find_reference_city(name: &str) -> Option<&'static City> {
    let name = name.trim();
    REFERENCE_CITIES
        .iter()
        .find(|city| city.name.eq_ignore_ascii_case(name) || city.local_name == name)
}

/// Resolve a city name to a location.
///
/// Reference cities win; otherwise the first exact (case-insensitive) match
/// in the world city database is used.
///
/// # Returns
/// `None` if the name is unknown to both sources
pub fn resolve_city(name: &str) -> Option<Location> {
    if let Some(city) = find_reference_city(name) {
        return Some(city.into());
    }

    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }

    IntoIterator::into_iter(cities::all())
        .find(|city| city.city.trim().eq_ignore_ascii_case(wanted))
        .map(|city| Location {
            name: format!("{}, {}", city.city, city.country),
            latitude: city.latitude,
            longitude: city.longitude,
        })
}

/// Determine the timezone for a set of coordinates.
///
/// Uses the tzf-rs boundary data. Falls back to `TZ` or UTC when the name
/// returned by the finder is not known to chrono-tz.
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs takes (longitude, latitude)
    let tz_name = finder.get_tz_name(longitude, latitude);

    match tz_name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => match std::env::var("TZ") {
            Ok(tz_str) => tz_str.parse().unwrap_or(Tz::UTC),
            Err(_) => Tz::UTC,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_city_is_bechar() {
        let city = default_city();
        assert_eq!(city.name, "Bechar");
        assert_eq!(city.latitude, 30.5102939);
        assert_eq!(city.longitude, -2.8125926);
    }

    #[test]
    fn test_find_reference_city_by_either_name() {
        assert_eq!(find_reference_city("oran").unwrap().name, "Oran");
        assert_eq!(find_reference_city(" ALGIERS ").unwrap().name, "Algiers");
        assert_eq!(find_reference_city("قسنطينة").unwrap().name, "Constantine");
        assert!(find_reference_city("Atlantis").is_none());
    }

    #[test]
    fn test_resolve_city_prefers_reference_list() {
        let location = resolve_city("Constantine").unwrap();
        assert_eq!(location.name, "Constantine");
        assert_eq!(location.latitude, 36.365);
    }

    #[test]
    fn test_resolve_city_unknown_and_empty() {
        assert!(resolve_city("").is_none());
        assert!(resolve_city("Definitely Not A City 123").is_none());
    }

    #[test]
    fn test_inland_city_resolves_to_local_timezone() {
        let location = resolve_city("Constantine").unwrap();
        assert_eq!(location.timezone(), chrono_tz::Africa::Algiers);
    }
}
