//! Utility functions shared across the codebase.

use std::path::Path;

/// Render a path for log output, shortening the home directory to `~`.
pub fn path_for_display(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Format coordinates with hemisphere letters, e.g. `30.5103°N, 2.8126°W`.
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!(
        "{:.4}°{}, {:.4}°{}",
        latitude.abs(),
        if latitude >= 0.0 { "N" } else { "S" },
        longitude.abs(),
        if longitude >= 0.0 { "E" } else { "W" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_coordinates_hemispheres() {
        assert_eq!(
            format_coordinates(30.5102939, -2.8125926),
            "30.5103°N, 2.8126°W"
        );
        assert_eq!(format_coordinates(-33.8688, 151.2093), "33.8688°S, 151.2093°E");
    }

    #[test]
    fn test_path_for_display_outside_home() {
        let path = PathBuf::from("/definitely/not/home/lastthird.toml");
        if dirs::home_dir().is_some_and(|home| path.starts_with(home)) {
            return;
        }
        assert_eq!(path_for_display(&path), "/definitely/not/home/lastthird.toml");
    }

    #[test]
    fn test_path_for_display_inside_home() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("lastthird.toml");
            assert_eq!(path_for_display(&path), "~/.config/lastthird.toml");
        }
    }
}
