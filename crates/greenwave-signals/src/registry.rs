//! Static intersection metadata and seed loading.
//!
//! The registry is the immutable half of a signal: name, coordinates, and
//! the starting vehicle load. The store mints identifiers and builds live
//! [`SignalState`](greenwave_types::SignalState) values from these seeds at
//! startup. Operators can point the engine at a JSON seed file; without one
//! the built-in downtown set is used, so the simulated state is always
//! reconstructible from static data.

use std::path::Path;

use greenwave_types::GeoPoint;
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading registry seed data.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to read the seed file from disk.
    #[error("failed to read seed file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the seed JSON.
    #[error("failed to parse seed JSON: {source}")]
    Parse {
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The seed data contained no intersections.
    #[error("seed data contains no intersections")]
    Empty,
}

impl From<serde_json::Error> for RegistryError {
    fn from(source: serde_json::Error) -> Self {
        Self::Parse { source }
    }
}

/// Immutable metadata for one signalized intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSeed {
    /// Human-readable intersection name.
    pub name: String,
    /// Intersection coordinates.
    pub location: GeoPoint,
    /// Vehicles queued when the simulation starts.
    #[serde(default)]
    pub initial_vehicles: u32,
}

impl SignalSeed {
    /// Create a seed from a name, coordinates, and starting load.
    fn new(name: &str, lat: f64, lng: f64, initial_vehicles: u32) -> Self {
        Self {
            name: String::from(name),
            location: GeoPoint::new(lat, lng),
            initial_vehicles,
        }
    }
}

/// The built-in seed set: eight downtown San Francisco intersections.
///
/// Used when no seed file is configured. Starting loads are spread across
/// the congestion buckets so the first broadcast already shows variety.
pub fn default_seeds() -> Vec<SignalSeed> {
    vec![
        SignalSeed::new("Market St / Van Ness Ave", 37.7752, -122.4193, 110),
        SignalSeed::new("Market St / Castro St", 37.7626, -122.4350, 45),
        SignalSeed::new("Mission St / 16th St", 37.7650, -122.4194, 85),
        SignalSeed::new("Van Ness Ave / Geary Blvd", 37.7852, -122.4213, 140),
        SignalSeed::new("Lombard St / Divisadero St", 37.7994, -122.4429, 30),
        SignalSeed::new("19th Ave / Lincoln Way", 37.7651, -122.4774, 60),
        SignalSeed::new("Embarcadero / Broadway", 37.7990, -122.3977, 25),
        SignalSeed::new("Geary Blvd / Masonic Ave", 37.7816, -122.4470, 95),
    ]
}

/// Parse seed data from a JSON string.
///
/// # Errors
///
/// Returns [`RegistryError::Parse`] on malformed JSON and
/// [`RegistryError::Empty`] when the array parses but holds no entries.
pub fn parse_seeds(json: &str) -> Result<Vec<SignalSeed>, RegistryError> {
    let seeds: Vec<SignalSeed> = serde_json::from_str(json)?;
    if seeds.is_empty() {
        return Err(RegistryError::Empty);
    }
    Ok(seeds)
}

/// Load seed data from a JSON file.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the file cannot be read, plus the
/// [`parse_seeds`] error conditions.
pub fn load_seeds(path: &Path) -> Result<Vec<SignalSeed>, RegistryError> {
    let contents = std::fs::read_to_string(path)?;
    parse_seeds(&contents)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_seeds_are_well_formed() {
        let seeds = default_seeds();
        assert_eq!(seeds.len(), 8);
        for seed in &seeds {
            assert!(!seed.name.is_empty());
            assert!(seed.location.lat > 37.0 && seed.location.lat < 38.0);
            assert!(seed.location.lng < -122.0 && seed.location.lng > -123.0);
        }
    }

    #[test]
    fn default_seed_names_are_unique() {
        let seeds = default_seeds();
        let mut names: Vec<&str> = seeds.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), seeds.len());
    }

    #[test]
    fn parse_valid_seed_json() {
        let json = r#"[
            {"name": "A St / B St", "location": {"lat": 37.77, "lng": -122.42}, "initial_vehicles": 40},
            {"name": "C St / D St", "location": {"lat": 37.78, "lng": -122.41}}
        ]"#;
        let seeds = parse_seeds(json).unwrap();
        assert_eq!(seeds.len(), 2);
        assert_eq!(seeds.first().map(|s| s.initial_vehicles), Some(40));
        // Missing initial_vehicles defaults to zero.
        assert_eq!(seeds.get(1).map(|s| s.initial_vehicles), Some(0));
    }

    #[test]
    fn parse_rejects_empty_array() {
        let result = parse_seeds("[]");
        assert!(matches!(result, Err(RegistryError::Empty)));
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let result = parse_seeds("{not json");
        assert!(matches!(result, Err(RegistryError::Parse { .. })));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = load_seeds(Path::new("/nonexistent/greenwave-seeds.json"));
        assert!(matches!(result, Err(RegistryError::Io { .. })));
    }
}
