//! Persistent tool settings

use crate::anchor::Anchor;
use crate::color::{self, Color};
use crate::geom::{FaceFinderOptions, FaceTolerances, SurfaceDirection};
use crate::util::{Result, DECIMAL_PLACES, TOLERANCE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tolerances and defaults shared by the cuboid, boxy and face tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Cuboid inference
    pub tolerance: f64,
    pub decimal_places: u32,
    pub orthogonality_tolerance: f64,
    pub max_corner_candidates: usize,
    pub rotation_match_tolerance: f64, // degrees
    pub inherit_rotation: bool,
    pub inherit_scale: bool,

    // Boxy
    pub pivot_detection_tolerance: f64,
    pub default_size: f64,
    pub default_color: Color,
    pub default_pivot: Anchor,

    // Face validation
    pub coplanar_tolerance: f64,
    pub angle_tolerance: f64, // degrees
    pub dimension_tolerance: f64,
    pub normal_tolerance: f64,
    pub parallelism_tolerance: f64,
    pub face_search_tolerance: f64,
    pub surface_direction: SurfaceDirection,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            decimal_places: DECIMAL_PLACES,
            orthogonality_tolerance: 1e-3,
            max_corner_candidates: 6,
            rotation_match_tolerance: 1.0,
            inherit_rotation: true,
            inherit_scale: false,
            pivot_detection_tolerance: 0.01,
            default_size: 100.0,
            default_color: color::DEEP_GREEN,
            default_pivot: Anchor::F2,
            coplanar_tolerance: 1e-4,
            angle_tolerance: 1.0,
            dimension_tolerance: 1e-3,
            normal_tolerance: 0.98,
            parallelism_tolerance: 0.98,
            face_search_tolerance: 0.1,
            surface_direction: SurfaceDirection::Convex,
        }
    }
}

impl Settings {
    /// Get settings file path
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("boxy");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from the user config dir, falling back to defaults
    pub fn load() -> Self {
        let settings: Self = Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        settings.sanitized()
    }

    /// Load settings from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        Ok(settings.sanitized())
    }

    /// Save settings to the user config dir
    pub fn save(&self) -> Result<()> {
        match Self::path() {
            Some(path) => self.save_to(path),
            None => Err(crate::util::Error::other("no config directory")),
        }
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Clamp values that would break the algorithms back to defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        self.tolerance = positive(self.tolerance, defaults.tolerance);
        self.orthogonality_tolerance = positive(self.orthogonality_tolerance, defaults.orthogonality_tolerance);
        self.rotation_match_tolerance = positive(self.rotation_match_tolerance, defaults.rotation_match_tolerance);
        self.pivot_detection_tolerance = positive(self.pivot_detection_tolerance, defaults.pivot_detection_tolerance);
        self.default_size = positive(self.default_size, defaults.default_size);
        self.coplanar_tolerance = positive(self.coplanar_tolerance, defaults.coplanar_tolerance);
        self.angle_tolerance = positive(self.angle_tolerance, defaults.angle_tolerance);
        self.dimension_tolerance = positive(self.dimension_tolerance, defaults.dimension_tolerance);
        self.face_search_tolerance = positive(self.face_search_tolerance, defaults.face_search_tolerance);
        // Corner search needs at least 3 neighbours to form edge triples
        self.max_corner_candidates = self.max_corner_candidates.clamp(3, 7);
        self.decimal_places = self.decimal_places.min(12);
        if !(0.0..=1.0).contains(&self.normal_tolerance) {
            self.normal_tolerance = defaults.normal_tolerance;
        }
        if !(0.0..=1.0).contains(&self.parallelism_tolerance) {
            self.parallelism_tolerance = defaults.parallelism_tolerance;
        }
        self
    }

    pub fn face_tolerances(&self) -> FaceTolerances {
        FaceTolerances {
            coplanar: self.coplanar_tolerance,
            angle: self.angle_tolerance,
            dimension: self.dimension_tolerance,
            normal: self.normal_tolerance,
            parallelism: self.parallelism_tolerance,
        }
    }

    pub fn face_finder_options(&self) -> FaceFinderOptions {
        FaceFinderOptions {
            direction: self.surface_direction,
            search_tolerance: self.face_search_tolerance,
            tolerances: self.face_tolerances(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = Settings::default();
        settings.default_pivot = Anchor::E3;
        settings.surface_direction = SurfaceDirection::Concave;
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "default_size": 2.5, "default_pivot": "v7" }"#).unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.default_size, 2.5);
        assert_eq!(settings.default_pivot, Anchor::V7);
        assert_eq!(settings.tolerance, TOLERANCE);
    }

    #[test]
    fn test_sanitize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "tolerance": -1.0, "max_corner_candidates": 1, "normal_tolerance": 4.0 }"#)
            .unwrap();
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.tolerance, TOLERANCE);
        assert_eq!(settings.max_corner_candidates, 3);
        assert_eq!(settings.normal_tolerance, 0.98);
    }

    #[test]
    fn test_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Settings::load_from(&path), Err(crate::util::Error::Json(_))));
        assert!(matches!(Settings::load_from(dir.path().join("missing.json")), Err(crate::util::Error::Io(_))));
    }
}
