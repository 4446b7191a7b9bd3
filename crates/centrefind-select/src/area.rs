//! Area classification for presentation.
//!
//! Decides whether a geocoded query sits in a city, a town or the
//! countryside so the caller can pick a sensible map radius. Classification
//! never changes which facilities are selected.

use std::path::Path;

use centrefind_core::ConfigError;
use serde::{Deserialize, Serialize};

/// Address components returned alongside a geocoded coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodedComponents {
    pub city: String,
    pub county: String,
    pub region: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Urban,
    Suburban,
    Rural,
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AreaType::Urban => write!(f, "urban"),
            AreaType::Suburban => write!(f, "suburban"),
            AreaType::Rural => write!(f, "rural"),
        }
    }
}

pub trait AreaClassifier: Send + Sync {
    fn classify_area(&self, components: &GeocodedComponents) -> AreaType;

    /// Map radius to draw around the query for an area type, if configured.
    fn map_radius_miles(&self, _area: AreaType) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaRule {
    pub area: AreaType,
    pub radius_miles: f64,
    /// City, county or region names matched case-insensitively.
    #[serde(default)]
    pub places: Vec<String>,
    /// Postal code prefixes, matched case-insensitively.
    #[serde(default)]
    pub postal_prefixes: Vec<String>,
}

impl AreaRule {
    fn matches(&self, components: &GeocodedComponents) -> bool {
        let named = [&components.city, &components.county, &components.region]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .any(|s| self.places.iter().any(|p| p.trim().eq_ignore_ascii_case(s)));
        if named {
            return true;
        }
        let postal = components.postal_code.trim().to_ascii_uppercase();
        !postal.is_empty()
            && self
                .postal_prefixes
                .iter()
                .any(|p| postal.starts_with(&p.trim().to_ascii_uppercase()))
    }
}

/// Rule table loaded from YAML. The first matching rule wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAreaClassifier {
    pub areas: Vec<AreaRule>,
    pub default_area: AreaType,
    pub default_radius_miles: f64,
}

impl TableAreaClassifier {
    /// Load and validate a classifier table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if a
    /// radius is not a positive finite number.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::YamlParse { source, .. } => ConfigError::YamlParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate a classifier table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on parse failure or an invalid radius.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::YamlParse {
            path: "<inline>".to_string(),
            source: e,
        })?;
        let radii = table
            .areas
            .iter()
            .map(|r| r.radius_miles)
            .chain(std::iter::once(table.default_radius_miles));
        for radius in radii {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "area radius must be a positive number of miles, got {radius}"
                )));
            }
        }
        Ok(table)
    }
}

impl AreaClassifier for TableAreaClassifier {
    fn classify_area(&self, components: &GeocodedComponents) -> AreaType {
        self.areas
            .iter()
            .find(|rule| rule.matches(components))
            .map_or(self.default_area, |rule| rule.area)
    }

    fn map_radius_miles(&self, area: AreaType) -> Option<f64> {
        self.areas
            .iter()
            .find(|rule| rule.area == area)
            .map(|rule| rule.radius_miles)
            .or((area == self.default_area).then_some(self.default_radius_miles))
    }
}
