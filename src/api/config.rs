use crate::api::bounds::BoundingBox;
use crate::api::features::{FeatureName, FeatureSets};
use crate::api::ingest::FeatureSource;
use crate::api::palette::Palette;
use crate::api::policy::CategoryPolicy;
use crate::core::constants::DEFAULT_CELL_SIZE;
use crate::core::grid::validate_cell_size;
use crate::util::error::ProxigridError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn default_cell_size() -> f64 {
    DEFAULT_CELL_SIZE
}

fn default_true() -> bool {
    true
}

/// Everything a classification run needs besides the feature data.
///
/// Every tunable is an explicit field: the region, the cell size, one
/// tolerance per feature, the category policy and the band prefilter
/// toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub bounds: BoundingBox,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    /// Tolerance window per feature, in degrees
    #[serde(default)]
    pub tolerances: BTreeMap<FeatureName, f64>,
    pub policy: CategoryPolicy,
    /// Narrow each collection to a latitude band per row before the
    /// per-cell tests. Does not change the result.
    #[serde(default = "default_true")]
    pub band_prefilter: bool,
}

impl ClassifierConfig {
    /// Config over the default London box with 0.005 degree cells.
    pub fn new(policy: CategoryPolicy) -> Self {
        Self {
            bounds: BoundingBox::default(),
            cell_size: DEFAULT_CELL_SIZE,
            tolerances: BTreeMap::new(),
            policy,
            band_prefilter: true,
        }
    }

    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::new()
    }

    pub fn tolerance(&self, feature: &str) -> Option<f64> {
        self.tolerances.get(feature).copied()
    }

    /// Checks the region, the cell size and every configured tolerance.
    ///
    /// Whether each feature the policy reads has a tolerance is checked when
    /// a classifier is built, together with the presence of its data.
    pub fn validate(&self) -> Result<(), ProxigridError> {
        self.bounds.validate()?;
        validate_cell_size(self.cell_size)?;
        for (name, tolerance) in &self.tolerances {
            if !tolerance.is_finite() || *tolerance <= 0.0 {
                return Err(ProxigridError::InvalidConfiguration(format!(
                    "tolerance for feature '{}' must be positive, got {}",
                    name, tolerance
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassifierConfigBuilder {
    bounds: Option<BoundingBox>,
    cell_size: Option<f64>,
    tolerances: BTreeMap<FeatureName, f64>,
    policy: Option<CategoryPolicy>,
    band_prefilter: Option<bool>,
}

impl ClassifierConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    pub fn tolerance(mut self, feature: impl Into<FeatureName>, tolerance: f64) -> Self {
        self.tolerances.insert(feature.into(), tolerance);
        self
    }

    pub fn policy(mut self, policy: CategoryPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn band_prefilter(mut self, enabled: bool) -> Self {
        self.band_prefilter = Some(enabled);
        self
    }

    pub fn build(self) -> Result<ClassifierConfig, ProxigridError> {
        let policy = self.policy.ok_or_else(|| {
            ProxigridError::InvalidConfiguration("a category policy must be set".to_string())
        })?;
        let config = ClassifierConfig {
            bounds: self.bounds.unwrap_or_default(),
            cell_size: self.cell_size.unwrap_or(DEFAULT_CELL_SIZE),
            tolerances: self.tolerances,
            policy,
            band_prefilter: self.band_prefilter.unwrap_or(true),
        };
        config.validate()?;
        Ok(config)
    }
}

/// A complete run as described by a TOML file: the grid, the policy, and
/// one source per feature.
///
/// ```toml
/// cell_size = 0.005
///
/// [bounds]
/// south = 51.108
/// west = -1.228
/// north = 51.908
/// east = 0.472
///
/// [policy]
/// kind = "two_feature"
/// primary = "stations"
/// secondary = "rivers"
///
/// [features.stations]
/// path = "stations.geojson"
/// tolerance = 0.01
/// filters = [{ exclude = { key = "usage", value = "tourism" } }]
///
/// [features.rivers]
/// path = "rivers.csv"
/// tolerance = 0.005
///
/// [palette]
/// absent = "#bdbdbd"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub bounds: BoundingBox,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default = "default_true")]
    pub band_prefilter: bool,
    pub policy: CategoryPolicy,
    pub features: BTreeMap<FeatureName, FeatureSource>,
    /// Colour overrides layered on the default palette
    #[serde(default)]
    pub palette: Option<Palette>,
}

impl RunConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ProxigridError> {
        toml::from_str(s).map_err(|e| ProxigridError::ConfigError(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProxigridError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProxigridError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// The classifier half of the run, with tolerances taken from the
    /// feature sources.
    pub fn classifier_config(&self) -> Result<ClassifierConfig, ProxigridError> {
        let config = ClassifierConfig {
            bounds: self.bounds,
            cell_size: self.cell_size,
            tolerances: self
                .features
                .iter()
                .map(|(name, source)| (name.clone(), source.tolerance))
                .collect(),
            policy: self.policy.clone(),
            band_prefilter: self.band_prefilter,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads every configured source. Relative paths resolve against
    /// `base_dir`, normally the directory holding the config file.
    pub fn load_features(&self, base_dir: &Path) -> Result<FeatureSets, ProxigridError> {
        let mut sets = FeatureSets::new();
        for (name, source) in &self.features {
            let points = source.load(base_dir)?;
            log::info!("Feature '{}': {} points after filtering", name, points.len());
            sets.insert(name.clone(), points);
        }
        Ok(sets)
    }

    pub fn palette(&self) -> Palette {
        match &self.palette {
            Some(overrides) => Palette::default().merge(overrides),
            None => Palette::default(),
        }
    }
}
