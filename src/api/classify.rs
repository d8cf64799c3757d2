use crate::api::cell::Cell;
use crate::api::config::ClassifierConfig;
use crate::api::features::{FeatureName, FeaturePoint, FeatureSets};
use crate::api::grid::Grid;
use crate::api::policy::{Category, CategoryPolicy};
use crate::core::band::band_filter;
use crate::core::proximity;
use crate::util::coord::Coordinate;
use crate::util::error::ProxigridError;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::iter::FusedIterator;

/// Whether any of `points` lies inside the tolerance window of `cell`.
///
/// The window is the cell's extent grown by `tolerance` on every side, with
/// inclusive lower and exclusive upper edges. It is a rectangle in degree
/// space, not a geodesic radius.
///
/// # Example
/// ```
/// use proxigrid::{Cell, FeaturePoint, is_near};
///
/// let cell = Cell::new(0, 0, 0.0, 0.0, 0.005);
/// let stations = vec![FeaturePoint::new(0.0025, 0.0025)];
/// assert!(is_near(&stations, &cell, 0.005));
/// ```
pub fn is_near<P: Coordinate>(points: &[P], cell: &Cell, tolerance: f64) -> bool {
    proximity::is_near(points, cell.south, cell.west, tolerance, cell.size)
}

/// Classifies one cell against the full feature collections.
///
/// No band prefilter is applied. Fails with
/// [`ProxigridError::MissingFeatureData`] when the policy reads a collection
/// that `features` does not contain.
pub fn classify_cell(
    cell: &Cell,
    features: &FeatureSets,
    tolerances: &BTreeMap<FeatureName, f64>,
    policy: &CategoryPolicy,
) -> Result<Category, ProxigridError> {
    let layers = resolve_layers(features, tolerances, policy)?;
    let views: Vec<Narrowed<'_>> = layers.iter().map(|l| Narrowed::Full(l.points)).collect();
    Ok(evaluate_cell(cell, policy, &layers, &views))
}

/// Builds a classifier from `config` and runs it sequentially.
pub fn classify(
    config: &ClassifierConfig,
    features: &FeatureSets,
) -> Result<ClassifiedGrid, ProxigridError> {
    Ok(Classifier::new(config, features)?.run())
}

/// Builds a classifier from `config` and runs it across rows in parallel.
///
/// The result is identical to [`classify`], including order.
pub fn classify_parallel(
    config: &ClassifierConfig,
    features: &FeatureSets,
) -> Result<ClassifiedGrid, ProxigridError> {
    Ok(Classifier::new(config, features)?.run_parallel())
}

#[derive(Debug, Clone)]
struct Layer<'a> {
    name: FeatureName,
    points: &'a [FeaturePoint],
    tolerance: f64,
}

/// A feature collection as seen by one grid row.
enum Narrowed<'a> {
    Full(&'a [FeaturePoint]),
    Band(Vec<&'a FeaturePoint>),
}

impl Narrowed<'_> {
    fn is_near(&self, cell: &Cell, tolerance: f64) -> bool {
        match self {
            Narrowed::Full(points) => is_near(points, cell, tolerance),
            Narrowed::Band(points) => is_near(points, cell, tolerance),
        }
    }

    fn len(&self) -> usize {
        match self {
            Narrowed::Full(points) => points.len(),
            Narrowed::Band(points) => points.len(),
        }
    }
}

fn resolve_layers<'a>(
    features: &'a FeatureSets,
    tolerances: &BTreeMap<FeatureName, f64>,
    policy: &CategoryPolicy,
) -> Result<Vec<Layer<'a>>, ProxigridError> {
    let mut layers: Vec<Layer<'a>> = Vec::new();
    for name in policy.features() {
        if layers.iter().any(|l| &l.name == name) {
            continue;
        }
        let tolerance = *tolerances.get(name).ok_or_else(|| {
            ProxigridError::InvalidConfiguration(format!(
                "no tolerance configured for feature '{}'",
                name
            ))
        })?;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ProxigridError::InvalidConfiguration(format!(
                "tolerance for feature '{}' must be positive, got {}",
                name, tolerance
            )));
        }
        let points = features
            .get(name.as_str())
            .ok_or_else(|| ProxigridError::MissingFeatureData(name.to_string()))?;

        layers.push(Layer {
            name: name.clone(),
            points,
            tolerance,
        });
    }
    Ok(layers)
}

fn evaluate_cell(
    cell: &Cell,
    policy: &CategoryPolicy,
    layers: &[Layer<'_>],
    views: &[Narrowed<'_>],
) -> Category {
    policy.evaluate(|name| {
        layers
            .iter()
            .zip(views)
            .find(|(layer, _)| &layer.name == name)
            .is_some_and(|(layer, view)| view.is_near(cell, layer.tolerance))
    })
}

/// A cell paired with its category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedCell {
    pub cell: Cell,
    pub category: Category,
}

/// All classified cells of one grid row, west to east.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub row: usize,
    pub cells: Vec<ClassifiedCell>,
}

/// Grid classifier bound to one configuration and one set of feature
/// collections.
///
/// Construction validates everything up front: the grid, the tolerance of
/// every feature the policy reads, and the presence of each collection.
/// Classification itself cannot fail.
///
/// # Example
///
/// ```
/// use proxigrid::{BoundingBox, Category, CategoryPolicy, Classifier, ClassifierConfig, FeaturePoint, FeatureSets};
///
/// # fn main() -> Result<(), proxigrid::ProxigridError> {
/// let config = ClassifierConfig::builder()
///     .bounds(BoundingBox::new(0.0, 0.0, 0.01, 0.01))
///     .cell_size(0.005)
///     .tolerance("stations", 0.005)
///     .policy(CategoryPolicy::single("stations"))
///     .build()?;
/// let features = FeatureSets::new().with("stations", vec![FeaturePoint::new(0.0025, 0.0025)]);
///
/// let classifier = Classifier::new(&config, &features)?;
/// let result = classifier.run();
/// assert_eq!(result.get(0, 0), Some(Category::Good));
/// # Ok(())
/// # }
/// ```
pub struct Classifier<'a> {
    grid: Grid,
    policy: CategoryPolicy,
    layers: Vec<Layer<'a>>,
    band_prefilter: bool,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &ClassifierConfig, features: &'a FeatureSets) -> Result<Self, ProxigridError> {
        let grid = Grid::new(config.bounds, config.cell_size)?;
        let layers = resolve_layers(features, &config.tolerances, &config.policy)?;

        for layer in &layers {
            log::debug!(
                "Feature '{}': {} points, tolerance {}",
                layer.name,
                layer.points.len(),
                layer.tolerance
            );
        }
        for name in features.names() {
            if !layers.iter().any(|l| &l.name == name) {
                log::debug!("Feature '{}' is not read by the policy, ignoring", name);
            }
        }

        Ok(Self {
            grid,
            policy: config.policy.clone(),
            layers,
            band_prefilter: config.band_prefilter,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn policy(&self) -> &CategoryPolicy {
        &self.policy
    }

    /// Narrows every collection once for the row, then classifies each cell
    /// of the row against the narrowed views.
    pub fn classify_row(&self, row: usize) -> ClassifiedRow {
        let south = self.grid.row_latitude(row);
        let cell_size = self.grid.cell_size();

        let views: Vec<Narrowed<'a>> = self
            .layers
            .iter()
            .map(|layer| {
                if self.band_prefilter {
                    Narrowed::Band(band_filter(layer.points, south, layer.tolerance, cell_size))
                } else {
                    Narrowed::Full(layer.points)
                }
            })
            .collect();

        if log::log_enabled!(log::Level::Debug) {
            let sizes: Vec<String> = self
                .layers
                .iter()
                .zip(&views)
                .map(|(layer, view)| format!("{}={}", layer.name, view.len()))
                .collect();
            log::debug!("Row {} at {:.6}: {}", row, south, sizes.join(", "));
        }

        let cells = self
            .grid
            .row(row)
            .map(|cell| ClassifiedCell {
                category: evaluate_cell(&cell, &self.policy, &self.layers, &views),
                cell,
            })
            .collect();

        ClassifiedRow { row, cells }
    }

    /// Lazy stream of classified rows, south to north. Each call starts at
    /// the first row.
    pub fn rows(&self) -> ClassifiedRows<'_, 'a> {
        ClassifiedRows {
            classifier: self,
            next: 0,
        }
    }

    /// Classifies every cell, one row at a time.
    pub fn run(&self) -> ClassifiedGrid {
        let result = ClassifiedGrid::from_rows(self.grid, self.rows());
        log_summary(&result);
        result
    }

    /// Classifies rows on the rayon thread pool. Output order matches
    /// [`Classifier::run`].
    pub fn run_parallel(&self) -> ClassifiedGrid {
        let rows: Vec<ClassifiedRow> = (0..self.grid.rows())
            .into_par_iter()
            .map(|row| self.classify_row(row))
            .collect();
        let result = ClassifiedGrid::from_rows(self.grid, rows);
        log_summary(&result);
        result
    }
}

fn log_summary(result: &ClassifiedGrid) {
    let counts: Vec<String> = result
        .counts()
        .iter()
        .map(|(category, n)| format!("{}={}", category, n))
        .collect();
    log::info!("Classified {} cells: {}", result.len(), counts.join(", "));
}

/// Iterator returned by [`Classifier::rows`].
pub struct ClassifiedRows<'c, 'a> {
    classifier: &'c Classifier<'a>,
    next: usize,
}

impl Iterator for ClassifiedRows<'_, '_> {
    type Item = ClassifiedRow;

    fn next(&mut self) -> Option<ClassifiedRow> {
        if self.next >= self.classifier.grid.rows() {
            return None;
        }
        let row = self.classifier.classify_row(self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.classifier.grid.rows().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ClassifiedRows<'_, '_> {}

impl FusedIterator for ClassifiedRows<'_, '_> {}

/// The classification of a whole grid, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedGrid {
    grid: Grid,
    cells: Vec<ClassifiedCell>,
}

impl ClassifiedGrid {
    fn from_rows(grid: Grid, rows: impl IntoIterator<Item = ClassifiedRow>) -> Self {
        let mut cells = Vec::with_capacity(grid.len());
        for row in rows {
            cells.extend(row.cells);
        }
        Self { grid, cells }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[ClassifiedCell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedCell> {
        self.cells.iter()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Category> {
        if row >= self.grid.rows() || col >= self.grid.cols() {
            return None;
        }
        self.cells
            .get(row * self.grid.cols() + col)
            .map(|c| c.category)
    }

    /// Category of the cell containing a coordinate.
    pub fn category_at<C: Coordinate>(&self, coord: &C) -> Option<Category> {
        let cell = self.grid.cell_at(coord)?;
        self.get(cell.row, cell.col)
    }

    /// Categories as `rows x cols`, row 0 being the southernmost.
    pub fn to_matrix(&self) -> Vec<Vec<Category>> {
        let cols = self.grid.cols().max(1);
        self.cells
            .chunks(cols)
            .map(|row| row.iter().map(|c| c.category).collect())
            .collect()
    }

    /// Number of cells per category, omitting categories with no cells.
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for cell in &self.cells {
            *counts.entry(cell.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn with_category(&self, category: Category) -> Vec<&ClassifiedCell> {
        self.cells
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }
}

impl<'g> IntoIterator for &'g ClassifiedGrid {
    type Item = &'g ClassifiedCell;
    type IntoIter = std::slice::Iter<'g, ClassifiedCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
