//! Capability traits for delegated hierarchy access.

use std::sync::Arc;

use amr_common::{Axis, DenseArray, ReadStats, Result};

/// One opened AMR snapshot.
///
/// Implementations adapt a concrete mesh-reading backend. The dataset
/// layer depends only on this surface: scalar metadata, dense covering
/// extraction per level, cell-center coordinates, and the backend's
/// native AMR-aware gradient.
///
/// Dense arrays use index order `z, y, x` (x varies fastest);
/// `domain_dimensions` and `coordinate_arrays` stay in `x, y, z` order.
pub trait AmrHierarchy: Send + Sync {
    /// Simulation time of this snapshot.
    fn time(&self) -> f64;

    /// Finest refinement level present (level 0 is the coarsest).
    fn max_level(&self) -> usize;

    /// Number of spatial dimensions (2 or 3).
    fn dimensionality(&self) -> usize;

    /// Cell counts of the level-0 grid, in `x, y, z` order.
    fn domain_dimensions(&self) -> &[usize];

    /// Physical lower/upper domain edges per axis, in `x, y, z` order.
    fn domain_bounds(&self) -> Vec<(f64, f64)>;

    /// Shape of the dense covering array at `level`, in index order.
    ///
    /// Fails with `LevelNotAvailable` for levels past [`max_level`](Self::max_level).
    fn level_shape(&self, level: usize) -> Result<Vec<usize>>;

    /// Names of the fields stored in this snapshot.
    fn field_names(&self) -> Vec<String>;

    /// Whether a stored field exists.
    fn has_field(&self, name: &str) -> bool {
        self.field_names().iter().any(|f| f == name)
    }

    /// Materialize a field as a dense covering array at `level`.
    fn read_level(&self, level: usize, field: &str) -> Result<DenseArray>;

    /// Cell-center coordinates per axis at `level`, in `x, y, z` order.
    fn coordinate_arrays(&self, level: usize) -> Result<Vec<Vec<f64>>>;

    /// The backend's native spatial derivative of `field` along `axis`,
    /// materialized as a dense covering array at `level`.
    fn gradient(&self, field: &str, axis: Axis, level: usize) -> Result<DenseArray>;

    /// Read/derivative call counters for cache verification.
    fn read_stats(&self) -> ReadStats;
}

/// Resolves source identifiers into opened hierarchies.
pub trait HierarchyProvider: Send + Sync {
    /// Open a single source.
    ///
    /// Fails with `Load` when the source does not exist or cannot be read.
    fn open(&self, source: &str) -> Result<Arc<dyn AmrHierarchy>>;

    /// All source identifiers this provider can open, sorted by name.
    ///
    /// Glob-style patterns are expanded against this list.
    fn sources(&self) -> Vec<String>;
}
