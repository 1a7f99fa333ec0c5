//! The field accessor.
//!
//! A [`DataArray`] is a lazy handle to one field of a dataset. Nothing is
//! read until values are requested; level and spatial selections refine
//! the handle and compose. Materialized values follow the index order
//! `time, z, y, x`, with the time axis present only for a series.

use std::ops::RangeInclusive;

use amr_common::axis::dim_names;
use amr_common::{AmrError, Axis, DenseArray, Result, Selector};

use crate::dataset::{Dataset, FieldKind};

/// Physical bounds for a spatial selection, per axis.
///
/// Unset axes are unconstrained. Bounds are closed intervals over cell
/// centers: a cell is selected when its center lies inside the interval.
///
/// ```
/// # use xamr::SpatialBounds;
/// let bounds = SpatialBounds::new().x(0.0..=0.5).y(0.25..=0.75);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialBounds {
    ranges: [Option<(f64, f64)>; 3],
}

impl SpatialBounds {
    /// Unconstrained bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain the x axis.
    pub fn x(self, range: RangeInclusive<f64>) -> Self {
        self.with_axis(Axis::X, range)
    }

    /// Constrain the y axis.
    pub fn y(self, range: RangeInclusive<f64>) -> Self {
        self.with_axis(Axis::Y, range)
    }

    /// Constrain the z axis.
    pub fn z(self, range: RangeInclusive<f64>) -> Self {
        self.with_axis(Axis::Z, range)
    }

    /// Constrain one axis.
    pub fn with_axis(mut self, axis: Axis, range: RangeInclusive<f64>) -> Self {
        self.ranges[axis.coord_position()] = Some((*range.start(), *range.end()));
        self
    }

    /// The constraint on one axis, if any.
    pub fn axis_range(&self, axis: Axis) -> Option<(f64, f64)> {
        self.ranges[axis.coord_position()]
    }

    /// Overlay `other` on top of `self`: axes constrained in `other`
    /// replace this selection's constraint on that axis.
    fn overlaid(&self, other: &SpatialBounds) -> SpatialBounds {
        let mut merged = self.clone();
        for (slot, incoming) in merged.ranges.iter_mut().zip(&other.ranges) {
            if incoming.is_some() {
                *slot = *incoming;
            }
        }
        merged
    }
}

/// A lazy handle to one field of a [`Dataset`].
///
/// Cheap to clone; selections return refined handles without touching
/// data. Values materialize at the coarsest level unless a level was
/// selected.
#[derive(Clone)]
pub struct DataArray<'a> {
    dataset: &'a Dataset,
    name: String,
    kind: FieldKind,
    levels: Option<Vec<usize>>,
    bounds: Option<SpatialBounds>,
}

impl<'a> DataArray<'a> {
    pub(crate) fn new(dataset: &'a Dataset, name: String, kind: FieldKind) -> Self {
        Self {
            dataset,
            name,
            kind,
            levels: None,
            bounds: None,
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension names of materialized values, e.g. `["time", "z", "y", "x"]`.
    pub fn dims(&self) -> Vec<&'static str> {
        dim_names(self.dataset.dimensionality(), self.dataset.is_series())
    }

    /// Restrict the handle to specific refinement levels.
    ///
    /// Every level is validated against the dataset's common maximum.
    /// Selecting a single level changes the resolution values materialize
    /// at; selecting several defers the choice to [`values_by_level`](Self::values_by_level),
    /// and plain value access then fails with `AmbiguousLevelSelection`.
    pub fn level_select(&self, levels: &[usize]) -> Result<DataArray<'a>> {
        if levels.is_empty() {
            return Err(AmrError::index("empty level selection"));
        }
        for &level in levels {
            self.dataset.check_level(level)?;
        }
        Ok(Self {
            levels: Some(levels.to_vec()),
            ..self.clone()
        })
    }

    /// Restrict the handle to a physical region.
    ///
    /// Bounds are closed intervals over cell centers. Axes constrained
    /// here replace any earlier constraint on the same axis; other axes
    /// keep theirs. A z constraint on a 2-D dataset fails with
    /// `InvalidDirection`.
    pub fn spatial_select(&self, bounds: SpatialBounds) -> Result<DataArray<'a>> {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if bounds.axis_range(axis).is_some() {
                axis.index_position(self.dataset.dimensionality())?;
            }
        }
        let merged = match &self.bounds {
            Some(existing) => existing.overlaid(&bounds),
            None => bounds,
        };
        Ok(Self {
            bounds: Some(merged),
            ..self.clone()
        })
    }

    /// The single level plain value access materializes at: the coarsest
    /// level by default, the selected level after a single-level
    /// `level_select`. A multi-level selection fails with
    /// `AmbiguousLevelSelection`.
    pub fn effective_level(&self) -> Result<usize> {
        match self.levels.as_deref() {
            None => Ok(0),
            Some([level]) => Ok(*level),
            Some(levels) => Err(AmrError::AmbiguousLevelSelection {
                selected: levels.len(),
            }),
        }
    }

    /// Materialize the full values at the effective level.
    ///
    /// For a series the result gains a leading time axis; a single
    /// snapshot yields the bare spatial array.
    pub fn values(&self) -> Result<DenseArray> {
        self.values_at(self.effective_level()?)
    }

    /// Materialize the full values at an explicit level.
    pub fn values_at(&self, level: usize) -> Result<DenseArray> {
        self.dataset.check_level(level)?;
        let crop = self.crop_selectors(level)?;

        let mut parts = Vec::with_capacity(self.dataset.n_timesteps());
        for idx in 0..self.dataset.n_timesteps() {
            let full = self
                .dataset
                .materialize(idx, &self.name, &self.kind, level)?;
            parts.push(match &crop {
                Some(selectors) => full.slice(selectors)?,
                None => (*full).clone(),
            });
        }

        if self.dataset.is_series() {
            DenseArray::stack(&parts.iter().collect::<Vec<_>>())
        } else {
            Ok(parts.remove(0))
        }
    }

    /// Materialize values at every selected level (all levels when none
    /// were selected), as `(level, values)` pairs.
    pub fn values_by_level(&self) -> Result<Vec<(usize, DenseArray)>> {
        let levels = match &self.levels {
            Some(levels) => levels.clone(),
            None => self.dataset.levels(),
        };
        levels
            .into_iter()
            .map(|level| Ok((level, self.values_at(level)?)))
            .collect()
    }

    /// Shape of materialized values at the effective level, without
    /// materializing them.
    pub fn shape(&self) -> Result<Vec<usize>> {
        let level = self.effective_level()?;
        let spatial = self.cropped_shape(level)?;
        let mut shape = Vec::with_capacity(spatial.len() + 1);
        if self.dataset.is_series() {
            shape.push(self.dataset.n_timesteps());
        }
        shape.extend(spatial);
        Ok(shape)
    }

    /// Numpy-style indexing over the materialized values.
    ///
    /// Selector arity must match the logical rank, including the time
    /// axis for a series. Integer selectors drop their axis.
    pub fn get(&self, selectors: &[Selector]) -> Result<DenseArray> {
        self.values()?.slice(selectors)
    }

    /// Index down to a single value. Fails unless every axis gets an
    /// integer selector.
    pub fn get_scalar(&self, selectors: &[Selector]) -> Result<f64> {
        self.get(selectors)?
            .scalar()
            .ok_or_else(|| AmrError::index("selection is not a single value"))
    }

    /// Minimum over the selection.
    pub fn min(&self) -> Result<f64> {
        self.reduce(DenseArray::min)
    }

    /// Maximum over the selection.
    pub fn max(&self) -> Result<f64> {
        self.reduce(DenseArray::max)
    }

    /// Arithmetic mean over the selection.
    pub fn mean(&self) -> Result<f64> {
        self.reduce(DenseArray::mean)
    }

    fn reduce(&self, f: impl Fn(&DenseArray) -> Option<f64>) -> Result<f64> {
        let values = self.values()?;
        f(&values).ok_or_else(|| AmrError::index("reduction over an empty selection"))
    }

    /// Index windows implied by the spatial bounds at `level`, in array
    /// index order. `None` when no spatial selection is active.
    fn crop_selectors(&self, level: usize) -> Result<Option<Vec<Selector>>> {
        let Some(bounds) = &self.bounds else {
            return Ok(None);
        };
        let hierarchy = self.dataset.snapshots()[0].hierarchy();
        let centers = hierarchy.coordinate_arrays(level)?;
        let dimensionality = self.dataset.dimensionality();

        let mut selectors = vec![Selector::all(); dimensionality];
        for (&axis, centers) in Axis::all(dimensionality).iter().zip(&centers) {
            if let Some((lo, hi)) = bounds.axis_range(axis) {
                // Closed-interval containment over ascending cell centers.
                let start = centers.partition_point(|&c| c < lo);
                let end = centers.partition_point(|&c| c <= hi);
                selectors[axis.index_position(dimensionality)?] = Selector::Span {
                    start: Some(start),
                    end: Some(end),
                };
            }
        }
        Ok(Some(selectors))
    }

    fn cropped_shape(&self, level: usize) -> Result<Vec<usize>> {
        let hierarchy = self.dataset.snapshots()[0].hierarchy();
        let mut shape = hierarchy.level_shape(level)?;
        if let Some(selectors) = self.crop_selectors(level)? {
            for (dim, sel) in shape.iter_mut().zip(&selectors) {
                *dim = sel.resolve(*dim, 0)?.len;
            }
        }
        Ok(shape)
    }
}

impl std::fmt::Debug for DataArray<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataArray")
            .field("name", &self.name)
            .field("levels", &self.levels)
            .field("bounds", &self.bounds)
            .finish()
    }
}
