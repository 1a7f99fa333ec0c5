//! In-memory hierarchy adapter.
//!
//! [`MemoryHierarchy`] models a uniformly-refined AMR hierarchy held
//! entirely in memory: every level covers the whole domain, with cell
//! counts scaled by `refine_by` per level. Fields are either supplied as
//! per-level arrays or evaluated from a function of the physical
//! cell-center coordinates.
//!
//! The native gradient operator is a second-order central difference with
//! one-sided stencils at the domain boundary. Read and gradient calls are
//! counted so the dataset layer's caching can be verified.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use amr_common::{AmrError, Axis, DenseArray, ReadStats, Result};

use crate::hierarchy::{AmrHierarchy, HierarchyProvider};

/// An in-memory, uniformly-refined AMR snapshot.
pub struct MemoryHierarchy {
    time: f64,
    domain_dimensions: Vec<usize>,
    origin: Vec<f64>,
    extent: Vec<f64>,
    refine_by: usize,
    max_level: usize,
    fields: BTreeMap<String, Vec<DenseArray>>,
    level_reads: AtomicU64,
    gradient_reads: AtomicU64,
}

impl MemoryHierarchy {
    /// Start building a hierarchy with level-0 cell counts in `x, y, z`
    /// order. The domain defaults to the unit box with `refine_by = 2`
    /// and no refined levels.
    pub fn builder(time: f64, domain_dimensions: &[usize]) -> MemoryHierarchyBuilder {
        MemoryHierarchyBuilder {
            time,
            domain_dimensions: domain_dimensions.to_vec(),
            origin: vec![0.0; domain_dimensions.len()],
            extent: vec![1.0; domain_dimensions.len()],
            refine_by: 2,
            max_level: 0,
            field_fns: Vec::new(),
            field_levels: Vec::new(),
        }
    }

    /// Cell spacing per axis (`x, y, z` order) at a level.
    fn spacing(&self, level: usize) -> Vec<f64> {
        let factor = self.refine_by.pow(level as u32) as f64;
        self.extent
            .iter()
            .zip(&self.domain_dimensions)
            .map(|(&ext, &n)| ext / (n as f64 * factor))
            .collect()
    }

    fn field_level(&self, field: &str, level: usize) -> Result<&DenseArray> {
        if level > self.max_level {
            return Err(AmrError::LevelNotAvailable {
                requested: level,
                max_level: self.max_level,
            });
        }
        let levels = self
            .fields
            .get(field)
            .ok_or_else(|| AmrError::field_not_found(field))?;
        levels
            .get(level)
            .ok_or_else(|| AmrError::read(format!("missing level {level} for field '{field}'")))
    }
}

impl AmrHierarchy for MemoryHierarchy {
    fn time(&self) -> f64 {
        self.time
    }

    fn max_level(&self) -> usize {
        self.max_level
    }

    fn dimensionality(&self) -> usize {
        self.domain_dimensions.len()
    }

    fn domain_dimensions(&self) -> &[usize] {
        &self.domain_dimensions
    }

    fn domain_bounds(&self) -> Vec<(f64, f64)> {
        self.origin
            .iter()
            .zip(&self.extent)
            .map(|(&o, &e)| (o, o + e))
            .collect()
    }

    fn level_shape(&self, level: usize) -> Result<Vec<usize>> {
        if level > self.max_level {
            return Err(AmrError::LevelNotAvailable {
                requested: level,
                max_level: self.max_level,
            });
        }
        let factor = self.refine_by.pow(level as u32);
        Ok(self
            .domain_dimensions
            .iter()
            .rev()
            .map(|&n| n * factor)
            .collect())
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    fn read_level(&self, level: usize, field: &str) -> Result<DenseArray> {
        self.level_reads.fetch_add(1, Ordering::Relaxed);
        let arr = self.field_level(field, level)?;
        tracing::debug!(field, level, cells = arr.len(), "read level data");
        Ok(arr.clone())
    }

    fn coordinate_arrays(&self, level: usize) -> Result<Vec<Vec<f64>>> {
        let shape = self.level_shape(level)?;
        let spacing = self.spacing(level);
        let dim = self.dimensionality();
        Ok((0..dim)
            .map(|p| {
                let n = shape[dim - 1 - p];
                let dx = spacing[p];
                let origin = self.origin[p];
                (0..n).map(|i| origin + (i as f64 + 0.5) * dx).collect()
            })
            .collect())
    }

    fn gradient(&self, field: &str, axis: Axis, level: usize) -> Result<DenseArray> {
        self.gradient_reads.fetch_add(1, Ordering::Relaxed);
        let arr_axis = axis.index_position(self.dimensionality())?;
        let arr = self.field_level(field, level)?;
        let dx = self.spacing(level)[axis.coord_position()];
        let shape = arr.shape().to_vec();
        let values = arr.values();

        let mut strides = vec![1usize; shape.len()];
        for a in (0..shape.len().saturating_sub(1)).rev() {
            strides[a] = strides[a + 1] * shape[a + 1];
        }
        let n = shape[arr_axis];
        let stride = strides[arr_axis];

        Ok(DenseArray::from_fn(shape.clone(), |idx| {
            if n < 2 {
                return 0.0;
            }
            let flat: usize = idx.iter().zip(&strides).map(|(&i, &s)| i * s).sum();
            let i = idx[arr_axis];
            if i == 0 {
                (values[flat + stride] - values[flat]) / dx
            } else if i == n - 1 {
                (values[flat] - values[flat - stride]) / dx
            } else {
                (values[flat + stride] - values[flat - stride]) / (2.0 * dx)
            }
        }))
    }

    fn read_stats(&self) -> ReadStats {
        ReadStats {
            level_reads: self.level_reads.load(Ordering::Relaxed),
            gradient_reads: self.gradient_reads.load(Ordering::Relaxed),
        }
    }
}

type FieldFn = Box<dyn Fn(&[f64]) -> f64>;

/// Builder for [`MemoryHierarchy`].
pub struct MemoryHierarchyBuilder {
    time: f64,
    domain_dimensions: Vec<usize>,
    origin: Vec<f64>,
    extent: Vec<f64>,
    refine_by: usize,
    max_level: usize,
    field_fns: Vec<(String, FieldFn)>,
    field_levels: Vec<(String, Vec<DenseArray>)>,
}

impl MemoryHierarchyBuilder {
    /// Physical lower domain edge per axis (`x, y, z` order).
    pub fn origin(mut self, origin: &[f64]) -> Self {
        self.origin = origin.to_vec();
        self
    }

    /// Physical domain extent per axis (`x, y, z` order).
    pub fn extent(mut self, extent: &[f64]) -> Self {
        self.extent = extent.to_vec();
        self
    }

    /// Refinement ratio between consecutive levels (default 2).
    pub fn refine_by(mut self, refine_by: usize) -> Self {
        self.refine_by = refine_by;
        self
    }

    /// Finest level to populate (default 0: coarsest only).
    pub fn max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Add a field evaluated from physical cell-center coordinates
    /// (`x, y, z` order) at every level.
    pub fn field_fn(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&[f64]) -> f64 + 'static,
    ) -> Self {
        self.field_fns.push((name.into(), Box::new(f)));
        self
    }

    /// Add a field from explicit per-level arrays (index-order shapes).
    pub fn field_levels(mut self, name: impl Into<String>, levels: Vec<DenseArray>) -> Self {
        self.field_levels.push((name.into(), levels));
        self
    }

    /// Validate and build the hierarchy.
    pub fn build(self) -> Result<MemoryHierarchy> {
        let dim = self.domain_dimensions.len();
        if !(2..=3).contains(&dim) {
            return Err(AmrError::load(format!(
                "memory hierarchy supports 2 or 3 dimensions, got {dim}"
            )));
        }
        if self.origin.len() != dim || self.extent.len() != dim {
            return Err(AmrError::load(
                "origin/extent length must match domain dimensionality",
            ));
        }
        if self.domain_dimensions.iter().any(|&n| n == 0)
            || self.extent.iter().any(|&e| e <= 0.0)
        {
            return Err(AmrError::load("domain cells and extent must be positive"));
        }
        if self.refine_by < 2 {
            return Err(AmrError::load("refine_by must be at least 2"));
        }

        let mut hierarchy = MemoryHierarchy {
            time: self.time,
            domain_dimensions: self.domain_dimensions,
            origin: self.origin,
            extent: self.extent,
            refine_by: self.refine_by,
            max_level: self.max_level,
            fields: BTreeMap::new(),
            level_reads: AtomicU64::new(0),
            gradient_reads: AtomicU64::new(0),
        };

        for (name, levels) in self.field_levels {
            if levels.len() != hierarchy.max_level + 1 {
                return Err(AmrError::load(format!(
                    "field '{name}' supplies {} levels, hierarchy has {}",
                    levels.len(),
                    hierarchy.max_level + 1
                )));
            }
            for (level, arr) in levels.iter().enumerate() {
                let expected = hierarchy.level_shape(level)?;
                if arr.shape() != expected.as_slice() {
                    return Err(AmrError::load(format!(
                        "field '{name}' level {level} has shape {:?}, expected {expected:?}",
                        arr.shape()
                    )));
                }
            }
            hierarchy.fields.insert(name, levels);
        }

        let dim = hierarchy.dimensionality();
        for (name, f) in self.field_fns {
            let mut levels = Vec::with_capacity(hierarchy.max_level + 1);
            for level in 0..=hierarchy.max_level {
                let shape = hierarchy.level_shape(level)?;
                let spacing = hierarchy.spacing(level);
                let origin = hierarchy.origin.clone();
                levels.push(DenseArray::from_fn(shape, |idx| {
                    // idx is in z,y,x order; coords go out in x,y,z order.
                    let coords: Vec<f64> = (0..dim)
                        .map(|p| origin[p] + (idx[dim - 1 - p] as f64 + 0.5) * spacing[p])
                        .collect();
                    f(&coords)
                }));
            }
            hierarchy.fields.insert(name, levels);
        }

        Ok(hierarchy)
    }
}

/// A registry of named in-memory hierarchies.
#[derive(Default)]
pub struct MemoryProvider {
    hierarchies: BTreeMap<String, Arc<MemoryHierarchy>>,
}

impl MemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hierarchy under a source name.
    pub fn insert(&mut self, name: impl Into<String>, hierarchy: MemoryHierarchy) {
        self.hierarchies.insert(name.into(), Arc::new(hierarchy));
    }

    /// Builder-style registration.
    pub fn with_hierarchy(mut self, name: impl Into<String>, hierarchy: MemoryHierarchy) -> Self {
        self.insert(name, hierarchy);
        self
    }
}

impl HierarchyProvider for MemoryProvider {
    fn open(&self, source: &str) -> Result<Arc<dyn AmrHierarchy>> {
        self.hierarchies
            .get(source)
            .cloned()
            .map(|h| h as Arc<dyn AmrHierarchy>)
            .ok_or_else(|| AmrError::load(format!("unknown source '{source}'")))
    }

    fn sources(&self) -> Vec<String> {
        self.hierarchies.keys().cloned().collect()
    }
}
