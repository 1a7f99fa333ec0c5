//! The dataset façade.
//!
//! A [`Dataset`] is an ordered sequence of snapshots, sorted ascending by
//! simulation time regardless of input order. It owns the field registry
//! (native fields intersected across snapshots plus registered derived
//! fields) and the materialization cache.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use amr_common::axis::dim_names;
use amr_common::{AmrError, Axis, CacheStats, DenseArray, Result};
use amr_reader::HierarchyProvider;

use crate::array::DataArray;
use crate::cache::{hash_field, LevelCache};
use crate::calc::{Calculations, DerivedOp};
use crate::config::DatasetConfig;
use crate::snapshot::Snapshot;
use crate::source::SourceSpec;

/// How a registered field is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Stored in every snapshot; read through the delegated reader.
    Native,
    /// Computed from native fields via a derived operation.
    Derived(DerivedOp),
}

/// Dataset attributes.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetAttrs {
    pub n_timesteps: usize,
    pub max_level: usize,
    pub dimensionality: usize,
    /// Level-0 cell counts in `x, y, z` order.
    pub domain_dimensions: Vec<usize>,
    /// Simulation times, ascending.
    pub times: Vec<f64>,
}

/// Coordinate arrays of one spatial axis at the coarsest level.
#[derive(Debug, Clone)]
pub struct AxisCoords {
    pub axis: Axis,
    /// Physical cell-center coordinates, ascending.
    pub centers: Vec<f64>,
    /// Physical lower/upper domain edge.
    pub range: (f64, f64),
}

/// Dataset coordinates: simulation times plus per-axis cell centers.
#[derive(Debug, Clone)]
pub struct Coords {
    /// Ascending simulation times; `None` for a single snapshot, where
    /// time is not exposed as an axis.
    pub time: Option<Vec<f64>>,
    /// Spatial axes in `x, y, z` order.
    pub axes: Vec<AxisCoords>,
}

/// An ordered collection of AMR snapshots with xarray-style access.
pub struct Dataset {
    snapshots: Vec<Snapshot>,
    dimensionality: usize,
    domain_dimensions: Vec<usize>,
    max_level: usize,
    fields: Mutex<BTreeMap<String, FieldKind>>,
    cache: Mutex<LevelCache>,
}

impl Dataset {
    /// Open a dataset from a source specification.
    ///
    /// Accepts a single identifier, a glob-style pattern, or an explicit
    /// list (see [`SourceSpec`]). All snapshots are opened eagerly; any
    /// failure aborts construction with a `Load` error. Snapshots are
    /// stable-sorted ascending by simulation time, so equal times keep
    /// their input order.
    pub fn open(spec: impl Into<SourceSpec>, provider: &dyn HierarchyProvider) -> Result<Self> {
        Self::open_with_config(spec, provider, DatasetConfig::default())
    }

    /// Open a dataset with explicit configuration.
    pub fn open_with_config(
        spec: impl Into<SourceSpec>,
        provider: &dyn HierarchyProvider,
        config: DatasetConfig,
    ) -> Result<Self> {
        let sources = spec.into().resolve(provider)?;
        let mut snapshots = sources
            .iter()
            .map(|source| Snapshot::open(source, provider))
            .collect::<Result<Vec<_>>>()?;
        snapshots.sort_by(|a, b| a.time().total_cmp(&b.time()));

        let (dimensionality, domain_dimensions) = {
            let first = snapshots
                .first()
                .ok_or_else(|| AmrError::load("no sources resolved"))?;
            (
                first.hierarchy().dimensionality(),
                first.hierarchy().domain_dimensions().to_vec(),
            )
        };
        for snap in &snapshots {
            if snap.hierarchy().dimensionality() != dimensionality
                || snap.hierarchy().domain_dimensions() != domain_dimensions.as_slice()
            {
                return Err(AmrError::load(format!(
                    "snapshot '{}' has a different domain than the first snapshot",
                    snap.source()
                )));
            }
        }

        let max_level = snapshots
            .iter()
            .map(Snapshot::max_level)
            .min()
            .unwrap_or(0);

        // A field is part of the dataset only if every snapshot has it.
        let mut names = snapshots[0].hierarchy().field_names();
        names.retain(|name| snapshots.iter().all(|s| s.hierarchy().has_field(name)));
        let fields: BTreeMap<String, FieldKind> = names
            .into_iter()
            .map(|name| (name, FieldKind::Native))
            .collect();

        tracing::debug!(
            n_timesteps = snapshots.len(),
            max_level,
            n_fields = fields.len(),
            "opened dataset"
        );

        Ok(Self {
            snapshots,
            dimensionality,
            domain_dimensions,
            max_level,
            fields: Mutex::new(fields),
            cache: Mutex::new(LevelCache::new(config.cache_memory_limit)),
        })
    }

    /// Number of snapshots (timesteps).
    pub fn n_timesteps(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the dataset is a time series (more than one snapshot).
    pub fn is_series(&self) -> bool {
        self.snapshots.len() > 1
    }

    /// Simulation times, ascending.
    pub fn times(&self) -> Vec<f64> {
        self.snapshots.iter().map(Snapshot::time).collect()
    }

    /// The loaded snapshots, in time order.
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Number of spatial dimensions.
    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Level-0 cell counts in `x, y, z` order.
    pub fn domain_dimensions(&self) -> &[usize] {
        &self.domain_dimensions
    }

    /// Finest level available in every snapshot.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Levels available in every snapshot: `0..=max_level`.
    pub fn levels(&self) -> Vec<usize> {
        (0..=self.max_level).collect()
    }

    /// Dimension names in index order, e.g. `["time", "z", "y", "x"]`.
    pub fn dims(&self) -> Vec<&'static str> {
        dim_names(self.dimensionality, self.is_series())
    }

    /// Dataset attributes.
    pub fn attrs(&self) -> DatasetAttrs {
        DatasetAttrs {
            n_timesteps: self.n_timesteps(),
            max_level: self.max_level,
            dimensionality: self.dimensionality,
            domain_dimensions: self.domain_dimensions.clone(),
            times: self.times(),
        }
    }

    /// Coordinate metadata at the coarsest level.
    pub fn coords(&self) -> Result<Coords> {
        let hierarchy = self.snapshots[0].hierarchy();
        let centers = hierarchy.coordinate_arrays(0)?;
        let bounds = hierarchy.domain_bounds();
        let axes = Axis::all(self.dimensionality)
            .iter()
            .zip(centers)
            .zip(bounds)
            .map(|((&axis, centers), range)| AxisCoords {
                axis,
                centers,
                range,
            })
            .collect();
        Ok(Coords {
            time: self.is_series().then(|| self.times()),
            axes,
        })
    }

    /// Registered field names, sorted.
    pub fn field_names(&self) -> Vec<String> {
        self.fields_lock().keys().cloned().collect()
    }

    /// Whether a field is registered.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields_lock().contains_key(name)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Result<DataArray<'_>> {
        let kind = self
            .fields_lock()
            .get(name)
            .cloned()
            .ok_or_else(|| AmrError::field_not_found(name))?;
        Ok(DataArray::new(self, name.to_string(), kind))
    }

    /// Derived-field calculations bound to this dataset.
    pub fn calc(&self) -> Calculations<'_> {
        Calculations::new(self)
    }

    /// Materialization cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache_lock().stats()
    }

    /// Drop all cached level data.
    pub fn clear_cache(&self) {
        self.cache_lock().clear()
    }

    pub(crate) fn check_level(&self, level: usize) -> Result<()> {
        if level > self.max_level {
            Err(AmrError::LevelNotAvailable {
                requested: level,
                max_level: self.max_level,
            })
        } else {
            Ok(())
        }
    }

    /// Materialize one snapshot's dense level array, going through the
    /// cache. The cache lock is held across the compute, so first-time
    /// materialization of a key happens exactly once even under
    /// concurrent access.
    pub(crate) fn materialize(
        &self,
        snapshot_idx: usize,
        field: &str,
        kind: &FieldKind,
        level: usize,
    ) -> Result<Arc<DenseArray>> {
        let key = (snapshot_idx, hash_field(field), level);
        let mut cache = self.cache_lock();
        if let Some(hit) = cache.get(&key) {
            return Ok(hit);
        }

        let snapshot = &self.snapshots[snapshot_idx];
        tracing::debug!(field, level, source = snapshot.source(), "materializing");
        let data = match kind {
            FieldKind::Native => snapshot.hierarchy().read_level(level, field)?,
            FieldKind::Derived(op) => self.compute_derived(snapshot, op, level)?,
        };
        let data = Arc::new(data);
        cache.insert(key, Arc::clone(&data));
        Ok(data)
    }

    fn compute_derived(
        &self,
        snapshot: &Snapshot,
        op: &DerivedOp,
        level: usize,
    ) -> Result<DenseArray> {
        let hierarchy = snapshot.hierarchy();
        match op {
            DerivedOp::Gradient { field, axis } => hierarchy.gradient(field, *axis, level),
            DerivedOp::Divergence { u, v, w } => {
                let mut div = hierarchy
                    .gradient(u, Axis::X, level)?
                    .zip_map(&hierarchy.gradient(v, Axis::Y, level)?, |a, b| a + b)?;
                if let Some(w) = w {
                    div = div.zip_map(&hierarchy.gradient(w, Axis::Z, level)?, |a, b| a + b)?;
                }
                Ok(div)
            }
            DerivedOp::Vorticity { u, v } => hierarchy
                .gradient(v, Axis::X, level)?
                .zip_map(&hierarchy.gradient(u, Axis::Y, level)?, |a, b| a - b),
        }
    }

    /// Register a derived field, or return the existing registration when
    /// the same operation was already requested. The synthesized name is
    /// deterministic in the operation and its arguments.
    pub(crate) fn register_derived(&self, op: DerivedOp) -> Result<String> {
        let name = op.name();
        let mut fields = self.fields_lock();

        for input in op.inputs() {
            match fields.get(input) {
                None => return Err(AmrError::field_not_found(input)),
                Some(FieldKind::Derived(_)) => {
                    return Err(AmrError::unsupported(format!(
                        "derivative of derived field '{input}' is not supported by the reader"
                    )))
                }
                Some(FieldKind::Native) => {}
            }
        }

        match fields.get(&name) {
            Some(FieldKind::Derived(existing)) if *existing == op => Ok(name),
            Some(_) => Err(AmrError::DerivedFieldConflict(name)),
            None => {
                tracing::debug!(field = %name, "registered derived field");
                fields.insert(name.clone(), FieldKind::Derived(op));
                Ok(name)
            }
        }
    }

    fn fields_lock(&self) -> MutexGuard<'_, BTreeMap<String, FieldKind>> {
        self.fields.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cache_lock(&self) -> MutexGuard<'_, LevelCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amr_reader::MemoryProvider;
    use test_utils::{series_provider_3d, snapshot_3d};

    #[test]
    fn test_open_single_snapshot() {
        let provider = MemoryProvider::new().with_hierarchy("plt00000", snapshot_3d(1.5));
        let ds = Dataset::open("plt00000", &provider).unwrap();

        assert_eq!(ds.n_timesteps(), 1);
        assert!(!ds.is_series());
        assert_eq!(ds.times(), vec![1.5]);
        assert_eq!(ds.max_level(), 2);
        assert_eq!(ds.levels(), vec![0, 1, 2]);
        assert_eq!(ds.dims(), vec!["z", "y", "x"]);
        assert!(ds.coords().unwrap().time.is_none());
    }

    #[test]
    fn test_open_sorts_by_time() {
        // Registration order plt00000 -> t=2.0, plt00010 -> t=0.5, plt00020 -> t=1.0
        let (provider, names) = series_provider_3d(&[2.0, 0.5, 1.0]);
        let ds = Dataset::open(names, &provider).unwrap();

        assert_eq!(ds.times(), vec![0.5, 1.0, 2.0]);
        let sources: Vec<&str> = ds.snapshots().iter().map(|s| s.source()).collect();
        assert_eq!(sources, vec!["plt00010", "plt00020", "plt00000"]);
        assert_eq!(ds.dims(), vec!["time", "z", "y", "x"]);
    }

    #[test]
    fn test_equal_times_keep_input_order() {
        let (provider, _) = series_provider_3d(&[1.0, 1.0, 0.0]);
        let ds = Dataset::open(vec!["plt00010", "plt00000", "plt00020"], &provider).unwrap();

        let sources: Vec<&str> = ds.snapshots().iter().map(|s| s.source()).collect();
        // plt00020 (t=0.0) first; the two t=1.0 snapshots keep list order.
        assert_eq!(sources, vec!["plt00020", "plt00010", "plt00000"]);
    }

    #[test]
    fn test_open_unknown_source() {
        let provider = MemoryProvider::new();
        assert!(matches!(
            Dataset::open("plt99999", &provider),
            Err(AmrError::Load(_))
        ));
    }

    #[test]
    fn test_field_lookup() {
        let provider = MemoryProvider::new().with_hierarchy("plt00000", snapshot_3d(0.0));
        let ds = Dataset::open("plt00000", &provider).unwrap();

        assert!(ds.field("temperature").is_ok());
        assert!(matches!(
            ds.field("entropy"),
            Err(AmrError::FieldNotFound(_))
        ));
        assert_eq!(
            ds.field_names(),
            vec!["density", "temperature", "u", "v", "w"]
        );
    }

    #[test]
    fn test_attrs_serialize() {
        let provider = MemoryProvider::new().with_hierarchy("plt00000", snapshot_3d(0.25));
        let ds = Dataset::open("plt00000", &provider).unwrap();

        let json = serde_json::to_value(ds.attrs()).unwrap();
        assert_eq!(json["n_timesteps"], 1);
        assert_eq!(json["max_level"], 2);
        assert_eq!(json["domain_dimensions"], serde_json::json!([8, 8, 8]));
    }

    #[test]
    fn test_check_level() {
        let provider = MemoryProvider::new().with_hierarchy("plt00000", snapshot_3d(0.0));
        let ds = Dataset::open("plt00000", &provider).unwrap();

        assert!(ds.check_level(2).is_ok());
        assert!(matches!(
            ds.check_level(3),
            Err(AmrError::LevelNotAvailable { requested: 3, max_level: 2 })
        ));
    }
}
