//! xarray-style access to AMReX AMR simulation output.
//!
//! A [`Dataset`] wraps one or more plotfile-style snapshots behind a
//! uniform, labeled-array interface: fields are looked up by name,
//! indexed numpy-style, and materialized as dense covering arrays at a
//! chosen refinement level (the coarsest by default). Multiple snapshots
//! become a time series sorted by simulation time, with a leading time
//! axis on every materialized array.
//!
//! Mesh access is delegated through the [`amr_reader`] capability traits;
//! this crate adds source resolution, time ordering, field registry,
//! derived fields, selection, and caching on top.
//!
//! ```no_run
//! use xamr::{Dataset, SpatialBounds};
//! # fn run(provider: &dyn amr_reader::HierarchyProvider) -> amr_common::Result<()> {
//! let ds = Dataset::open("plt*", provider)?;
//!
//! let temperature = ds.field("temperature")?;
//! let coarse = temperature.values()?;
//! let fine = temperature.level_select(&[2])?.values()?;
//! let slab = temperature
//!     .spatial_select(SpatialBounds::new().z(0.4..=0.6))?
//!     .mean()?;
//!
//! let dtdx = ds.calc().gradient("temperature", "x")?.values()?;
//! # Ok(())
//! # }
//! ```

mod array;
mod cache;
mod calc;
mod config;
mod dataset;
mod snapshot;
mod source;

pub use array::{DataArray, SpatialBounds};
pub use calc::{Calculations, DerivedOp};
pub use config::DatasetConfig;
pub use dataset::{AxisCoords, Coords, Dataset, DatasetAttrs, FieldKind};
pub use snapshot::Snapshot;
pub use source::SourceSpec;

pub use amr_common::{AmrError, Axis, CacheStats, DenseArray, ReadStats, Result, Selector};
pub use amr_reader::{AmrHierarchy, HierarchyProvider, MemoryHierarchy, MemoryProvider};
