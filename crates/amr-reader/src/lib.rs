//! Delegated AMR hierarchy access.
//!
//! The dataset layer never reads mesh data itself; everything flows
//! through the narrow capability traits defined here:
//!
//! - [`AmrHierarchy`] — one opened simulation snapshot: metadata plus
//!   dense extraction of a field at a refinement level, and the native
//!   gradient operator (ghost-zone handling stays inside the adapter).
//! - [`HierarchyProvider`] — resolves opaque source identifiers into
//!   opened hierarchies.
//!
//! One concrete adapter is provided: [`MemoryHierarchy`], an in-memory
//! uniformly-refined hierarchy used for tests and for embedding synthetic
//! data. Adapters for on-disk plotfile readers implement the same traits
//! in their own crates.

pub mod hierarchy;
pub mod memory;

pub use hierarchy::{AmrHierarchy, HierarchyProvider};
pub use memory::{MemoryHierarchy, MemoryHierarchyBuilder, MemoryProvider};
