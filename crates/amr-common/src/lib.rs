//! Shared types for the xamr workspace.
//!
//! This crate provides the common vocabulary used by the reader seam and
//! the dataset layer:
//!
//! - Error taxonomy ([`AmrError`]) and result alias
//! - Spatial axes ([`Axis`]) and index-order bookkeeping
//! - Per-axis selectors ([`Selector`]) with numpy-style slicing arithmetic
//! - The dense N-dimensional array type ([`DenseArray`])
//! - Cache and reader instrumentation counters

pub mod axis;
pub mod dense;
pub mod error;
pub mod select;
pub mod stats;

// Re-export commonly used types at crate root
pub use axis::Axis;
pub use dense::DenseArray;
pub use error::{AmrError, Result};
pub use select::{ResolvedAxis, Selector};
pub use stats::{CacheStats, ReadStats};
