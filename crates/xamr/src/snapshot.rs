//! One loaded simulation snapshot.

use std::sync::Arc;

use amr_common::Result;
use amr_reader::{AmrHierarchy, HierarchyProvider};

/// A single simulation output at one simulation time.
///
/// Immutable once loaded: the time and level metadata are captured at
/// open so sorting and validation never re-query the reader.
pub struct Snapshot {
    source: String,
    time: f64,
    max_level: usize,
    hierarchy: Arc<dyn AmrHierarchy>,
}

impl Snapshot {
    /// Open a source through the provider and capture its metadata.
    pub(crate) fn open(source: &str, provider: &dyn HierarchyProvider) -> Result<Self> {
        let hierarchy = provider.open(source)?;
        Ok(Self {
            source: source.to_string(),
            time: hierarchy.time(),
            max_level: hierarchy.max_level(),
            hierarchy,
        })
    }

    /// Source identifier this snapshot was opened from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Finest refinement level in this snapshot.
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// The underlying hierarchy handle.
    pub fn hierarchy(&self) -> &dyn AmrHierarchy {
        &*self.hierarchy
    }
}
