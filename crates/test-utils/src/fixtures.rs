//! Analytic hierarchy fixtures.
//!
//! All fields are linear in the spatial coordinates, so second-order
//! finite-difference derivatives reproduce them exactly (to rounding)
//! at every level, including the one-sided boundary stencils. Tests can
//! therefore assert derived-field values against the coefficients below.

use amr_reader::{MemoryHierarchy, MemoryProvider};

/// Coefficients of the analytic velocity fields:
/// `u = DU_DX*x + DU_DY*y`, `v = DV_DY*y + DV_DX*x`, `w = DW_DZ*z`.
pub const DU_DX: f64 = 1.5;
pub const DU_DY: f64 = 0.25;
pub const DV_DY: f64 = 2.5;
pub const DV_DX: f64 = 0.75;
pub const DW_DZ: f64 = 0.5;

/// Temperature field coefficients: `T = TX*x + TY*y + TZ*z + TT*t`.
pub const TX: f64 = 2.0;
pub const TY: f64 = 3.0;
pub const TZ: f64 = -1.0;
pub const TT: f64 = 10.0;

/// A 3-D 8x8x8 unit-cube snapshot with two refined levels and the
/// analytic temperature/velocity fields.
pub fn snapshot_3d(time: f64) -> MemoryHierarchy {
    MemoryHierarchy::builder(time, &[8, 8, 8])
        .max_level(2)
        .field_fn("temperature", move |c| {
            TX * c[0] + TY * c[1] + TZ * c[2] + TT * time
        })
        .field_fn("density", |c| 1.0 + 0.1 * c[0] * c[1])
        .field_fn("u", |c| DU_DX * c[0] + DU_DY * c[1])
        .field_fn("v", |c| DV_DY * c[1] + DV_DX * c[0])
        .field_fn("w", |c| DW_DZ * c[2])
        .build()
        .expect("fixture hierarchy must build")
}

/// A 2-D 16x8 snapshot with the analytic velocity fields (no `w`).
pub fn snapshot_2d(time: f64) -> MemoryHierarchy {
    MemoryHierarchy::builder(time, &[16, 8])
        .extent(&[2.0, 1.0])
        .max_level(1)
        .field_fn("temperature", move |c| TX * c[0] + TY * c[1] + TT * time)
        .field_fn("u", |c| DU_DX * c[0] + DU_DY * c[1])
        .field_fn("v", |c| DV_DY * c[1] + DV_DX * c[0])
        .build()
        .expect("fixture hierarchy must build")
}

/// Plotfile-style source name for a step number, e.g. `plt00020`.
pub fn plotfile_name(step: usize) -> String {
    format!("plt{step:05}")
}

/// A provider with one 3-D snapshot per entry of `times`, registered as
/// `plt00000`, `plt00010`, ... in the given (possibly unsorted) order.
///
/// Returns the provider and the source names in registration order.
pub fn series_provider_3d(times: &[f64]) -> (MemoryProvider, Vec<String>) {
    let mut provider = MemoryProvider::new();
    let mut names = Vec::with_capacity(times.len());
    for (i, &time) in times.iter().enumerate() {
        let name = plotfile_name(i * 10);
        provider.insert(&name, snapshot_3d(time));
        names.push(name);
    }
    (provider, names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amr_reader::{AmrHierarchy, HierarchyProvider};

    #[test]
    fn test_snapshot_3d_fields() {
        let h = snapshot_3d(1.5);
        assert_eq!(h.dimensionality(), 3);
        assert_eq!(h.max_level(), 2);
        assert!(h.has_field("temperature"));
        assert!(h.has_field("w"));
    }

    #[test]
    fn test_series_provider_names() {
        let (provider, names) = series_provider_3d(&[2.0, 0.0, 1.0]);
        assert_eq!(names, vec!["plt00000", "plt00010", "plt00020"]);
        assert_eq!(provider.open("plt00010").unwrap().time(), 0.0);
    }
}
