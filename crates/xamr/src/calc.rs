//! Derived-field calculations.
//!
//! Each calculation registers a derived field on the dataset and returns
//! it as a [`DataArray`]. Registered names are qualified with the input
//! field names (and the axis, for gradients), so different argument
//! combinations never collide: `gradient_temperature_x`,
//! `divergence_u_v_w`, `vorticity_u_v`.
//!
//! Results are materialized lazily and cached like native fields, so
//! requesting the same calculation twice computes nothing new.

use amr_common::{AmrError, Axis, Result};

use crate::array::DataArray;
use crate::dataset::Dataset;

/// A derived-field operation over native fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedOp {
    /// Spatial derivative of one field along one axis.
    Gradient { field: String, axis: Axis },
    /// `du/dx + dv/dy` plus `dw/dz` when a third component is given.
    Divergence {
        u: String,
        v: String,
        w: Option<String>,
    },
    /// Scalar (z-component) vorticity `dv/dx - du/dy`.
    Vorticity { u: String, v: String },
}

impl DerivedOp {
    /// The registered field name, qualified with the operation's
    /// arguments.
    pub fn name(&self) -> String {
        match self {
            DerivedOp::Gradient { field, axis } => format!("gradient_{field}_{axis}"),
            DerivedOp::Divergence { u, v, w: None } => format!("divergence_{u}_{v}"),
            DerivedOp::Divergence { u, v, w: Some(w) } => format!("divergence_{u}_{v}_{w}"),
            DerivedOp::Vorticity { u, v } => format!("vorticity_{u}_{v}"),
        }
    }

    /// Input field names, in argument order.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            DerivedOp::Gradient { field, .. } => vec![field],
            DerivedOp::Divergence { u, v, w } => {
                let mut inputs = vec![u.as_str(), v.as_str()];
                if let Some(w) = w {
                    inputs.push(w);
                }
                inputs
            }
            DerivedOp::Vorticity { u, v } => vec![u, v],
        }
    }
}

/// Derived-field calculations bound to one dataset.
///
/// Obtained from [`Dataset::calc`]:
///
/// ```no_run
/// # use xamr::Dataset;
/// # use amr_reader::MemoryProvider;
/// # let provider = MemoryProvider::new();
/// let ds = Dataset::open("plt*", &provider)?;
/// let dtdx = ds.calc().gradient("temperature", "x")?;
/// # Ok::<(), amr_common::AmrError>(())
/// ```
pub struct Calculations<'a> {
    dataset: &'a Dataset,
}

impl<'a> Calculations<'a> {
    pub(crate) fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Spatial derivative of a field along an axis (`"x"`, `"y"` or
    /// `"z"`).
    pub fn gradient(&self, field: &str, axis: &str) -> Result<DataArray<'a>> {
        let axis = Axis::parse(axis)?;
        // Rejects z on a 2-D dataset.
        axis.index_position(self.dataset.dimensionality())?;
        self.register(DerivedOp::Gradient {
            field: field.to_string(),
            axis,
        })
    }

    /// Velocity divergence from two or three component fields. The third
    /// component is required for the `dw/dz` term and rejected on 2-D
    /// datasets.
    pub fn divergence(&self, u: &str, v: &str, w: Option<&str>) -> Result<DataArray<'a>> {
        if w.is_some() && self.dataset.dimensionality() < 3 {
            return Err(AmrError::invalid_direction(
                "third velocity component given for a 2-D dataset",
            ));
        }
        self.register(DerivedOp::Divergence {
            u: u.to_string(),
            v: v.to_string(),
            w: w.map(String::from),
        })
    }

    /// Scalar vorticity `dv/dx - du/dy` from two in-plane velocity
    /// components.
    pub fn vorticity(&self, u: &str, v: &str) -> Result<DataArray<'a>> {
        self.register(DerivedOp::Vorticity {
            u: u.to_string(),
            v: v.to_string(),
        })
    }

    fn register(&self, op: DerivedOp) -> Result<DataArray<'a>> {
        let name = self.dataset.register_derived(op)?;
        self.dataset.field(&name)
    }
}
