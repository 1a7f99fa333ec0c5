//! Spatial axes and index-order bookkeeping.
//!
//! Dense arrays use the index order `z, y, x` for 3-D data (`y, x` for 2-D),
//! while domain metadata keeps the AMReX `x, y, z` convention. [`Axis`]
//! carries the translation between the two.

use serde::{Deserialize, Serialize};

use crate::error::{AmrError, Result};

/// A spatial axis of the simulation domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in `x, y, z` order, truncated to a dimensionality.
    pub fn all(dimensionality: usize) -> &'static [Axis] {
        &[Axis::X, Axis::Y, Axis::Z][..dimensionality.min(3)]
    }

    /// Position of this axis in `x, y, z` metadata order (x = 0).
    pub fn coord_position(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Position of this axis in array index order for the given
    /// dimensionality (x varies fastest, so it is the last array axis).
    ///
    /// Fails with `InvalidDirection` if the axis does not exist in a
    /// domain of that dimensionality (e.g. `z` in a 2-D domain).
    pub fn index_position(self, dimensionality: usize) -> Result<usize> {
        let pos = self.coord_position();
        if pos >= dimensionality {
            return Err(AmrError::invalid_direction(format!(
                "axis '{self}' exceeds dimensionality {dimensionality}"
            )));
        }
        Ok(dimensionality - 1 - pos)
    }

    /// Parse an axis name (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            other => Err(AmrError::invalid_direction(format!(
                "'{other}' is not one of x, y, z"
            ))),
        }
    }

    /// Axis name as a lowercase string.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Dimension names in array index order, e.g. `["z", "y", "x"]` for 3-D.
///
/// When `with_time` is set a leading `"time"` dimension is included.
pub fn dim_names(dimensionality: usize, with_time: bool) -> Vec<&'static str> {
    let mut dims = Vec::with_capacity(dimensionality + 1);
    if with_time {
        dims.push("time");
    }
    for axis in Axis::all(dimensionality).iter().rev() {
        dims.push(axis.name());
    }
    dims
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_axis() {
        assert_eq!(Axis::parse("x").unwrap(), Axis::X);
        assert_eq!(Axis::parse("Z").unwrap(), Axis::Z);
        assert!(Axis::parse("w").is_err());
    }

    #[test]
    fn test_index_position_3d() {
        // Index order is z, y, x: x is the last array axis.
        assert_eq!(Axis::X.index_position(3).unwrap(), 2);
        assert_eq!(Axis::Y.index_position(3).unwrap(), 1);
        assert_eq!(Axis::Z.index_position(3).unwrap(), 0);
    }

    #[test]
    fn test_index_position_2d() {
        assert_eq!(Axis::X.index_position(2).unwrap(), 1);
        assert_eq!(Axis::Y.index_position(2).unwrap(), 0);
        assert!(Axis::Z.index_position(2).is_err());
    }

    #[test]
    fn test_dim_names() {
        assert_eq!(dim_names(3, true), vec!["time", "z", "y", "x"]);
        assert_eq!(dim_names(3, false), vec!["z", "y", "x"]);
        assert_eq!(dim_names(2, false), vec!["y", "x"]);
    }
}
