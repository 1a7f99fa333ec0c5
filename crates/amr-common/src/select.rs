//! Per-axis selectors and slicing arithmetic.
//!
//! A [`Selector`] picks out part of one array axis: either a single index
//! (which drops the axis from the result, as in numpy) or a half-open
//! range (which keeps the axis, possibly shortened). Ranges are clamped to
//! the axis length; integer indices are bounds-checked.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{AmrError, Result};

/// Selection along a single array axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// A single index; the axis is dropped from the result.
    At(usize),
    /// A half-open index range; `None` bounds extend to the axis edge.
    Span {
        start: Option<usize>,
        end: Option<usize>,
    },
}

impl Selector {
    /// Selector covering the whole axis.
    pub fn all() -> Self {
        Selector::Span {
            start: None,
            end: None,
        }
    }

    /// Resolve this selector against an axis of length `dim`.
    ///
    /// `axis` is only used for error messages.
    pub fn resolve(self, dim: usize, axis: usize) -> Result<ResolvedAxis> {
        match self {
            Selector::At(i) => {
                if i >= dim {
                    return Err(AmrError::index(format!(
                        "index {i} out of bounds for axis {axis} with length {dim}"
                    )));
                }
                Ok(ResolvedAxis {
                    offset: i,
                    len: 1,
                    keep: false,
                })
            }
            Selector::Span { start, end } => {
                let start = start.unwrap_or(0).min(dim);
                let end = end.unwrap_or(dim).min(dim);
                Ok(ResolvedAxis {
                    offset: start,
                    len: end.saturating_sub(start),
                    keep: true,
                })
            }
        }
    }
}

/// Result of resolving a [`Selector`] against a concrete axis length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAxis {
    /// First selected index along the axis.
    pub offset: usize,
    /// Number of selected indices.
    pub len: usize,
    /// Whether the axis survives in the output shape.
    pub keep: bool,
}

impl From<usize> for Selector {
    fn from(i: usize) -> Self {
        Selector::At(i)
    }
}

impl From<Range<usize>> for Selector {
    fn from(r: Range<usize>) -> Self {
        Selector::Span {
            start: Some(r.start),
            end: Some(r.end),
        }
    }
}

impl From<RangeFrom<usize>> for Selector {
    fn from(r: RangeFrom<usize>) -> Self {
        Selector::Span {
            start: Some(r.start),
            end: None,
        }
    }
}

impl From<RangeTo<usize>> for Selector {
    fn from(r: RangeTo<usize>) -> Self {
        Selector::Span {
            start: None,
            end: Some(r.end),
        }
    }
}

impl From<RangeFull> for Selector {
    fn from(_: RangeFull) -> Self {
        Selector::all()
    }
}

/// Resolve a full selector tuple against an array shape.
///
/// Fails with an index error when the selector arity does not match the
/// array rank, or when any integer index is out of bounds.
pub fn resolve_selectors(shape: &[usize], selectors: &[Selector]) -> Result<Vec<ResolvedAxis>> {
    if selectors.len() != shape.len() {
        return Err(AmrError::index(format!(
            "expected {} indices, got {}",
            shape.len(),
            selectors.len()
        )));
    }
    shape
        .iter()
        .zip(selectors)
        .enumerate()
        .map(|(axis, (&dim, &sel))| sel.resolve(dim, axis))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_in_bounds() {
        let r = Selector::At(3).resolve(5, 0).unwrap();
        assert_eq!(r, ResolvedAxis { offset: 3, len: 1, keep: false });
    }

    #[test]
    fn test_at_out_of_bounds() {
        assert!(Selector::At(5).resolve(5, 0).is_err());
    }

    #[test]
    fn test_span_clamps_to_axis() {
        let r = Selector::from(2..99).resolve(5, 0).unwrap();
        assert_eq!(r, ResolvedAxis { offset: 2, len: 3, keep: true });
    }

    #[test]
    fn test_span_unbounded() {
        let r = Selector::all().resolve(4, 0).unwrap();
        assert_eq!(r, ResolvedAxis { offset: 0, len: 4, keep: true });
    }

    #[test]
    fn test_span_empty() {
        let r = Selector::from(3..2).resolve(5, 0).unwrap();
        assert_eq!(r.len, 0);
    }

    #[test]
    fn test_arity_mismatch() {
        let err = resolve_selectors(&[4, 4, 4], &[Selector::At(0)]).unwrap_err();
        assert!(matches!(err, AmrError::Index(_)));
    }

    #[test]
    fn test_from_range_forms() {
        assert_eq!(
            Selector::from(1..),
            Selector::Span { start: Some(1), end: None }
        );
        assert_eq!(
            Selector::from(..7),
            Selector::Span { start: None, end: Some(7) }
        );
        assert_eq!(Selector::from(..), Selector::all());
        assert_eq!(Selector::from(2usize), Selector::At(2));
    }
}
