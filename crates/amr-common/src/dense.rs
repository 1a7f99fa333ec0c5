//! Dense N-dimensional arrays.
//!
//! [`DenseArray`] is the in-memory result type of every field extraction:
//! a flat `Vec<f64>` in row-major order plus an explicit shape. Slicing
//! follows standard array semantics: an integer selector drops its axis,
//! a range selector keeps it. A rank-0 array holds a single scalar.

use crate::error::{AmrError, Result};
use crate::select::{resolve_selectors, Selector};

/// A dense N-dimensional array in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl DenseArray {
    /// Create an array from values and a shape.
    ///
    /// Fails if the value count does not match the shape's element count.
    pub fn new(values: Vec<f64>, shape: Vec<usize>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(AmrError::index(format!(
                "shape {shape:?} implies {expected} values, got {}",
                values.len()
            )));
        }
        Ok(Self { shape, values })
    }

    /// Create a zero-filled array.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            values: vec![0.0; len],
        }
    }

    /// Create a rank-0 (scalar) array.
    pub fn scalar_value(value: f64) -> Self {
        Self {
            shape: Vec::new(),
            values: vec![value],
        }
    }

    /// Create an array by evaluating `f` at every multi-index.
    pub fn from_fn(shape: Vec<usize>, mut f: impl FnMut(&[usize]) -> f64) -> Self {
        let len: usize = shape.iter().product();
        let mut values = Vec::with_capacity(len);
        let mut idx = vec![0usize; shape.len()];
        for _ in 0..len {
            values.push(f(&idx));
            // Advance the multi-index, last axis fastest.
            for axis in (0..shape.len()).rev() {
                idx[axis] += 1;
                if idx[axis] < shape[axis] {
                    break;
                }
                idx[axis] = 0;
            }
        }
        Self { shape, values }
    }

    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat value slice in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the array, returning its flat values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// The single value of a rank-0 array, if this is one.
    pub fn scalar(&self) -> Option<f64> {
        if self.shape.is_empty() {
            self.values.first().copied()
        } else {
            None
        }
    }

    /// Row-major strides for this shape.
    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1usize; self.shape.len()];
        for axis in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.shape[axis + 1];
        }
        strides
    }

    /// Value at a multi-index, or `None` if out of bounds or wrong arity.
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &dim) in index.iter().zip(&self.shape) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        self.values.get(flat).copied()
    }

    /// Extract a sub-array.
    ///
    /// The selector arity must equal the rank. Integer selectors drop
    /// their axis; range selectors keep it. Selecting with integers on
    /// every axis yields a rank-0 array.
    pub fn slice(&self, selectors: &[Selector]) -> Result<DenseArray> {
        let resolved = resolve_selectors(&self.shape, selectors)?;
        let out_shape: Vec<usize> = resolved
            .iter()
            .filter(|r| r.keep)
            .map(|r| r.len)
            .collect();
        let out_len: usize = resolved.iter().map(|r| r.len).product();
        let strides = self.strides();

        let mut out = Vec::with_capacity(out_len);
        if out_len > 0 {
            // Odometer over the selected window, last axis fastest.
            let mut counter = vec![0usize; resolved.len()];
            loop {
                let flat: usize = counter
                    .iter()
                    .zip(&resolved)
                    .zip(&strides)
                    .map(|((&c, r), &s)| (r.offset + c) * s)
                    .sum();
                out.push(self.values[flat]);

                let mut axis = resolved.len();
                loop {
                    if axis == 0 {
                        break;
                    }
                    axis -= 1;
                    counter[axis] += 1;
                    if counter[axis] < resolved[axis].len {
                        break;
                    }
                    counter[axis] = 0;
                }
                if counter.iter().all(|&c| c == 0) {
                    break;
                }
            }
        }

        DenseArray::new(out, out_shape)
    }

    /// Stack arrays of identical shape along a new leading axis.
    pub fn stack(parts: &[&DenseArray]) -> Result<DenseArray> {
        let first = parts
            .first()
            .ok_or_else(|| AmrError::index("cannot stack zero arrays"))?;
        let mut values = Vec::with_capacity(first.len() * parts.len());
        for part in parts {
            if part.shape != first.shape {
                return Err(AmrError::index(format!(
                    "cannot stack arrays of shapes {:?} and {:?}",
                    first.shape, part.shape
                )));
            }
            values.extend_from_slice(&part.values);
        }
        let mut shape = Vec::with_capacity(first.shape.len() + 1);
        shape.push(parts.len());
        shape.extend_from_slice(&first.shape);
        DenseArray::new(values, shape)
    }

    /// Apply `f` to every element.
    pub fn map(mut self, f: impl Fn(f64) -> f64) -> DenseArray {
        for v in &mut self.values {
            *v = f(*v);
        }
        self
    }

    /// Combine two arrays of identical shape elementwise.
    pub fn zip_map(&self, other: &DenseArray, f: impl Fn(f64, f64) -> f64) -> Result<DenseArray> {
        if self.shape != other.shape {
            return Err(AmrError::index(format!(
                "shape mismatch: {:?} vs {:?}",
                self.shape, other.shape
            )));
        }
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(&a, &b)| f(a, b))
            .collect();
        DenseArray::new(values, self.shape.clone())
    }

    /// Minimum over all elements; `None` when empty.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Maximum over all elements; `None` when empty.
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// Arithmetic mean over all elements; `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting(shape: Vec<usize>) -> DenseArray {
        let len: usize = shape.iter().product();
        DenseArray::new((0..len).map(|i| i as f64).collect(), shape).unwrap()
    }

    #[test]
    fn test_new_shape_mismatch() {
        assert!(DenseArray::new(vec![1.0, 2.0], vec![3]).is_err());
    }

    #[test]
    fn test_get() {
        let a = counting(vec![2, 3, 4]);
        assert_eq!(a.get(&[0, 0, 0]), Some(0.0));
        assert_eq!(a.get(&[1, 2, 3]), Some(23.0));
        assert_eq!(a.get(&[0, 1, 2]), Some(6.0));
        assert_eq!(a.get(&[2, 0, 0]), None);
        assert_eq!(a.get(&[0, 0]), None);
    }

    #[test]
    fn test_slice_integer_drops_axis() {
        let a = counting(vec![2, 3, 4]);
        let s = a
            .slice(&[Selector::At(1), Selector::all(), Selector::all()])
            .unwrap();
        assert_eq!(s.shape(), &[3, 4]);
        assert_eq!(s.get(&[0, 0]), Some(12.0));
        assert_eq!(s.get(&[2, 3]), Some(23.0));
    }

    #[test]
    fn test_slice_range_keeps_axis() {
        let a = counting(vec![2, 3, 4]);
        let s = a
            .slice(&[
                Selector::all(),
                Selector::from(1..3),
                Selector::from(2..),
            ])
            .unwrap();
        assert_eq!(s.shape(), &[2, 2, 2]);
        assert_eq!(s.get(&[0, 0, 0]), Some(6.0));
        assert_eq!(s.get(&[1, 1, 1]), Some(23.0));
    }

    #[test]
    fn test_slice_all_integers_is_scalar() {
        let a = counting(vec![2, 3, 4]);
        let s = a
            .slice(&[Selector::At(1), Selector::At(2), Selector::At(3)])
            .unwrap();
        assert_eq!(s.rank(), 0);
        assert_eq!(s.scalar(), Some(23.0));
    }

    #[test]
    fn test_slice_arity_mismatch() {
        let a = counting(vec![2, 3, 4]);
        assert!(a.slice(&[Selector::At(0)]).is_err());
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let a = counting(vec![2, 3, 4]);
        let err = a
            .slice(&[Selector::At(2), Selector::all(), Selector::all()])
            .unwrap_err();
        assert!(matches!(err, AmrError::Index(_)));
    }

    #[test]
    fn test_slice_empty_range() {
        let a = counting(vec![2, 3]);
        let s = a.slice(&[Selector::from(1..1), Selector::all()]).unwrap();
        assert_eq!(s.shape(), &[0, 3]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_stack() {
        let a = counting(vec![2, 2]);
        let b = counting(vec![2, 2]).map(|v| v + 10.0);
        let s = DenseArray::stack(&[&a, &b]).unwrap();
        assert_eq!(s.shape(), &[2, 2, 2]);
        assert_eq!(s.get(&[0, 1, 1]), Some(3.0));
        assert_eq!(s.get(&[1, 0, 0]), Some(10.0));
    }

    #[test]
    fn test_stack_shape_mismatch() {
        let a = counting(vec![2, 2]);
        let b = counting(vec![2, 3]);
        assert!(DenseArray::stack(&[&a, &b]).is_err());
    }

    #[test]
    fn test_zip_map() {
        let a = counting(vec![2, 2]);
        let b = counting(vec![2, 2]);
        let sum = a.zip_map(&b, |x, y| x + y).unwrap();
        assert_eq!(sum.values(), &[0.0, 2.0, 4.0, 6.0]);
        assert!(a.zip_map(&counting(vec![4]), |x, _| x).is_err());
    }

    #[test]
    fn test_reductions() {
        let a = counting(vec![2, 3]);
        assert_eq!(a.min(), Some(0.0));
        assert_eq!(a.max(), Some(5.0));
        assert_eq!(a.mean(), Some(2.5));

        let empty = DenseArray::zeros(vec![0, 3]);
        assert_eq!(empty.mean(), None);
    }

    #[test]
    fn test_from_fn_row_major() {
        let a = DenseArray::from_fn(vec![2, 3], |idx| (idx[0] * 10 + idx[1]) as f64);
        assert_eq!(a.values(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }
}
