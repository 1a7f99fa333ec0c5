//! Dense-array generators with predictable values.

use amr_common::DenseArray;

/// An array whose flat values count up from zero.
///
/// Makes read/slice verification easy: the value at a multi-index equals
/// its row-major flat position.
pub fn counting_array(shape: &[usize]) -> DenseArray {
    let len: usize = shape.iter().product();
    DenseArray::new((0..len).map(|i| i as f64).collect(), shape.to_vec())
        .expect("counting array shape is consistent")
}

/// A constant-valued array.
pub fn constant_array(shape: &[usize], value: f64) -> DenseArray {
    DenseArray::new(vec![value; shape.iter().product()], shape.to_vec())
        .expect("constant array shape is consistent")
}
