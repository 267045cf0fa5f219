//! Core array type for per-grid-point data
//!
//! Field, polarization and coefficient arrays are stored as flat real arrays
//! addressed by a linear point index. The chunk grid (see [`super::grid`])
//! maps between spatial positions and linear indices.

use ndarray::Array1;
use std::ops::{Index, IndexMut};

/// Real number type used for all field data
pub type Realnum = f64;

/// Flat per-grid-point array of real values
#[derive(Debug, Clone, PartialEq)]
pub struct GridArray {
    /// The underlying ndarray
    pub data: Array1<Realnum>,
}

impl GridArray {
    /// Create a new array with zeros
    pub fn zeros(len: usize) -> Self {
        Self {
            data: Array1::zeros(len),
        }
    }

    /// Create a new array filled with a scalar value
    pub fn from_scalar(len: usize, value: Realnum) -> Self {
        Self {
            data: Array1::from_elem(len, value),
        }
    }

    /// Create an array from a function of the linear point index
    pub fn from_fn<F>(len: usize, f: F) -> Self
    where
        F: FnMut(usize) -> Realnum,
    {
        Self {
            data: Array1::from_shape_fn(len, f),
        }
    }

    /// Create an array that takes ownership of existing values
    pub fn from_vec(values: Vec<Realnum>) -> Self {
        Self {
            data: Array1::from_vec(values),
        }
    }

    /// Get the total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fill the array with a scalar value
    pub fn fill(&mut self, value: Realnum) {
        self.data.fill(value);
    }

    /// True if every element is exactly zero
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Compute the squared 2-norm of the array
    pub fn norm_squared(&self) -> Realnum {
        self.data.iter().map(|&v| v * v).sum()
    }

    /// Pointer to the first element, used to tell storage apart
    pub fn as_ptr(&self) -> *const Realnum {
        self.data.as_ptr()
    }

    /// Add another array element-wise
    pub fn add_assign(&mut self, other: &GridArray) {
        self.data += &other.data;
    }
}

impl Index<usize> for GridArray {
    type Output = Realnum;

    #[inline(always)]
    fn index(&self, i: usize) -> &Realnum {
        &self.data[i]
    }
}

impl IndexMut<usize> for GridArray {
    #[inline(always)]
    fn index_mut(&mut self, i: usize) -> &mut Realnum {
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_array_creation() {
        let arr = GridArray::zeros(27);
        assert_eq!(arr.len(), 27);
        assert!(arr.is_zero());

        let ones = GridArray::from_scalar(8, 1.0);
        assert!(!ones.is_zero());
        assert_abs_diff_eq!(ones.norm_squared(), 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_clone_has_distinct_storage() {
        let arr = GridArray::from_fn(10, |i| i as f64);
        let mut copy = arr.clone();
        assert_eq!(arr, copy);
        assert_ne!(arr.as_ptr(), copy.as_ptr());

        copy[3] = -1.0;
        assert_eq!(arr[3], 3.0);
    }

    #[test]
    fn test_add_assign() {
        let mut a = GridArray::from_scalar(4, 1.5);
        let b = GridArray::from_vec(vec![0.5, 1.0, 1.5, 2.0]);
        a.add_assign(&b);
        assert_eq!(a.data.to_vec(), vec![2.0, 2.5, 3.0, 3.5]);
    }
}
