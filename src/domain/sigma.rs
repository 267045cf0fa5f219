//! Coupling-coefficient tensor of a susceptibility
//!
//! `sigma[c][d]` scales how strongly the field component along `d` drives
//! the polarization of component `c`. Diagonal entries (`d` equal to the
//! direction of `c`) give the isotropic response; the rest couple field
//! components anisotropically.

use crate::engine::array::GridArray;
use crate::engine::grid::{Component, Direction, NUM_COMPONENTS, NUM_DIRECTIONS};
use crate::error::{Result, SusceptibilityError};

/// Table of optional coefficient arrays with a "provably zero" flag per entry
///
/// An entry flagged trivial is zero on every chunk of the simulation, so
/// neither P nor any update work is needed for it. A non-trivial entry may
/// still have no array on a chunk where it happens to vanish locally.
#[derive(Debug, Clone)]
pub struct SigmaTensor {
    ntot: usize,
    arrays: [[Option<GridArray>; NUM_DIRECTIONS]; NUM_COMPONENTS],
    trivial: [[bool; NUM_DIRECTIONS]; NUM_COMPONENTS],
}

impl SigmaTensor {
    /// Create an all-trivial tensor for a chunk of `ntot` points
    pub fn new(ntot: usize) -> Self {
        Self {
            ntot,
            arrays: std::array::from_fn(|_| std::array::from_fn(|_| None)),
            trivial: [[true; NUM_DIRECTIONS]; NUM_COMPONENTS],
        }
    }

    /// Number of points every coefficient array covers
    pub fn ntot(&self) -> usize {
        self.ntot
    }

    /// Install the coefficient array for (c, d) and mark the entry
    /// non-trivial unless the array is identically zero
    pub fn set(&mut self, c: Component, d: Direction, array: GridArray) -> Result<()> {
        if array.len() != self.ntot {
            return Err(SusceptibilityError::SigmaLength {
                component: c,
                direction: d,
                len: array.len(),
                expected: self.ntot,
            });
        }
        self.trivial[c.index()][d.index()] = array.is_zero();
        self.arrays[c.index()][d.index()] = Some(array);
        Ok(())
    }

    /// Builder form of [`SigmaTensor::set`]
    pub fn with(mut self, c: Component, d: Direction, array: GridArray) -> Result<Self> {
        self.set(c, d, array)?;
        Ok(self)
    }

    /// Override the triviality flag, e.g. after reconciling across chunks
    pub fn set_trivial(&mut self, c: Component, d: Direction, trivial: bool) {
        self.trivial[c.index()][d.index()] = trivial;
    }

    pub fn get(&self, c: Component, d: Direction) -> Option<&GridArray> {
        self.arrays[c.index()][d.index()].as_ref()
    }

    pub fn get_mut(&mut self, c: Component, d: Direction) -> Option<&mut GridArray> {
        self.arrays[c.index()][d.index()].as_mut()
    }

    pub fn is_trivial(&self, c: Component, d: Direction) -> bool {
        self.trivial[c.index()][d.index()]
    }

    /// Whether this chunk's own data for (c, d) is zero or absent
    pub fn is_locally_trivial(&self, c: Component, d: Direction) -> bool {
        self.get(c, d).map_or(true, GridArray::is_zero)
    }

    /// Coefficient array for (c, d), or `None` when the entry is trivial
    pub fn nontrivial(&self, c: Component, d: Direction) -> Option<&GridArray> {
        if self.is_trivial(c, d) {
            None
        } else {
            self.get(c, d)
        }
    }
}
