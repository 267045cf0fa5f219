//! Per-component field tables
//!
//! The solver hands field data around as a fixed table indexed by component
//! and storage copy. A missing entry means the component does not exist on
//! this chunk (for W) or was not allocated (for P).

use crate::engine::array::GridArray;
use crate::engine::grid::{Component, NUM_COMPONENTS};

/// Storage copies kept per component
pub const NUM_COPIES: usize = 2;

/// Table of optional per-grid-point arrays, one per (component, copy)
#[derive(Debug, Clone)]
pub struct FieldTable {
    arrays: [[Option<GridArray>; NUM_COPIES]; NUM_COMPONENTS],
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            arrays: std::array::from_fn(|_| [None, None]),
        }
    }

    pub fn get(&self, c: Component, copy: usize) -> Option<&GridArray> {
        self.arrays[c.index()][copy].as_ref()
    }

    pub fn get_mut(&mut self, c: Component, copy: usize) -> Option<&mut GridArray> {
        self.arrays[c.index()][copy].as_mut()
    }

    pub fn set(&mut self, c: Component, copy: usize, array: GridArray) {
        self.arrays[c.index()][copy] = Some(array);
    }

    /// Allocate a zeroed array for (c, copy), keeping existing data
    pub fn allocate(&mut self, c: Component, copy: usize, ntot: usize) -> &mut GridArray {
        self.arrays[c.index()][copy].get_or_insert_with(|| GridArray::zeros(ntot))
    }

    pub fn remove(&mut self, c: Component, copy: usize) -> Option<GridArray> {
        self.arrays[c.index()][copy].take()
    }

    pub fn is_present(&self, c: Component, copy: usize) -> bool {
        self.arrays[c.index()][copy].is_some()
    }

    /// Number of allocated (component, copy) pairs
    pub fn allocated_pairs(&self) -> usize {
        self.arrays.iter().flatten().filter(|a| a.is_some()).count()
    }

    /// Components with at least one allocated copy
    pub fn components(&self) -> impl Iterator<Item = Component> + '_ {
        Component::ALL
            .into_iter()
            .filter(move |c| self.arrays[c.index()].iter().any(Option::is_some))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_bookkeeping() {
        let mut table = FieldTable::new();
        assert_eq!(table.allocated_pairs(), 0);

        table.allocate(Component::Ex, 0, 10);
        table.allocate(Component::Ex, 1, 10);
        table.set(Component::Hz, 0, GridArray::from_scalar(10, 2.0));
        assert_eq!(table.allocated_pairs(), 3);
        assert!(table.is_present(Component::Ex, 1));
        assert!(!table.is_present(Component::Hz, 1));

        let comps: Vec<_> = table.components().collect();
        assert_eq!(comps, vec![Component::Ex, Component::Hz]);

        // allocate does not clobber existing data
        table.allocate(Component::Hz, 0, 10);
        assert_eq!(table.get(Component::Hz, 0).unwrap()[3], 2.0);

        table.remove(Component::Ex, 1);
        assert_eq!(table.allocated_pairs(), 2);
    }
}
