//! Ordered chain of susceptibilities making up one material
//!
//! The total polarization of a material is the sum of the P fields of every
//! entry. Each entry owns its sigma tensor; the P arrays and scratch buffers
//! live in one [`PolarizationState`] per entry, owned by the chunk.

use crate::domain::fields::{FieldTable, NUM_COPIES};
use crate::domain::susceptibility::Susceptibility;
use crate::engine::array::GridArray;
use crate::engine::grid::{ChunkGrid, Component, NUM_COMPONENTS};

/// Heterogeneous, ordered list of susceptibility models
#[derive(Debug, Clone, Default)]
pub struct SusceptibilityChain {
    entries: Vec<Box<dyn Susceptibility>>,
}

/// Storage the solver keeps for one chain entry on one chunk
#[derive(Debug, Clone)]
pub struct PolarizationState {
    /// Identifier of the susceptibility this state belongs to
    pub id: usize,
    pub p: FieldTable,
    pub scratch: Vec<f64>,
}

/// Which P components to allocate and which W boundaries to exchange
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    /// Per chain entry, per component: allocate P
    pub p: Vec<[bool; NUM_COMPONENTS]>,
    /// Per component: mirrored W points are read by an offdiagonal term
    pub w_notowned: [bool; NUM_COMPONENTS],
    /// Storage copies present in W
    pub copies: usize,
}

impl AllocationPlan {
    /// Empty plan for a chain of `len` entries
    pub fn new(len: usize) -> Self {
        Self {
            p: vec![[false; NUM_COMPONENTS]; len],
            w_notowned: [false; NUM_COMPONENTS],
            copies: 1,
        }
    }

    /// Union with another plan; allocating more than needed is always safe
    pub fn merge(&mut self, other: &AllocationPlan) {
        for (mine, theirs) in self.p.iter_mut().zip(&other.p) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a |= *b;
            }
        }
        for (a, b) in self.w_notowned.iter_mut().zip(&other.w_notowned) {
            *a |= *b;
        }
        self.copies = self.copies.max(other.copies);
    }

    pub fn needs_p(&self, entry: usize, c: Component) -> bool {
        self.p.get(entry).map_or(false, |mask| mask[c.index()])
    }

    pub fn needs_w_notowned(&self, c: Component) -> bool {
        self.w_notowned[c.index()]
    }

    /// Components whose mirrored W points must be exchanged
    pub fn exchanged_components(&self) -> Vec<Component> {
        Component::ALL
            .into_iter()
            .filter(|c| self.needs_w_notowned(*c))
            .collect()
    }
}

impl SusceptibilityChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Box<dyn Susceptibility>) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Susceptibility> {
        self.entries.iter().map(|e| e.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Susceptibility>> {
        self.entries.iter_mut()
    }

    /// Identifiers in chain order
    pub fn ids(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.id()).collect()
    }

    pub fn find(&self, id: usize) -> Option<&dyn Susceptibility> {
        self.iter().find(|e| e.id() == id)
    }

    /// Allocation decisions for this chain on a chunk carrying fields `w`
    pub fn plan(&self, w: &FieldTable) -> AllocationPlan {
        let mut plan = AllocationPlan::new(self.len());
        for (mask, entry) in plan.p.iter_mut().zip(&self.entries) {
            for c in Component::ALL {
                mask[c.index()] = entry.needs_p(c, w);
                plan.w_notowned[c.index()] |= entry.needs_w_notowned(c, w);
            }
        }
        if Component::ALL.into_iter().any(|c| w.is_present(c, 1)) {
            plan.copies = NUM_COPIES;
        }
        plan
    }

    /// Allocate zeroed P arrays and scratch buffers according to `plan`
    pub fn allocate_states(
        &self,
        plan: &AllocationPlan,
        grid: &ChunkGrid,
    ) -> Vec<PolarizationState> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let mut p = FieldTable::new();
                for c in Component::ALL.into_iter().filter(|&c| plan.needs_p(idx, c)) {
                    for cmp in 0..plan.copies {
                        p.allocate(c, cmp, grid.ntot());
                    }
                }
                let scratch = vec![0.0; entry.num_internal_data(&p, grid)];
                log::debug!(
                    "{} #{}: {} P arrays, {} scratch values",
                    entry.name(),
                    entry.id(),
                    p.allocated_pairs(),
                    scratch.len()
                );
                PolarizationState {
                    id: entry.id(),
                    p,
                    scratch,
                }
            })
            .collect()
    }

    /// Advance every entry's polarization by one timestep, in chain order
    pub fn update(
        &self,
        states: &mut [PolarizationState],
        w: &FieldTable,
        w_prev: &FieldTable,
        dt: f64,
        grid: &ChunkGrid,
    ) {
        for (entry, state) in self.entries.iter().zip(states.iter_mut()) {
            debug_assert_eq!(entry.id(), state.id);
            entry.update_p(&mut state.p, w, w_prev, dt, grid, &mut state.scratch);
        }
    }

    /// Total scratch size over the chain for the given states
    pub fn total_internal_data(&self, states: &[PolarizationState], grid: &ChunkGrid) -> usize {
        self.entries
            .iter()
            .zip(states)
            .map(|(entry, state)| entry.num_internal_data(&state.p, grid))
            .sum()
    }
}

/// Sum of P[c][copy] over the chain, or `None` if no entry allocated it
pub fn total_polarization(
    states: &[PolarizationState],
    c: Component,
    copy: usize,
) -> Option<GridArray> {
    let mut arrays = states.iter().filter_map(|s| s.p.get(c, copy));
    let mut total = arrays.next()?.clone();
    for array in arrays {
        total.add_assign(array);
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lorentzian::LorentzianSusceptibility;
    use crate::domain::sigma::SigmaTensor;
    use crate::engine::grid::Direction;

    fn chain_for(grid: &ChunkGrid) -> SusceptibilityChain {
        let n = grid.ntot();
        let sigma = SigmaTensor::new(n)
            .with(Component::Ez, Direction::Z, GridArray::from_scalar(n, 1.0))
            .unwrap();
        let mut chain = SusceptibilityChain::new();
        chain.push(Box::new(LorentzianSusceptibility::new(sigma.clone(), 1.0, 0.1, false)));
        chain.push(Box::new(LorentzianSusceptibility::drude(sigma, 0.5, 0.2)));
        chain
    }

    #[test]
    fn test_plan_and_allocate() {
        let grid = ChunkGrid::d2(4, 4);
        let chain = chain_for(&grid);
        let mut w = FieldTable::new();
        w.allocate(Component::Ez, 0, grid.ntot());

        let plan = chain.plan(&w);
        assert_eq!(plan.copies, 1);
        assert!(plan.needs_p(0, Component::Ez));
        assert!(plan.needs_p(1, Component::Ez));
        assert!(!plan.needs_p(0, Component::Ex));
        assert!(plan.exchanged_components().is_empty());

        let states = chain.allocate_states(&plan, &grid);
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].id, chain.ids()[0]);
        assert_eq!(states[0].scratch.len(), grid.ntot());
        assert_eq!(chain.total_internal_data(&states, &grid), 2 * grid.ntot());
    }

    #[test]
    fn test_total_polarization_sums_entries() {
        let grid = ChunkGrid::d1(2);
        let chain = chain_for(&grid);
        let mut w = FieldTable::new();
        w.set(Component::Ez, 0, GridArray::from_scalar(grid.ntot(), 1.0));

        let mut states = chain.allocate_states(&chain.plan(&w), &grid);
        chain.update(&mut states, &w, &FieldTable::new(), 0.05, &grid);

        let total = total_polarization(&states, Component::Ez, 0).unwrap();
        let i = grid.owned_index(&[0]);
        let p0 = states[0].p.get(Component::Ez, 0).unwrap()[i];
        let p1 = states[1].p.get(Component::Ez, 0).unwrap()[i];
        assert!(p0 > 0.0 && p1 > 0.0);
        assert_eq!(total[i], p0 + p1);
        assert!(total_polarization(&states, Component::Ex, 0).is_none());
    }

    #[test]
    fn test_clone_is_deep() {
        let grid = ChunkGrid::d1(3);
        let chain = chain_for(&grid);
        let mut copy = chain.clone();
        assert_eq!(copy.ids(), chain.ids());

        for entry in copy.iter_mut() {
            if let Some(s) = entry.base_mut().sigma_mut().get_mut(Component::Ez, Direction::Z) {
                s.fill(7.0);
            }
        }
        let original = chain
            .find(chain.ids()[0])
            .and_then(|e| e.base().sigma().get(Component::Ez, Direction::Z))
            .unwrap();
        assert_eq!(original[1], 1.0);
    }
}
