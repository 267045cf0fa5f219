//! Chunk-level orchestration of dispersive materials
//!
//! The global grid is split into chunks by the field solver; each chunk
//! carries its own clone of the material's susceptibility chain with
//! chunk-local sigma arrays. This module keeps allocation decisions
//! consistent across chunk borders and runs the per-chunk polarization
//! updates in parallel using Rayon.

use crate::domain::chain::{AllocationPlan, PolarizationState, SusceptibilityChain};
use crate::domain::fields::FieldTable;
use crate::engine::grid::{ChunkGrid, Component, Direction};
use crate::error::{Result, SusceptibilityError};
use rayon::prelude::*;

/// One chunk of the decomposed grid, as seen by the polarization update
#[derive(Debug, Clone)]
pub struct Chunk {
    /// ID of this chunk
    pub id: usize,
    pub grid: ChunkGrid,
    /// IDs of chunks sharing a border with this one
    pub neighbors: Vec<usize>,
    pub chain: SusceptibilityChain,
    /// Driving field at the current step
    pub w: FieldTable,
    /// Driving field at the previous step
    pub w_prev: FieldTable,
    /// Polarization storage, one entry per chain element
    pub states: Vec<PolarizationState>,
}

impl Chunk {
    pub fn new(id: usize, grid: ChunkGrid, chain: SusceptibilityChain, w: FieldTable) -> Self {
        Self {
            id,
            grid,
            neighbors: Vec::new(),
            chain,
            w,
            w_prev: FieldTable::new(),
            states: Vec::new(),
        }
    }

    pub fn with_neighbors(mut self, neighbors: Vec<usize>) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Advance all polarization fields of this chunk by one step
    pub fn step_polarization(&mut self, dt: f64) {
        self.chain
            .update(&mut self.states, &self.w, &self.w_prev, dt, &self.grid);
    }

    /// P components allocated per chain entry
    pub fn allocated_components(&self) -> Vec<Vec<Component>> {
        self.states
            .iter()
            .map(|s| s.p.components().collect())
            .collect()
    }
}

/// All chunks of one simulation
#[derive(Debug, Clone, Default)]
pub struct ChunkSet {
    pub chunks: Vec<Chunk>,
}

impl ChunkSet {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Get the number of chunks
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn get(&self, id: usize) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    /// Every chunk must carry clones of the same chain, in the same order
    fn check_chains(&self) -> Result<()> {
        let Some(reference) = self.chunks.first() else {
            return Ok(());
        };
        let ids = reference.chain.ids();
        match self.chunks.iter().find(|c| c.chain.ids() != ids) {
            Some(chunk) => Err(SusceptibilityError::ChainMismatch {
                chunk: chunk.id,
                reference: reference.id,
            }),
            None => Ok(()),
        }
    }

    /// Make sigma triviality a global property: an entry is trivial only if
    /// it vanishes on every chunk
    pub fn sync_trivial_sigma(&mut self) -> Result<()> {
        self.check_chains()?;
        let len = self.chunks.first().map_or(0, |c| c.chain.len());

        for entry in 0..len {
            for c in Component::ALL {
                for d in Direction::ALL {
                    let trivial = self.chunks.iter().all(|chunk| {
                        chunk
                            .chain
                            .iter()
                            .nth(entry)
                            .map_or(true, |s| s.base().sigma().is_locally_trivial(c, d))
                    });
                    for chunk in &mut self.chunks {
                        if let Some(s) = chunk.chain.iter_mut().nth(entry) {
                            s.base_mut().sigma_mut().set_trivial(c, d, trivial);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Allocation decisions shared by all chunks.
    ///
    /// If any chunk needs P[c] for an entry, every chunk allocates it, so a
    /// chunk never exchanges boundary data with a neighbour lacking the
    /// array. This over-allocates memory on chunks where sigma vanishes.
    pub fn plan_allocation(&self) -> Result<AllocationPlan> {
        self.check_chains()?;
        let len = self.chunks.first().map_or(0, |c| c.chain.len());

        let plan = self
            .chunks
            .iter()
            .map(|chunk| chunk.chain.plan(&chunk.w))
            .fold(AllocationPlan::new(len), |mut acc, local| {
                acc.merge(&local);
                acc
            });

        log::debug!(
            "allocation plan over {} chunks: {} P components, W exchange for {:?}",
            self.chunks.len(),
            plan.p.iter().flatten().filter(|&&b| b).count(),
            plan.exchanged_components()
        );
        Ok(plan)
    }

    /// Allocate P and scratch on every chunk according to `plan`
    pub fn allocate(&mut self, plan: &AllocationPlan) {
        for chunk in &mut self.chunks {
            chunk.states = chunk.chain.allocate_states(plan, &chunk.grid);
        }
    }

    /// Reconcile sigma, plan and allocate in one go
    pub fn setup(&mut self) -> Result<AllocationPlan> {
        self.sync_trivial_sigma()?;
        let plan = self.plan_allocation()?;
        self.allocate(&plan);
        Ok(plan)
    }

    /// Whether every pair of neighbouring chunks allocated the same P
    pub fn is_allocation_uniform(&self) -> bool {
        self.chunks.iter().all(|chunk| {
            let mine = chunk.allocated_components();
            chunk
                .neighbors
                .iter()
                .filter_map(|&id| self.get(id))
                .all(|other| other.allocated_components() == mine)
        })
    }

    /// Total scratch values allocated over all chunks
    pub fn total_internal_data(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| c.chain.total_internal_data(&c.states, &c.grid))
            .sum()
    }

    /// Advance polarization on all chunks in parallel.
    ///
    /// Mirrored W points feeding offdiagonal terms must have been exchanged
    /// before this call.
    pub fn step_polarization(&mut self, dt: f64) {
        self.chunks
            .par_iter_mut()
            .for_each(|chunk| chunk.step_polarization(dt));
    }
}
