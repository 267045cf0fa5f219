//! Susceptibility contract shared by all dispersive material models
//!
//! A susceptibility realizes a frequency-dependent χ(ω) as an auxiliary
//! polarization field P = χ(ω) W, where W is the electric or magnetic
//! field. Each model knows how to advance its P by one timestep; the field
//! solver owns P, the scratch buffers and the boundary exchange, and asks
//! the model which components need storage and which need mirrored W data.

use crate::domain::fields::FieldTable;
use crate::domain::sigma::SigmaTensor;
use crate::engine::grid::{ChunkGrid, Component, Direction};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Hand out the next process-wide susceptibility identifier
pub fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// State common to every susceptibility: identifier and coupling tensor
///
/// Cloning copies the sigma arrays by value and keeps the identifier, so a
/// per-chunk clone still correlates with the P arrays of its template.
#[derive(Debug, Clone)]
pub struct SusceptibilityBase {
    id: usize,
    sigma: SigmaTensor,
}

impl SusceptibilityBase {
    /// Wrap `sigma` and assign a fresh identifier
    pub fn new(sigma: SigmaTensor) -> Self {
        Self {
            id: next_id(),
            sigma,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of grid points the sigma arrays cover
    pub fn ntot(&self) -> usize {
        self.sigma.ntot()
    }

    pub fn sigma(&self) -> &SigmaTensor {
        &self.sigma
    }

    pub fn sigma_mut(&mut self) -> &mut SigmaTensor {
        &mut self.sigma
    }

    /// Replace the sigma tensor, e.g. with chunk-local coefficients
    pub fn set_sigma(&mut self, sigma: SigmaTensor) {
        self.sigma = sigma;
    }

    /// Whether P[c] must be allocated.
    ///
    /// Triviality is a global property, so this answer is the same on every
    /// chunk that carries the same W components: if one chunk has P[c], all
    /// of its neighbours do too and boundary exchange never targets a
    /// missing array.
    pub fn needs_p(&self, c: Component, w: &FieldTable) -> bool {
        if !c.is_electric() && !c.is_magnetic() {
            return false;
        }
        Direction::ALL
            .into_iter()
            .any(|d| !self.sigma.is_trivial(c, d) && w.is_present(c.with_direction(d), 0))
    }

    /// Whether the not-owned (mirrored) points of W[c] are read.
    ///
    /// Only offdiagonal sigma reads across chunk edges: W[c] feeds P[cP]
    /// through `sigma[cP][direction(c)]` for every cP along another axis.
    pub fn needs_w_notowned(&self, c: Component, w: &FieldTable) -> bool {
        let own = c.direction();
        Direction::ALL
            .into_iter()
            .filter(|&d| d != own)
            .any(|d| {
                let cp = c.with_direction(d);
                self.needs_p(cp, w) && !self.sigma.is_trivial(cp, own)
            })
    }
}

/// Capability interface implemented once per material model
pub trait Susceptibility: Debug + Send + Sync {
    fn base(&self) -> &SusceptibilityBase;

    fn base_mut(&mut self) -> &mut SusceptibilityBase;

    /// Independent deep copy (sigma arrays copied, identifier kept)
    fn clone_box(&self) -> Box<dyn Susceptibility>;

    /// Model name for logging
    fn name(&self) -> &'static str;

    fn id(&self) -> usize {
        self.base().id()
    }

    fn needs_p(&self, c: Component, w: &FieldTable) -> bool {
        self.base().needs_p(c, w)
    }

    fn needs_w_notowned(&self, c: Component, w: &FieldTable) -> bool {
        self.base().needs_w_notowned(c, w)
    }

    /// Scratch values the model needs alongside the allocated P arrays
    fn num_internal_data(&self, _p: &FieldTable, _grid: &ChunkGrid) -> usize {
        0
    }

    /// Advance every allocated component of `p` by one timestep.
    ///
    /// `scratch` holds exactly [`Susceptibility::num_internal_data`] values
    /// and persists between calls.
    fn update_p(
        &self,
        p: &mut FieldTable,
        w: &FieldTable,
        w_prev: &FieldTable,
        dt: f64,
        grid: &ChunkGrid,
        scratch: &mut [f64],
    );
}

impl Clone for Box<dyn Susceptibility> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
