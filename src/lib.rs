//! WaveSim Dispersion - dispersive materials for time-domain field solvers
//!
//! A frequency-dependent susceptibility χ(ω) is realized as auxiliary
//! polarization fields P, each advanced by its own time-stepped equation
//! driven by the simulated field W (electric or magnetic). This crate
//! provides the susceptibility contract used by a chunked FDTD solver to
//! decide what to allocate and exchange, and the Lorentzian oscillator
//! model with anisotropic (tensor) coupling.

pub mod config;
pub mod domain;
pub mod domain_decomposition;
pub mod engine;
pub mod error;

// Re-export commonly used types
pub use domain::{
    FieldTable, LorentzianSusceptibility, SigmaTensor, Susceptibility, SusceptibilityChain,
};
pub use engine::{ChunkGrid, Component, Direction, GridArray};
pub use error::{Result, SusceptibilityError};

pub mod prelude {
    //! Common imports for using the dispersion models
    pub use crate::config::{LorentzianParams, SusceptibilityConfig};
    pub use crate::domain::{
        total_polarization, AllocationPlan, FieldTable, LorentzianCoefficients,
        LorentzianSusceptibility, PolarizationState, SigmaTensor, Susceptibility,
        SusceptibilityBase, SusceptibilityChain, NUM_COPIES,
    };
    pub use crate::domain_decomposition::{Chunk, ChunkSet};
    pub use crate::engine::{ChunkGrid, Component, Dimensionality, Direction, GridArray};
    pub use crate::error::{Result, SusceptibilityError};
}
