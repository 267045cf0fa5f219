//! Domain module for dispersive material models

pub mod chain;
pub mod fields;
pub mod lorentzian;
pub mod sigma;
pub mod susceptibility;

pub use chain::{total_polarization, AllocationPlan, PolarizationState, SusceptibilityChain};
pub use fields::{FieldTable, NUM_COPIES};
pub use lorentzian::{LorentzianCoefficients, LorentzianSusceptibility};
pub use sigma::SigmaTensor;
pub use susceptibility::{Susceptibility, SusceptibilityBase};
