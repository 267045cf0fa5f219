//! Error types for susceptibility construction and chunk planning
//!
//! The per-timestep kernels are infallible; everything here is reported at
//! setup time, before any polarization array is touched.

use crate::engine::grid::{Component, Direction};
use thiserror::Error;

/// Errors raised while building susceptibilities or planning allocation.
#[derive(Debug, Error)]
pub enum SusceptibilityError {
    #[error("sigma array for ({component:?}, {direction:?}) has {len} points, expected {expected}")]
    SigmaLength {
        component: Component,
        direction: Direction,
        len: usize,
        expected: usize,
    },

    #[error("invalid Lorentzian parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("susceptibility chain of chunk {chunk} does not match chunk {reference}")]
    ChainMismatch { chunk: usize, reference: usize },

    #[error("failed to parse susceptibility config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SusceptibilityError>;
