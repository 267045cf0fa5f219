//! Engine module containing array and grid abstractions

pub mod array;
pub mod grid;

pub use array::{GridArray, Realnum};
pub use grid::{ChunkGrid, Component, Dimensionality, Direction, FieldKind};
