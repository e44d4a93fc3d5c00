//! Core data structures for the dendra simulation.

pub mod arbor;
pub mod kinds;
pub mod segment;
pub mod soma;
