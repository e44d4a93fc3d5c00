//! Neurite growth simulation with SWC morphology export.

pub mod app;
pub mod model;
