//! Flat re-exports of the engine and output crates.

pub use dendra_core::{GrowthRule, NeuriteOps, RuleSet, Simulation, StepReport};

pub mod config {
    pub use dendra_core::config::*;
}
pub mod field {
    pub use dendra_core::field::*;
}
pub mod growth {
    pub use dendra_core::growth::*;
}
pub mod neurite {
    pub use dendra_core::neurite::*;
}
pub mod population {
    pub use dendra_core::population::*;
}
pub mod random {
    pub use dendra_core::random::*;
}
pub mod simulation {
    pub use dendra_core::simulation::*;
}
pub mod topology {
    pub use dendra_core::topology::*;
}
pub mod metrics {
    pub use dendra_core::metrics::*;
}
pub mod state {
    pub use dendra_data::*;
}
pub mod export {
    pub use dendra_io::*;
}
