//! # Dendra Core
//!
//! The growth engine for dendra, a neurite morphology simulator.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Vector helpers for rotations and perpendicular directions
//! - Substance guidance fields (analytic bands and voxel grids)
//! - Apical and basal growth rules (direction, taper, branching, bifurcation)
//! - Topology commits and discretisation of long segments
//! - Cell construction and the step scheduler
//! - Metrics collection and structured logging
//!
//! ## Example
//!
//! ```
//! use dendra_core::config::AppConfig;
//! use dendra_core::metrics::Metrics;
//! use dendra_core::simulation::Simulation;
//!
//! let config = AppConfig::default();
//! let mut sim = Simulation::from_config(&config).unwrap();
//! sim.run(10, &Metrics::default());
//! assert_eq!(sim.current_step(), 10);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Guidance fields for the apical and basal substances
pub mod field;
/// Growth rule variants and their building blocks
pub mod growth;
/// Performance metrics collection and logging
pub mod metrics;
/// Segment operations available to growth rules
pub mod neurite;
/// Initial cell placement
pub mod population;
/// Per-segment random streams
pub mod random;
/// Step scheduler
pub mod simulation;
/// Arbor edits: new neurites, splits, discretisation
pub mod topology;
/// Rotation and perpendicular-vector helpers
pub mod vector;

pub use field::{FieldRegistry, GradientField};
pub use growth::{GrowthRule, GrowthState, RuleOutcome, RuleSet};
pub use metrics::{init_logging, Metrics};
pub use neurite::{DaughterSpec, NeuriteOps, PendingNeurite, TopologyRequest};
pub use random::{FixedUniform, UniformSource};
pub use simulation::{Simulation, StepReport};
