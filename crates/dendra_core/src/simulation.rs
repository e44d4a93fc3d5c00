//! Step scheduler: parallel rule sweep, then a sequential commit.

use crate::config::{AppConfig, GeometryConfig};
use crate::field::FieldRegistry;
use crate::growth::{RuleOutcome, RuleSet};
use crate::metrics::Metrics;
use crate::neurite::{PendingNeurite, TopologyRequest};
use crate::population::populate;
use crate::random::{segment_rng, UniformSource};
use crate::topology::{apply_request, discretize};
use dendra_data::{Arbor, SegmentId};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Per-step tally of rule outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: u64,
    pub elongated: usize,
    pub branched: usize,
    pub bifurcated: usize,
    pub dormant: usize,
    pub new_segments: usize,
}

impl StepReport {
    fn count(&mut self, outcome: RuleOutcome) {
        match outcome {
            RuleOutcome::Inactive => {}
            RuleOutcome::Dormant => self.dormant += 1,
            RuleOutcome::Elongated => self.elongated += 1,
            RuleOutcome::Branched => self.branched += 1,
            RuleOutcome::Bifurcated => self.bifurcated += 1,
        }
    }
}

pub struct Simulation {
    pub arbor: Arbor,
    rules: RuleSet,
    geometry: GeometryConfig,
    seed: u64,
    step: u64,
}

impl Simulation {
    #[must_use]
    pub fn new(arbor: Arbor, rules: RuleSet, geometry: GeometryConfig, seed: u64) -> Self {
        Self {
            arbor,
            rules,
            geometry,
            seed,
            step: 0,
        }
    }

    /// Validates `config`, binds the substance fields and seeds the cells.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let registry = FieldRegistry::from_config(&config.substances, &config.world)?;
        let rules = RuleSet::bind(config, &registry)?;

        let mut arbor = Arbor::new();
        let mut rng = ChaCha8Rng::seed_from_u64(config.world.seed);
        populate(&mut arbor, config, &mut rng);

        Ok(Self::new(arbor, rules, config.geometry, config.world.seed))
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Steps completed so far.
    #[must_use]
    pub fn current_step(&self) -> u64 {
        self.step
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Advances one step with the seeded per-segment streams.
    pub fn step(&mut self) -> StepReport {
        let seed = self.seed;
        self.step_with(|step, id| segment_rng(seed, step, id.index()))
    }

    /// Advances one step drawing from `source(step, segment)`.
    ///
    /// Only segments present at the start of the step are visited; splits
    /// are committed afterwards in segment order.
    pub fn step_with<F, U>(&mut self, source: F) -> StepReport
    where
        F: Fn(u64, SegmentId) -> U + Sync,
        U: UniformSource,
    {
        let step = self.step;
        let rules = &self.rules;
        let geometry = &self.geometry;

        let results: Vec<(SegmentId, RuleOutcome, Option<TopologyRequest>)> = self
            .arbor
            .segments
            .par_iter_mut()
            .filter(|seg| seg.is_terminal())
            .map(|seg| {
                let id = seg.id;
                let rule = rules.get(seg.rule);
                let mut rng = source(step, id);
                let mut neurite = PendingNeurite::new(seg, geometry);
                let outcome = rule.run(&mut neurite, &mut rng);
                (id, outcome, neurite.into_request())
            })
            .collect();

        let before = self.arbor.len();
        let mut report = StepReport {
            step,
            ..StepReport::default()
        };
        for (id, outcome, request) in results {
            report.count(outcome);
            if let Some(request) = request {
                apply_request(&mut self.arbor, id, &request, geometry);
            }
        }
        discretize(&mut self.arbor, geometry);
        report.new_segments = self.arbor.len() - before;

        self.step += 1;
        report
    }

    /// Runs `steps` steps, feeding each report to `metrics`.
    pub fn run(&mut self, steps: u64, metrics: &Metrics) -> StepReport {
        let mut total = StepReport {
            step: self.step,
            ..StepReport::default()
        };
        for _ in 0..steps {
            let started = Instant::now();
            let report = self.step();
            metrics.record_step(&report, self.arbor.len(), started.elapsed());
            total.elongated += report.elongated;
            total.branched += report.branched;
            total.bifurcated += report.bifurcated;
            total.dormant = report.dormant;
            total.new_segments += report.new_segments;
        }
        total
    }
}
