//! Growth rules attached to neurite segments.
//!
//! A rule is run once per step on each segment carrying it. It elongates
//! the tip, tapers it, and may ask for a split. Once the segment has
//! daughters the rule never touches it again.

pub mod bifurcation;
pub mod branch;
pub mod direction;
pub mod taper;

use crate::config::{AppConfig, ApicalConfig, BasalConfig, GrowthParams};
use crate::field::{FieldRegistry, GradientField};
use crate::neurite::NeuriteOps;
use crate::random::UniformSource;
use dendra_data::{Junction, RuleKind, Segment};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle of a segment as seen by its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthState {
    Growing,
    /// Terminal but too thin to grow. Absorbing.
    Dormant,
    Extended,
    Branched,
    Bifurcated,
}

/// What a single rule invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    /// Segment already has daughters.
    Inactive,
    Dormant,
    Elongated,
    Branched,
    Bifurcated,
}

#[derive(Debug, Clone)]
pub struct ApicalRule {
    pub config: ApicalConfig,
    field: Arc<dyn GradientField>,
}

impl ApicalRule {
    #[must_use]
    pub fn new(config: ApicalConfig, field: Arc<dyn GradientField>) -> Self {
        Self { config, field }
    }

    pub fn run<N, U>(&self, neurite: &mut N, rng: &mut U) -> RuleOutcome
    where
        N: NeuriteOps,
        U: UniformSource + ?Sized,
    {
        let growth = &self.config.growth;
        if let Some(idle) = gate(neurite, growth) {
            return idle;
        }
        direction::grow(neurite, self.field.as_ref(), growth, rng);
        taper::shrink(neurite, growth.diameter_decrement);
        if branch::try_branch(neurite, &self.config.branch, rng) {
            RuleOutcome::Branched
        } else {
            RuleOutcome::Elongated
        }
    }
}

#[derive(Debug, Clone)]
pub struct BasalRule {
    pub config: BasalConfig,
    field: Arc<dyn GradientField>,
}

impl BasalRule {
    #[must_use]
    pub fn new(config: BasalConfig, field: Arc<dyn GradientField>) -> Self {
        Self { config, field }
    }

    pub fn run<N, U>(&self, neurite: &mut N, rng: &mut U) -> RuleOutcome
    where
        N: NeuriteOps,
        U: UniformSource + ?Sized,
    {
        let growth = &self.config.growth;
        if let Some(idle) = gate(neurite, growth) {
            return idle;
        }
        direction::grow(neurite, self.field.as_ref(), growth, rng);
        taper::shrink(neurite, growth.diameter_decrement);
        if bifurcation::try_bifurcate(neurite, &self.config.bifurcation, rng) {
            RuleOutcome::Bifurcated
        } else {
            RuleOutcome::Elongated
        }
    }
}

fn gate<N: NeuriteOps + ?Sized>(neurite: &N, growth: &GrowthParams) -> Option<RuleOutcome> {
    if !neurite.is_terminal() {
        Some(RuleOutcome::Inactive)
    } else if neurite.diameter() <= growth.threshold {
        Some(RuleOutcome::Dormant)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub enum GrowthRule {
    Apical(ApicalRule),
    Basal(BasalRule),
}

impl GrowthRule {
    /// Builds the rule for `kind`, resolving its substance field now.
    pub fn bind(
        kind: RuleKind,
        config: &AppConfig,
        registry: &FieldRegistry,
    ) -> anyhow::Result<Self> {
        let field = registry.get(kind.substance())?;
        Ok(match kind {
            RuleKind::Apical => GrowthRule::Apical(ApicalRule::new(config.apical, field)),
            RuleKind::Basal => GrowthRule::Basal(BasalRule::new(config.basal, field)),
        })
    }

    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            GrowthRule::Apical(_) => RuleKind::Apical,
            GrowthRule::Basal(_) => RuleKind::Basal,
        }
    }

    #[must_use]
    pub fn growth_threshold(&self) -> f64 {
        match self {
            GrowthRule::Apical(rule) => rule.config.growth.threshold,
            GrowthRule::Basal(rule) => rule.config.growth.threshold,
        }
    }

    #[must_use]
    pub fn state_of(&self, segment: &Segment) -> GrowthState {
        match segment.junction {
            Some(Junction::Continuation) => GrowthState::Extended,
            Some(Junction::Branch) => GrowthState::Branched,
            Some(Junction::Bifurcation) => GrowthState::Bifurcated,
            None if segment.diameter > self.growth_threshold() => GrowthState::Growing,
            None => GrowthState::Dormant,
        }
    }

    pub fn run<N, U>(&self, neurite: &mut N, rng: &mut U) -> RuleOutcome
    where
        N: NeuriteOps,
        U: UniformSource + ?Sized,
    {
        match self {
            GrowthRule::Apical(rule) => rule.run(neurite, rng),
            GrowthRule::Basal(rule) => rule.run(neurite, rng),
        }
    }
}

/// One bound rule per [`RuleKind`].
#[derive(Debug, Clone)]
pub struct RuleSet {
    apical: GrowthRule,
    basal: GrowthRule,
}

impl RuleSet {
    pub fn bind(config: &AppConfig, registry: &FieldRegistry) -> anyhow::Result<Self> {
        Ok(Self {
            apical: GrowthRule::bind(RuleKind::Apical, config, registry)?,
            basal: GrowthRule::bind(RuleKind::Basal, config, registry)?,
        })
    }

    #[must_use]
    pub fn get(&self, kind: RuleKind) -> &GrowthRule {
        match kind {
            RuleKind::Apical => &self.apical,
            RuleKind::Basal => &self.basal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BranchDiameter, GeometryConfig};
    use crate::field::ConstantGradient;
    use crate::neurite::{PendingNeurite, TopologyRequest};
    use crate::random::FixedUniform;
    use dendra_data::{SegmentId, SomaId};
    use glam::DVec3;

    fn segment(rule: RuleKind, diameter: f64) -> Segment {
        Segment {
            id: SegmentId(0),
            soma: SomaId(0),
            mother: None,
            position: DVec3::new(0.0, 0.0, 6.0),
            spring_axis: DVec3::Z,
            diameter,
            daughter_left: None,
            daughter_right: None,
            can_branch: rule == RuleKind::Apical,
            rule,
            junction: None,
        }
    }

    fn apical() -> ApicalRule {
        ApicalRule::new(ApicalConfig::default(), Arc::new(ConstantGradient(DVec3::Z)))
    }

    fn basal() -> BasalRule {
        BasalRule::new(BasalConfig::default(), Arc::new(ConstantGradient(-DVec3::Z)))
    }

    #[test]
    fn test_apical_forced_branch() {
        let geometry = GeometryConfig::default();
        let mut seg = segment(RuleKind::Apical, 1.0);
        let mut n = PendingNeurite::new(&mut seg, &geometry);
        assert_eq!(apical().run(&mut n, &mut FixedUniform(0.0)), RuleOutcome::Branched);

        let Some(TopologyRequest::Branch { daughter, .. }) = n.into_request() else {
            panic!("expected a branch request");
        };
        assert_eq!(daughter.diameter, 0.65);
        assert!(!daughter.can_branch);
        assert!((seg.diameter - (1.0 - 0.00071)).abs() < 1e-12);
        assert!(seg.position.z > 6.0);
    }

    #[test]
    fn test_apical_inherit_branch_diameter() {
        let geometry = GeometryConfig::default();
        let mut config = ApicalConfig::default();
        config.branch.daughter_diameter = BranchDiameter::Inherit;
        let rule = ApicalRule::new(config, Arc::new(ConstantGradient(DVec3::Z)));

        let mut seg = segment(RuleKind::Apical, 1.0);
        let mut n = PendingNeurite::new(&mut seg, &geometry);
        rule.run(&mut n, &mut FixedUniform(0.0));
        let Some(TopologyRequest::Branch { daughter, .. }) = n.into_request() else {
            panic!("expected a branch request");
        };
        assert!((daughter.diameter - (1.0 - 0.00071)).abs() < 1e-12);
    }

    #[test]
    fn test_apical_without_branch_permission_only_elongates() {
        let geometry = GeometryConfig::default();
        let mut seg = segment(RuleKind::Apical, 1.0);
        seg.can_branch = false;
        let mut n = PendingNeurite::new(&mut seg, &geometry);
        assert_eq!(apical().run(&mut n, &mut FixedUniform(0.0)), RuleOutcome::Elongated);
        assert!(n.request().is_none());
    }

    #[test]
    fn test_forced_failure_never_splits() {
        let geometry = GeometryConfig::default();
        let mut seg = segment(RuleKind::Basal, 1.0);
        let mut n = PendingNeurite::new(&mut seg, &geometry);
        assert_eq!(basal().run(&mut n, &mut FixedUniform(1.0)), RuleOutcome::Elongated);
        assert!(n.request().is_none());
    }

    #[test]
    fn test_basal_forced_bifurcation_pays_penalty() {
        let geometry = GeometryConfig::default();
        let mut seg = segment(RuleKind::Basal, 1.0);
        let mut n = PendingNeurite::new(&mut seg, &geometry);
        assert_eq!(basal().run(&mut n, &mut FixedUniform(0.0)), RuleOutcome::Bifurcated);
        assert!(matches!(n.into_request(), Some(TopologyRequest::Bifurcate { .. })));
        assert!((seg.diameter - (1.0 - 0.00085 - 0.01)).abs() < 1e-12);
    }

    #[test]
    fn test_thin_tip_is_dormant_and_untouched() {
        let geometry = GeometryConfig::default();
        let mut seg = segment(RuleKind::Apical, 0.5);
        let before = seg.clone();
        let mut n = PendingNeurite::new(&mut seg, &geometry);
        assert_eq!(apical().run(&mut n, &mut FixedUniform(0.0)), RuleOutcome::Dormant);
        drop(n);
        assert_eq!(seg, before);
    }

    #[test]
    fn test_non_terminal_is_inactive() {
        let geometry = GeometryConfig::default();
        let mut seg = segment(RuleKind::Basal, 1.0);
        seg.daughter_left = Some(SegmentId(1));
        let before = seg.clone();
        let mut n = PendingNeurite::new(&mut seg, &geometry);
        assert_eq!(basal().run(&mut n, &mut FixedUniform(0.0)), RuleOutcome::Inactive);
        drop(n);
        assert_eq!(seg, before);
    }

    #[test]
    fn test_state_of() {
        let rule = GrowthRule::Apical(apical());
        let mut seg = segment(RuleKind::Apical, 1.0);
        assert_eq!(rule.state_of(&seg), GrowthState::Growing);
        seg.diameter = 0.5;
        assert_eq!(rule.state_of(&seg), GrowthState::Dormant);
        seg.junction = Some(Junction::Branch);
        assert_eq!(rule.state_of(&seg), GrowthState::Branched);
    }

    #[test]
    fn test_bind_requires_substance() {
        let config = AppConfig::default();
        assert!(GrowthRule::bind(RuleKind::Apical, &config, &FieldRegistry::new()).is_err());

        let registry = FieldRegistry::from_config(&config.substances, &config.world).unwrap();
        let rules = RuleSet::bind(&config, &registry).unwrap();
        assert_eq!(rules.get(RuleKind::Basal).kind(), RuleKind::Basal);
        assert_eq!(rules.get(RuleKind::Apical).growth_threshold(), 0.5);
    }
}
