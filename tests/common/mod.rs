use dendra_lib::model::config::AppConfig;
use dendra_lib::model::field::{ConstantGradient, FieldRegistry, GradientField};
use dendra_lib::model::state::{Arbor, DVec3, RuleKind, SegmentId, SomaId, SubstanceId};
use dendra_lib::model::topology::extend_new_neurite;
use dendra_lib::model::{RuleSet, Simulation};
use std::sync::Arc;

struct NeuriteSpec {
    soma: usize,
    direction: DVec3,
    rule: RuleKind,
    can_branch: bool,
}

/// Hand-placed cells growing in uniform fields.
#[allow(dead_code)]
pub struct ArborBuilder {
    config: AppConfig,
    somas: Vec<(DVec3, f64)>,
    neurites: Vec<NeuriteSpec>,
    fields: FieldRegistry,
}

#[allow(dead_code)]
impl ArborBuilder {
    pub fn new() -> Self {
        let mut fields = FieldRegistry::new();
        fields.insert(SubstanceId::Apical, Arc::new(ConstantGradient(DVec3::Z)));
        fields.insert(SubstanceId::Basal, Arc::new(ConstantGradient(-DVec3::Z)));
        Self {
            config: AppConfig::default(),
            somas: Vec::new(),
            neurites: Vec::new(),
            fields,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_field(mut self, id: SubstanceId, field: Arc<dyn GradientField>) -> Self {
        self.fields.insert(id, field);
        self
    }

    pub fn with_soma(mut self, position: DVec3, diameter: f64) -> Self {
        self.somas.push((position, diameter));
        self
    }

    /// Root neurite on the most recently added soma.
    pub fn with_neurite(mut self, direction: DVec3, rule: RuleKind, can_branch: bool) -> Self {
        let soma = self.somas.len().saturating_sub(1);
        self.neurites.push(NeuriteSpec {
            soma,
            direction,
            rule,
            can_branch,
        });
        self
    }

    pub fn build(self) -> Simulation {
        let mut arbor = Arbor::new();
        for (position, diameter) in &self.somas {
            arbor.add_soma(*position, *diameter);
        }
        for n in &self.neurites {
            extend_new_neurite(
                &mut arbor,
                SomaId(n.soma),
                n.direction,
                n.rule,
                n.can_branch,
                &self.config.geometry,
            )
            .expect("neurite on a known soma");
        }
        let rules = RuleSet::bind(&self.config, &self.fields).expect("fields for both rules");
        Simulation::new(arbor, rules, self.config.geometry, self.config.world.seed)
    }
}

/// Soma at the origin (d = 10) with one apical neurite along +z.
#[allow(dead_code)]
pub fn single_apical() -> (Simulation, SegmentId) {
    let sim = ArborBuilder::new()
        .with_soma(DVec3::ZERO, 10.0)
        .with_neurite(DVec3::Z, RuleKind::Apical, true)
        .build();
    (sim, SegmentId(0))
}

/// Diameter of every segment, indexed by id.
#[allow(dead_code)]
pub fn diameters(sim: &Simulation) -> Vec<f64> {
    sim.arbor.segments.iter().map(|s| s.diameter).collect()
}
