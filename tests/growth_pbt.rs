use dendra_lib::model::config::AppConfig;
use dendra_lib::model::export::{export_soma, parse_swc, render, validate_records};
use dendra_lib::model::Simulation;
use proptest::prelude::*;

prop_compose! {
    fn arb_config()(
        seed in any::<u64>(),
        count in 1usize..4,
        branch_probability in 0.0f64..0.5,
        bifurcation_probability in 0.0f64..0.05,
        penalty in 0.0f64..0.05,
    ) -> AppConfig {
        let mut config = AppConfig::default();
        config.world.seed = seed;
        config.cells.count = count;
        config.apical.branch.probability = branch_probability;
        config.basal.bifurcation.probability = bifurcation_probability;
        config.basal.bifurcation.diameter_penalty = penalty;
        config
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_diameters_never_increase(config in arb_config(), steps in 1u64..60) {
        let mut sim = Simulation::from_config(&config).unwrap();
        let mut previous: Vec<f64> = sim.arbor.segments.iter().map(|s| s.diameter).collect();
        for _ in 0..steps {
            sim.step();
            for (before, seg) in previous.iter().zip(&sim.arbor.segments) {
                prop_assert!(seg.diameter <= *before, "{} grew thicker", seg.id);
            }
            previous = sim.arbor.segments.iter().map(|s| s.diameter).collect();
        }
    }

    #[test]
    fn test_topology_is_append_only(config in arb_config(), steps in 1u64..60) {
        let mut sim = Simulation::from_config(&config).unwrap();
        let mut had_daughters = vec![false; sim.arbor.len()];
        for _ in 0..steps {
            sim.step();
            for seg in &sim.arbor.segments {
                prop_assert!(seg.daughter_count() <= 2);
                if had_daughters.get(seg.id.index()).copied().unwrap_or(false) {
                    prop_assert!(!seg.is_terminal(), "{} became terminal again", seg.id);
                }
                for d in seg.daughters() {
                    prop_assert!(d > seg.id);
                    prop_assert_eq!(sim.arbor.segment(d).unwrap().mother, Some(seg.id));
                }
            }
            had_daughters = sim.arbor.segments.iter().map(|s| !s.is_terminal()).collect();
        }
    }

    #[test]
    fn test_export_labels_are_well_formed(config in arb_config(), steps in 0u64..80) {
        let mut sim = Simulation::from_config(&config).unwrap();
        for _ in 0..steps {
            sim.step();
        }
        for soma in &sim.arbor.somas {
            let records = export_soma(&sim.arbor, soma.id).unwrap();
            prop_assert!(validate_records(&records).is_ok());
            prop_assert_eq!(records[1].label, 2);

            let reparsed = parse_swc(&render(&records)).unwrap();
            prop_assert_eq!(reparsed.len(), records.len());
        }
    }
}
