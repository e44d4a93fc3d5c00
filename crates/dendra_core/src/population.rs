//! Places somas and their initial neurites.

use crate::config::AppConfig;
use crate::random::UniformSource;
use crate::topology::extend_new_neurite;
use dendra_data::{Arbor, RuleKind, SomaId};
use glam::DVec3;

/// Adds one pyramidal cell at `position`: an apical neurite that may branch
/// and the configured basal neurites that may not.
pub fn build_cell(arbor: &mut Arbor, position: DVec3, config: &AppConfig) -> SomaId {
    let soma = arbor.add_soma(position, config.cells.soma_diameter);
    let geometry = &config.geometry;

    let roots = std::iter::once((config.cells.apical_direction, RuleKind::Apical, true)).chain(
        config
            .cells
            .basal_directions
            .iter()
            .map(|dir| (*dir, RuleKind::Basal, false)),
    );
    for (dir, rule, can_branch) in roots {
        let direction = DVec3::from_array(dir);
        if extend_new_neurite(arbor, soma, direction, rule, can_branch, geometry).is_none() {
            tracing::warn!(soma = %soma, ?direction, ?rule, "Skipped root neurite with degenerate direction");
        }
    }
    soma
}

/// Scatters `cells.count` cells uniformly inside the world box.
pub fn populate<U: UniformSource + ?Sized>(
    arbor: &mut Arbor,
    config: &AppConfig,
    rng: &mut U,
) -> Vec<SomaId> {
    let (lo, hi) = (config.world.min_bound, config.world.max_bound);
    let somas: Vec<SomaId> = (0..config.cells.count)
        .map(|_| {
            let position = rng.uniform_vec3(lo, hi);
            build_cell(arbor, position, config)
        })
        .collect();
    tracing::info!(cells = somas.len(), segments = arbor.len(), "Population seeded");
    somas
}
