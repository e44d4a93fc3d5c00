//! Side-branching gate used by the apical rule.

use crate::config::BranchConfig;
use crate::neurite::{DaughterSpec, NeuriteOps};
use crate::random::UniformSource;
use crate::vector::perp3;

/// Whether the deterministic branch predicates hold.
pub fn eligible<N: NeuriteOps + ?Sized>(neurite: &N, cfg: &BranchConfig) -> bool {
    neurite.is_terminal() && neurite.can_branch() && neurite.diameter() > cfg.threshold
}

/// Requests a side branch with probability `cfg.probability`.
///
/// The probability draw is only taken when the segment is eligible.
pub fn try_branch<N, U>(neurite: &mut N, cfg: &BranchConfig, rng: &mut U) -> bool
where
    N: NeuriteOps + ?Sized,
    U: UniformSource + ?Sized,
{
    if !eligible(neurite, cfg) || rng.uniform() >= cfg.probability {
        return false;
    }
    let noise = rng.uniform_vec3(-cfg.noise, cfg.noise);
    let angle = rng.uniform_range(0.0, 1.0);
    let direction = perp3(neurite.unit_axis() + noise, angle) + neurite.spring_axis();
    let daughter = DaughterSpec {
        diameter: cfg.daughter_diameter.resolve(neurite.diameter()),
        can_branch: false,
    };
    neurite.branch(direction, daughter);
    true
}
