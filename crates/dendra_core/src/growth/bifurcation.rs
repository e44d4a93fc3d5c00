//! Symmetric splitting gate used by the basal rule.

use crate::config::BifurcationConfig;
use crate::neurite::NeuriteOps;
use crate::random::UniformSource;

pub fn eligible<N: NeuriteOps + ?Sized>(neurite: &N, cfg: &BifurcationConfig) -> bool {
    neurite.is_terminal() && neurite.diameter() > cfg.threshold
}

/// Splits the tip with probability `cfg.probability`, paying
/// `cfg.diameter_penalty` first.
pub fn try_bifurcate<N, U>(neurite: &mut N, cfg: &BifurcationConfig, rng: &mut U) -> bool
where
    N: NeuriteOps,
    U: UniformSource + ?Sized,
{
    if !eligible(neurite, cfg) || rng.uniform() >= cfg.probability {
        return false;
    }
    let d = neurite.diameter();
    neurite.set_diameter(d - cfg.diameter_penalty);
    neurite.bifurcate(rng);
    true
}
