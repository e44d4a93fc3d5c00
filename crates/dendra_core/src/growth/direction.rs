//! Persistence + noise + chemotaxis direction model.

use crate::config::GrowthParams;
use crate::field::GradientField;
use crate::neurite::NeuriteOps;
use crate::random::UniformSource;
use glam::DVec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionWeights {
    pub old_direction: f64,
    pub gradient: f64,
    pub randomness: f64,
}

impl From<&GrowthParams> for DirectionWeights {
    fn from(params: &GrowthParams) -> Self {
        Self {
            old_direction: params.old_direction_weight,
            gradient: params.gradient_weight,
            randomness: params.randomness_weight,
        }
    }
}

/// Weighted sum of the current axis, a random axis and the local gradient.
/// The result is not normalised.
pub fn next_direction<U: UniformSource + ?Sized>(
    spring_axis: DVec3,
    gradient: DVec3,
    weights: DirectionWeights,
    rng: &mut U,
) -> DVec3 {
    let random_axis = rng.uniform_vec3(-1.0, 1.0);
    spring_axis * weights.old_direction + random_axis * weights.randomness + gradient * weights.gradient
}

/// Picks the next direction and asks the segment to elongate along it.
pub fn grow<N, U>(neurite: &mut N, field: &dyn GradientField, params: &GrowthParams, rng: &mut U)
where
    N: NeuriteOps + ?Sized,
    U: UniformSource + ?Sized,
{
    let gradient = field.gradient(neurite.position());
    let direction = next_direction(neurite.spring_axis(), gradient, params.into(), rng);
    neurite.elongate_terminal_end(params.speed, direction);
}
