use crate::neurite::NeuriteOps;

/// Reduces the diameter by `decrement`. A negative decrement is ignored, so
/// the diameter never increases.
pub fn shrink<N: NeuriteOps + ?Sized>(neurite: &mut N, decrement: f64) {
    let d = neurite.diameter();
    neurite.set_diameter(d - decrement.max(0.0));
}
