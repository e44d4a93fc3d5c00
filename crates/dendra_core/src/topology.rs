//! Structural edits to the arbor: new roots, committed splits and
//! discretisation of over-long tips.

use crate::config::GeometryConfig;
use crate::neurite::TopologyRequest;
use dendra_data::{Arbor, Junction, RuleKind, SegmentDraft, SegmentId, SomaId};
use glam::DVec3;

/// Share of a discretised segment handed to its continuation.
pub const DISCRETIZATION_DISTAL_PORTION: f64 = 0.1;

/// Grows a new root neurite from the soma surface along `direction`.
///
/// Returns `None` for an unknown soma or a zero direction.
pub fn extend_new_neurite(
    arbor: &mut Arbor,
    soma: SomaId,
    direction: DVec3,
    rule: RuleKind,
    can_branch: bool,
    geometry: &GeometryConfig,
) -> Option<SegmentId> {
    let unit = direction.try_normalize()?;
    let body = arbor.soma(soma)?;
    let proximal = body.position + unit * body.radius();
    let spring_axis = unit * geometry.neurite_default_length;

    let id = arbor.push_segment(SegmentDraft {
        soma,
        mother: None,
        position: proximal + spring_axis,
        spring_axis,
        diameter: geometry.neurite_default_diameter,
        can_branch,
        rule,
    });
    arbor.attach_root(soma, id);
    Some(id)
}

/// Commits a split recorded during the sweep. Returns the new segments
/// (left first); empty if the parent is gone or no longer terminal.
pub fn apply_request(
    arbor: &mut Arbor,
    parent: SegmentId,
    request: &TopologyRequest,
    geometry: &GeometryConfig,
) -> Vec<SegmentId> {
    let Some(p) = arbor.segment(parent).filter(|s| s.is_terminal()).cloned() else {
        return Vec::new();
    };

    match *request {
        TopologyRequest::Branch {
            direction,
            daughter,
        } => {
            let half = p.spring_axis * 0.5;
            let split_point = p.position - half;

            let left = arbor.push_segment(SegmentDraft {
                soma: p.soma,
                mother: Some(parent),
                position: p.position,
                spring_axis: half,
                diameter: p.diameter,
                can_branch: p.can_branch,
                rule: p.rule,
            });
            let side_axis = direction.normalize_or_zero() * geometry.neurite_default_length;
            let right = arbor.push_segment(SegmentDraft {
                soma: p.soma,
                mother: Some(parent),
                position: split_point + side_axis,
                spring_axis: side_axis,
                diameter: daughter.diameter,
                can_branch: daughter.can_branch,
                rule: p.rule,
            });

            if let Some(seg) = arbor.segment_mut(parent) {
                seg.position = split_point;
                seg.spring_axis = half;
            }
            arbor.attach_daughters(parent, Some(left), Some(right), Junction::Branch);
            tracing::debug!(parent = %parent, left = %left, right = %right, "Branch committed");
            vec![left, right]
        }
        TopologyRequest::Bifurcate { directions } => {
            let [left, right] = directions.map(|dir| {
                let axis = dir.normalize_or_zero() * geometry.neurite_default_length;
                arbor.push_segment(SegmentDraft {
                    soma: p.soma,
                    mother: Some(parent),
                    position: p.position + axis,
                    spring_axis: axis,
                    diameter: p.diameter,
                    can_branch: p.can_branch,
                    rule: p.rule,
                })
            });
            arbor.attach_daughters(parent, Some(left), Some(right), Junction::Bifurcation);
            tracing::debug!(parent = %parent, left = %left, right = %right, "Bifurcation committed");
            vec![left, right]
        }
    }
}

/// Splits every terminal segment longer than `neurite_max_length`.
pub fn discretize(arbor: &mut Arbor, geometry: &GeometryConfig) -> Vec<SegmentId> {
    let long: Vec<SegmentId> = arbor
        .terminals()
        .filter(|s| s.length() > geometry.neurite_max_length)
        .map(|s| s.id)
        .collect();

    let mut created = Vec::with_capacity(long.len());
    for parent in long {
        let Some(p) = arbor.segment(parent).cloned() else {
            continue;
        };
        let distal = p.spring_axis * DISCRETIZATION_DISTAL_PORTION;
        let child = arbor.push_segment(SegmentDraft {
            soma: p.soma,
            mother: Some(parent),
            position: p.position,
            spring_axis: distal,
            diameter: p.diameter,
            can_branch: p.can_branch,
            rule: p.rule,
        });
        if let Some(seg) = arbor.segment_mut(parent) {
            seg.position -= distal;
            seg.spring_axis -= distal;
        }
        arbor.attach_daughters(parent, Some(child), None, Junction::Continuation);
        created.push(child);
    }
    created
}
