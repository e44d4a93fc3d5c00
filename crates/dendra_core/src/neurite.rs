//! The segment operations a growth rule may call.
//!
//! Rules are written against [`NeuriteOps`] only. During a step the
//! implementation is a [`PendingNeurite`]: it edits the segment's own
//! geometry in place and records a split as a [`TopologyRequest`], which the
//! scheduler commits after the sweep. New daughters therefore never take
//! part in the step that created them.

use crate::config::GeometryConfig;
use crate::random::UniformSource;
use crate::vector::{perp3, rot_around_axis};
use dendra_data::Segment;
use glam::DVec3;

/// Properties of the side branch requested by [`NeuriteOps::branch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaughterSpec {
    pub diameter: f64,
    pub can_branch: bool,
}

/// Structural change requested during a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TopologyRequest {
    /// Side branch along `direction`; the tip continues as the other daughter.
    Branch {
        direction: DVec3,
        daughter: DaughterSpec,
    },
    /// Two symmetric daughters along the given directions (left, right).
    Bifurcate { directions: [DVec3; 2] },
}

pub trait NeuriteOps {
    fn is_terminal(&self) -> bool;
    fn diameter(&self) -> f64;
    fn set_diameter(&mut self, diameter: f64);
    fn position(&self) -> DVec3;
    fn spring_axis(&self) -> DVec3;
    fn unit_axis(&self) -> DVec3;
    fn can_branch(&self) -> bool;

    /// Moves the distal end along `direction`. No-op on non-terminal segments.
    fn elongate_terminal_end(&mut self, speed: f64, direction: DVec3);

    /// Requests a side branch; the segment stops being terminal.
    fn branch(&mut self, direction: DVec3, daughter: DaughterSpec);

    /// Requests a symmetric split; the segment stops being terminal.
    fn bifurcate<U: UniformSource + ?Sized>(&mut self, rng: &mut U);
}

/// A segment being updated inside a sweep.
#[derive(Debug)]
pub struct PendingNeurite<'a> {
    segment: &'a mut Segment,
    geometry: &'a GeometryConfig,
    request: Option<TopologyRequest>,
}

impl<'a> PendingNeurite<'a> {
    pub fn new(segment: &'a mut Segment, geometry: &'a GeometryConfig) -> Self {
        Self {
            segment,
            geometry,
            request: None,
        }
    }

    #[must_use]
    pub fn request(&self) -> Option<&TopologyRequest> {
        self.request.as_ref()
    }

    #[must_use]
    pub fn into_request(self) -> Option<TopologyRequest> {
        self.request
    }
}

impl NeuriteOps for PendingNeurite<'_> {
    fn is_terminal(&self) -> bool {
        self.segment.is_terminal() && self.request.is_none()
    }

    fn diameter(&self) -> f64 {
        self.segment.diameter
    }

    fn set_diameter(&mut self, diameter: f64) {
        self.segment.diameter = diameter;
    }

    fn position(&self) -> DVec3 {
        self.segment.position
    }

    fn spring_axis(&self) -> DVec3 {
        self.segment.spring_axis
    }

    fn unit_axis(&self) -> DVec3 {
        self.segment.unit_axis()
    }

    fn can_branch(&self) -> bool {
        self.segment.can_branch
    }

    fn elongate_terminal_end(&mut self, speed: f64, direction: DVec3) {
        if !self.is_terminal() || direction.dot(self.segment.spring_axis) <= 0.0 {
            return;
        }
        let proximal = self.segment.proximal_end();
        let displacement = direction.normalize_or_zero() * speed * self.geometry.time_step;
        self.segment.position += displacement;
        self.segment.spring_axis = self.segment.position - proximal;
    }

    fn branch(&mut self, direction: DVec3, daughter: DaughterSpec) {
        if self.is_terminal() {
            self.request = Some(TopologyRequest::Branch {
                direction,
                daughter,
            });
        }
    }

    fn bifurcate<U: UniformSource + ?Sized>(&mut self, rng: &mut U) {
        if !self.is_terminal() {
            return;
        }
        let axis = self.segment.spring_axis;
        let plane = perp3(axis, rng.uniform());
        let half = self.geometry.bifurcation_angle * 0.5;
        self.request = Some(TopologyRequest::Bifurcate {
            directions: [
                rot_around_axis(axis, half, plane),
                rot_around_axis(axis, -half, plane),
            ],
        });
    }
}
