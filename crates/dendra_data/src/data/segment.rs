use super::kinds::{Junction, RuleKind};
use super::soma::SomaId;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a segment inside an [`crate::Arbor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub usize);

impl SegmentId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment#{}", self.0)
    }
}

/// One straight cylinder of a neurite tree.
///
/// `position` is the distal end (the point that moves when the tip
/// elongates); `spring_axis` runs from the proximal end to `position`, so its
/// length is the segment length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Owning cell, resolved through the arbor.
    pub soma: SomaId,
    /// `None` for roots attached directly to the soma.
    pub mother: Option<SegmentId>,
    pub position: DVec3,
    pub spring_axis: DVec3,
    pub diameter: f64,
    pub daughter_left: Option<SegmentId>,
    pub daughter_right: Option<SegmentId>,
    pub can_branch: bool,
    pub rule: RuleKind,
    pub junction: Option<Junction>,
}

impl Segment {
    /// A segment is terminal until it gains its first daughter.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.daughter_left.is_none() && self.daughter_right.is_none()
    }

    #[inline]
    #[must_use]
    pub fn proximal_end(&self) -> DVec3 {
        self.position - self.spring_axis
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.spring_axis.length()
    }

    /// Unit growth direction, zero for a degenerate segment.
    #[inline]
    #[must_use]
    pub fn unit_axis(&self) -> DVec3 {
        self.spring_axis.normalize_or_zero()
    }

    #[must_use]
    pub fn daughter_count(&self) -> usize {
        usize::from(self.daughter_left.is_some()) + usize::from(self.daughter_right.is_some())
    }

    pub fn daughters(&self) -> impl Iterator<Item = SegmentId> {
        self.daughter_left.into_iter().chain(self.daughter_right)
    }
}
