use super::segment::SegmentId;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a soma inside an [`crate::Arbor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SomaId(pub usize);

impl SomaId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SomaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "soma#{}", self.0)
    }
}

/// Cell body anchoring one or more neurite trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soma {
    pub id: SomaId,
    pub position: DVec3,
    pub diameter: f64,
    /// Root segments in extension order.
    pub daughters: Vec<SegmentId>,
}

impl Soma {
    #[must_use]
    pub fn new(id: SomaId, position: DVec3, diameter: f64) -> Self {
        Self {
            id,
            position,
            diameter,
            daughters: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}
