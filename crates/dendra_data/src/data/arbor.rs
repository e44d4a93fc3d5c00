//! Container owning every soma and segment of a run.
//!
//! Ids are indices into the two vectors. Creation only ever appends, so an
//! id stays valid for the whole run and segments are never destroyed.

use super::kinds::{Junction, RuleKind};
use super::segment::{Segment, SegmentId};
use super::soma::{Soma, SomaId};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Everything needed to append a segment; the arbor assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDraft {
    pub soma: SomaId,
    pub mother: Option<SegmentId>,
    pub position: DVec3,
    pub spring_axis: DVec3,
    pub diameter: f64,
    pub can_branch: bool,
    pub rule: RuleKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arbor {
    pub somas: Vec<Soma>,
    pub segments: Vec<Segment>,
}

impl Arbor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_soma(&mut self, position: DVec3, diameter: f64) -> SomaId {
        let id = SomaId(self.somas.len());
        self.somas.push(Soma::new(id, position, diameter));
        id
    }

    /// Appends a terminal segment. Linking it to a mother or soma is the
    /// caller's job ([`Arbor::attach_root`], [`Arbor::attach_daughters`]).
    pub fn push_segment(&mut self, draft: SegmentDraft) -> SegmentId {
        let id = SegmentId(self.segments.len());
        self.segments.push(Segment {
            id,
            soma: draft.soma,
            mother: draft.mother,
            position: draft.position,
            spring_axis: draft.spring_axis,
            diameter: draft.diameter,
            daughter_left: None,
            daughter_right: None,
            can_branch: draft.can_branch,
            rule: draft.rule,
            junction: None,
        });
        id
    }

    /// Registers `segment` as the next root of `soma`.
    pub fn attach_root(&mut self, soma: SomaId, segment: SegmentId) {
        if let Some(s) = self.somas.get_mut(soma.index()) {
            s.daughters.push(segment);
        }
    }

    /// Fills both daughter slots of a terminal `parent` at once.
    ///
    /// Returns `false` (and changes nothing) if the parent is unknown or
    /// already has daughters.
    pub fn attach_daughters(
        &mut self,
        parent: SegmentId,
        left: Option<SegmentId>,
        right: Option<SegmentId>,
        junction: Junction,
    ) -> bool {
        match self.segments.get_mut(parent.index()) {
            Some(p) if p.is_terminal() => {
                p.daughter_left = left;
                p.daughter_right = right;
                p.junction = Some(junction);
                true
            }
            _ => false,
        }
    }

    #[inline]
    #[must_use]
    pub fn soma(&self, id: SomaId) -> Option<&Soma> {
        self.somas.get(id.index())
    }

    #[inline]
    #[must_use]
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    #[inline]
    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.get_mut(id.index())
    }

    /// Root segments of a soma in extension order (empty for unknown ids).
    #[must_use]
    pub fn roots(&self, soma: SomaId) -> &[SegmentId] {
        self.soma(soma).map_or(&[], |s| s.daughters.as_slice())
    }

    pub fn terminals(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_terminal())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(soma: SomaId, mother: Option<SegmentId>) -> SegmentDraft {
        SegmentDraft {
            soma,
            mother,
            position: DVec3::new(0.0, 0.0, 6.0),
            spring_axis: DVec3::Z,
            diameter: 1.0,
            can_branch: true,
            rule: RuleKind::Apical,
        }
    }

    #[test]
    fn test_ids_are_sequential_indices() {
        let mut arbor = Arbor::new();
        let soma = arbor.add_soma(DVec3::ZERO, 10.0);
        let a = arbor.push_segment(draft(soma, None));
        let b = arbor.push_segment(draft(soma, Some(a)));
        assert_eq!(soma, SomaId(0));
        assert_eq!((a, b), (SegmentId(0), SegmentId(1)));
        assert_eq!(arbor.len(), 2);
    }

    #[test]
    fn test_attach_root_keeps_order() {
        let mut arbor = Arbor::new();
        let soma = arbor.add_soma(DVec3::ZERO, 10.0);
        let a = arbor.push_segment(draft(soma, None));
        let b = arbor.push_segment(draft(soma, None));
        arbor.attach_root(soma, b);
        arbor.attach_root(soma, a);
        assert_eq!(arbor.roots(soma), &[b, a]);
        assert!(arbor.roots(SomaId(9)).is_empty());
    }

    #[test]
    fn test_attach_daughters_only_once() {
        let mut arbor = Arbor::new();
        let soma = arbor.add_soma(DVec3::ZERO, 10.0);
        let p = arbor.push_segment(draft(soma, None));
        let l = arbor.push_segment(draft(soma, Some(p)));
        let r = arbor.push_segment(draft(soma, Some(p)));

        assert!(arbor.attach_daughters(p, Some(l), Some(r), Junction::Branch));
        assert!(!arbor.attach_daughters(p, Some(r), None, Junction::Continuation));

        let parent = arbor.segment(p).unwrap();
        assert_eq!(parent.daughter_left, Some(l));
        assert_eq!(parent.daughter_right, Some(r));
        assert_eq!(parent.junction, Some(Junction::Branch));
        assert_eq!(arbor.terminals().count(), 2);
    }
}
