//! # Dendra Data
//!
//! Plain, serialisable data shared by every dendra crate: identifiers,
//! neurite segments, somas and the [`Arbor`] store that owns them.
//!
//! Nothing in here knows how a neurite grows. Growth lives in `dendra_core`,
//! export in `dendra_io`.

pub mod data;

pub use data::arbor::{Arbor, SegmentDraft};
pub use data::kinds::{Junction, RuleKind, SubstanceId};
pub use data::segment::{Segment, SegmentId};
pub use data::soma::{Soma, SomaId};
pub use glam::DVec3;
