//! SWC morphology export.
//!
//! One file per soma, one line per record:
//! `label type x y z radius parent`. Coordinates are relative to the soma,
//! the soma itself is record `1` with parent `-1`.
//!
//! Labels come from a counter local to each export. A segment with a right
//! daughter is written twice: once before its right subtree and once, under
//! a fresh label, before its left subtree. Downstream tools rely on this
//! numbering, so it is kept as is.

use crate::error::{IoError, Result};
use dendra_data::{Arbor, Segment, SegmentId, SomaId};
use glam::DVec3;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};

/// Structure identifiers of the SWC format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwcKind {
    Undefined,
    Soma,
    Axon,
    Dendrite,
    ApicalDendrite,
    ForkPoint,
    EndPoint,
    Custom,
}

impl SwcKind {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            SwcKind::Undefined => 0,
            SwcKind::Soma => 1,
            SwcKind::Axon => 2,
            SwcKind::Dendrite => 3,
            SwcKind::ApicalDendrite => 4,
            SwcKind::ForkPoint => 5,
            SwcKind::EndPoint => 6,
            SwcKind::Custom => 7,
        }
    }
}

impl TryFrom<u8> for SwcKind {
    type Error = IoError;

    fn try_from(code: u8) -> Result<Self> {
        Ok(match code {
            0 => SwcKind::Undefined,
            1 => SwcKind::Soma,
            2 => SwcKind::Axon,
            3 => SwcKind::Dendrite,
            4 => SwcKind::ApicalDendrite,
            5 => SwcKind::ForkPoint,
            6 => SwcKind::EndPoint,
            7 => SwcKind::Custom,
            other => return Err(IoError::validation(format!("unknown SWC type {other}"))),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwcRecord {
    pub label: u64,
    pub kind: SwcKind,
    pub position: DVec3,
    pub radius: f64,
    /// `-1` for the soma.
    pub parent: i64,
}

impl fmt::Display for SwcRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.label,
            self.kind.code(),
            self.position.x,
            self.position.y,
            self.position.z,
            self.radius,
            self.parent
        )
    }
}

/// Label source for one export. Starts at the soma label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelCounter(u64);

impl Default for LabelCounter {
    fn default() -> Self {
        Self(1)
    }
}

impl LabelCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }

    #[must_use]
    pub fn current(&self) -> u64 {
        self.0
    }
}

enum Visit {
    Enter { segment: SegmentId, parent: i64 },
    AfterRight { segment: SegmentId, parent: i64 },
}

fn record(label: u64, kind: SwcKind, segment: &Segment, origin: DVec3, parent: i64) -> SwcRecord {
    SwcRecord {
        label,
        kind,
        position: segment.position - origin,
        radius: segment.diameter / 2.0,
        parent,
    }
}

/// Records of one soma's tree, soma first.
pub fn export_soma(arbor: &Arbor, soma: SomaId) -> Result<Vec<SwcRecord>> {
    let body = arbor
        .soma(soma)
        .ok_or_else(|| IoError::not_found(soma.to_string()))?;
    let origin = body.position;
    let lookup = |id: SegmentId| {
        arbor
            .segment(id)
            .ok_or_else(|| IoError::not_found(id.to_string()))
    };

    let mut records = vec![SwcRecord {
        label: 1,
        kind: SwcKind::Soma,
        position: DVec3::ZERO,
        radius: body.radius(),
        parent: -1,
    }];
    let mut counter = LabelCounter::new();
    let mut stack = Vec::new();

    for &root in &body.daughters {
        stack.push(Visit::Enter {
            segment: root,
            parent: 1,
        });
        while let Some(visit) = stack.pop() {
            let (seg, parent) = match visit {
                Visit::Enter { segment, parent } => {
                    let seg = lookup(segment)?;
                    let label = counter.advance();
                    if let Some(right) = seg.daughter_right {
                        records.push(record(label, SwcKind::Dendrite, seg, origin, parent));
                        stack.push(Visit::AfterRight { segment, parent });
                        stack.push(Visit::Enter {
                            segment: right,
                            parent: label as i64,
                        });
                        continue;
                    }
                    (seg, parent)
                }
                Visit::AfterRight { segment, parent } => {
                    counter.advance();
                    (lookup(segment)?, parent)
                }
            };

            let label = counter.current();
            if let Some(left) = seg.daughter_left {
                records.push(record(label, SwcKind::Dendrite, seg, origin, parent));
                stack.push(Visit::Enter {
                    segment: left,
                    parent: label as i64,
                });
            } else if seg.is_terminal() {
                records.push(record(label, SwcKind::EndPoint, seg, origin, parent));
            }
        }
    }
    Ok(records)
}

/// One line per record, each terminated by `\n`.
#[must_use]
pub fn render(records: &[SwcRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 48);
    for r in records {
        out.push_str(&r.to_string());
        out.push('\n');
    }
    out
}

#[must_use]
pub fn file_name(prefix: &str, soma: SomaId, seed: u64) -> String {
    format!("{prefix}{}_seed{seed}.swc", soma.index())
}

/// Writes `{prefix}{index}_seed{seed}.swc` into `dir`.
pub fn write_soma_file(
    arbor: &Arbor,
    soma: SomaId,
    dir: &Path,
    prefix: &str,
    seed: u64,
) -> Result<PathBuf> {
    let records = export_soma(arbor, soma)?;
    let path = dir.join(file_name(prefix, soma, seed));
    std::fs::write(&path, render(&records))
        .map_err(|e| IoError::FileSystem(e).with_context(format!("writing {}", path.display())))?;
    tracing::debug!(soma = %soma, records = records.len(), path = %path.display(), "SWC written");
    Ok(path)
}

/// Exports every soma of the arbor; files are returned in soma order.
pub fn export_all(arbor: &Arbor, dir: &Path, prefix: &str, seed: u64) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("creating {}", dir.display())))?;
    let files = arbor
        .somas
        .par_iter()
        .map(|soma| write_soma_file(arbor, soma.id, dir, prefix, seed))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(files = files.len(), dir = %dir.display(), "Morphologies exported");
    Ok(files)
}

/// Parses SWC text. Blank lines and `#` comments are skipped.
pub fn parse_swc(text: &str) -> Result<Vec<SwcRecord>> {
    let mut records = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 7 {
            return Err(IoError::validation(format!(
                "line {}: expected 7 fields, found {}",
                n + 1,
                fields.len()
            )));
        }
        let bad = |what: &str| IoError::validation(format!("line {}: invalid {what}", n + 1));
        let float = |i: usize, what: &str| fields[i].parse::<f64>().map_err(|_| bad(what));

        let label = fields[0].parse::<u64>().map_err(|_| bad("label"))?;
        let code = fields[1].parse::<u8>().map_err(|_| bad("type"))?;
        records.push(SwcRecord {
            label,
            kind: SwcKind::try_from(code)?,
            position: DVec3::new(float(2, "x")?, float(3, "y")?, float(4, "z")?),
            radius: float(5, "radius")?,
            parent: fields[6].parse::<i64>().map_err(|_| bad("parent"))?,
        });
    }
    Ok(records)
}

/// Checks the structure of an exported tree: a soma root labelled 1,
/// strictly increasing labels, and parents that were written earlier.
pub fn validate_records(records: &[SwcRecord]) -> Result<()> {
    let Some(first) = records.first() else {
        return Err(IoError::validation("no records"));
    };
    if first.label != 1 || first.kind != SwcKind::Soma || first.parent != -1 {
        return Err(IoError::validation("first record must be soma 1 with parent -1"));
    }
    if let Some(second) = records.get(1) {
        if second.label != 2 {
            return Err(IoError::validation(format!(
                "first segment label is {}, expected 2",
                second.label
            )));
        }
    }

    let mut seen = std::collections::HashSet::with_capacity(records.len());
    let mut last = 0;
    for r in records {
        if r.label <= last {
            return Err(IoError::validation(format!(
                "label {} does not increase after {last}",
                r.label
            )));
        }
        if !(r.position.is_finite() && r.radius.is_finite()) {
            return Err(IoError::validation(format!("record {} is not finite", r.label)));
        }
        if r.label != 1 && (r.parent < 1 || !seen.contains(&(r.parent as u64))) {
            return Err(IoError::validation(format!(
                "record {} references unknown parent {}",
                r.label, r.parent
            )));
        }
        seen.insert(r.label);
        last = r.label;
    }
    Ok(())
}
