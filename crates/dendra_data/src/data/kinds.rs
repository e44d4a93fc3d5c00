use serde::{Deserialize, Serialize};
use std::fmt;

/// Growth rule attached to a segment at creation.
///
/// The kind is copied to every daughter and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Apical,
    Basal,
}

impl RuleKind {
    /// Substance whose gradient guides this rule.
    #[must_use]
    pub fn substance(self) -> SubstanceId {
        match self {
            RuleKind::Apical => SubstanceId::Apical,
            RuleKind::Basal => SubstanceId::Basal,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Apical => write!(f, "apical"),
            RuleKind::Basal => write!(f, "basal"),
        }
    }
}

/// Diffusible guidance substances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstanceId {
    Apical,
    Basal,
}

impl fmt::Display for SubstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstanceId::Apical => write!(f, "substance_apical"),
            SubstanceId::Basal => write!(f, "substance_basal"),
        }
    }
}

/// How a segment stopped being terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Junction {
    /// Split by discretisation; one daughter carries on the tip.
    Continuation,
    /// Side branch: continuation on the left, new branch on the right.
    Branch,
    /// Symmetric split into two fresh tips.
    Bifurcation,
}
