//! Rejection taxonomy for build commands.
//!
//! A rejected command never leaves partial state behind: the session keeps
//! the values it held before the command arrived and stays usable.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::allocation::{Pool, Side};

/// Reference table a lookup key failed to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Culture,
    Career,
    AgeBracket,
    SocialClass,
    Item,
    Characteristic,
}

impl ReferenceKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Culture => "culture",
            Self::Career => "career",
            Self::AgeBracket => "age bracket",
            Self::SocialClass => "social class",
            Self::Item => "item",
            Self::Characteristic => "characteristic",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a command did not take effect.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    #[error("{field} value {value} is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{target} is not eligible for the {pool} pool")]
    IneligibleTarget { target: String, pool: Pool },
    #[error("{target} is not offered by the active {kind}")]
    NotOffered { target: String, kind: ReferenceKind },
    #[error("{side} side already holds {limit} professional skills")]
    SelectionLimitExceeded { side: Side, limit: usize },
    #[error("{item} costs {cost} but only {remaining} remains")]
    UnderfundedPurchase {
        item: String,
        cost: i64,
        remaining: i64,
    },
    #[error("unknown {kind} `{key}`")]
    UnknownReference { kind: ReferenceKind, key: String },
    #[error("no {kind} is active")]
    MissingContext { kind: ReferenceKind },
}

impl Rejection {
    pub(crate) fn out_of_range(field: impl Into<String>, value: i64, min: i64, max: i64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    pub(crate) fn unknown(kind: ReferenceKind, key: &str) -> Self {
        Self::UnknownReference {
            kind,
            key: key.to_string(),
        }
    }
}
