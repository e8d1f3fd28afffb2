//! Shared enums used across the invoker, policies and observers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four canonical cache operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Get,
    Put,
    Evict,
    Clear,
}

impl OperationKind {
    /// All operation kinds, in canonical order
    pub const ALL: [OperationKind; 4] = [
        OperationKind::Get,
        OperationKind::Put,
        OperationKind::Evict,
        OperationKind::Clear,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OperationKind::Get => "get",
            OperationKind::Put => "put",
            OperationKind::Evict => "evict",
            OperationKind::Clear => "clear",
        }
    }

    /// Whether the operation mutates the store
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, OperationKind::Get)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(OperationKind::Get),
            "put" => Ok(OperationKind::Put),
            "evict" => Ok(OperationKind::Evict),
            "clear" => Ok(OperationKind::Clear),
            other => Err(format!("unknown cache operation '{other}'")),
        }
    }
}
