//! Per-server permission tiers and grants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access tier on a single server.
///
/// Variants are declared lowest first; the derived `Ord` is the tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Viewer,
    Editor,
    Owner,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Viewer => "Viewer",
            PermissionLevel::Editor => "Editor",
            PermissionLevel::Owner => "Owner",
        }
    }

    /// Whether this tier satisfies a guard requiring `required`.
    pub fn satisfies(&self, required: PermissionLevel) -> bool {
        *self >= required
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewer" => Ok(PermissionLevel::Viewer),
            "editor" => Ok(PermissionLevel::Editor),
            "owner" => Ok(PermissionLevel::Owner),
            other => Err(format!("Unknown permission level: {}", other)),
        }
    }
}

/// A principal's access tier on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub resource_id: String,
    pub level: PermissionLevel,
}

impl Grant {
    pub fn new(resource_id: impl Into<String>, level: PermissionLevel) -> Self {
        Self {
            resource_id: resource_id.into(),
            level,
        }
    }
}
