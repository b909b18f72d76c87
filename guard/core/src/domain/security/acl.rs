// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Access Control Lists
//!
//! An [`Acl`] is an ordered list of [`Ace`]s. Order matters: the first ACE
//! that names one of the caller's principals and covers the requested
//! permission decides the outcome.
//!
//! ACEs deserialize from configuration in a compact form:
//!
//! ```yaml
//! - { action: Allow, principal: system.Everyone, permissions: view }
//! - { action: Allow, principal: group:editors, permissions: [view, edit] }
//! - { action: Deny, principal: system.Everyone, permissions: ALL_PERMISSIONS }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::principal::{AllPermissionsList, ALL_PERMISSIONS, EVERYONE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AceAction {
    Allow,
    Deny,
}

impl fmt::Display for AceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("Allow"),
            Self::Deny => f.write_str("Deny"),
        }
    }
}

/// Permissions covered by a single ACE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPermissions", into = "RawPermissions")]
pub enum AcePermissions {
    All(AllPermissionsList),
    Named(Vec<String>),
}

impl AcePermissions {
    pub fn contains(&self, permission: &str) -> bool {
        match self {
            Self::All(all) => all.contains(permission),
            Self::Named(names) => names.iter().any(|name| name == permission),
        }
    }
}

impl fmt::Display for AcePermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All(all) => all.fmt(f),
            Self::Named(names) => write!(f, "[{}]", names.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawPermissions {
    One(String),
    Many(Vec<String>),
}

impl From<RawPermissions> for AcePermissions {
    fn from(raw: RawPermissions) -> Self {
        match raw {
            RawPermissions::One(name) if name == ALL_PERMISSIONS.to_string() => {
                Self::All(ALL_PERMISSIONS)
            }
            RawPermissions::One(name) => Self::Named(vec![name]),
            RawPermissions::Many(names) => Self::Named(names),
        }
    }
}

impl From<AcePermissions> for RawPermissions {
    fn from(permissions: AcePermissions) -> Self {
        match permissions {
            AcePermissions::All(all) => Self::One(all.to_string()),
            AcePermissions::Named(names) => Self::Many(names),
        }
    }
}

/// One access control entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ace {
    pub action: AceAction,
    pub principal: String,
    pub permissions: AcePermissions,
}

impl Ace {
    pub fn allow(principal: impl Into<String>, permissions: &[&str]) -> Self {
        Self {
            action: AceAction::Allow,
            principal: principal.into(),
            permissions: AcePermissions::Named(permissions.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn deny(principal: impl Into<String>, permissions: &[&str]) -> Self {
        Self {
            action: AceAction::Deny,
            principal: principal.into(),
            permissions: AcePermissions::Named(permissions.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn allow_all(principal: impl Into<String>) -> Self {
        Self {
            action: AceAction::Allow,
            principal: principal.into(),
            permissions: AcePermissions::All(ALL_PERMISSIONS),
        }
    }

    /// `Deny, Everyone, ALL_PERMISSIONS`: stops inheritance from parents.
    pub fn deny_all() -> Self {
        Self {
            action: AceAction::Deny,
            principal: EVERYONE.to_string(),
            permissions: AcePermissions::All(ALL_PERMISSIONS),
        }
    }

    pub fn covers(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

impl fmt::Display for Ace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {} {}>", self.action, self.principal, self.permissions)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Acl(pub Vec<Ace>);

impl Acl {
    pub fn new(entries: Vec<Ace>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[Ace] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|ace| ace.to_string()).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}
