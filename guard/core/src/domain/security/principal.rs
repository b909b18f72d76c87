// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Principals and the All-Permissions Sentinel
//!
//! Principals are plain strings (user ids, group names). Two system principals
//! are reserved and always spelled the same way so ACLs written in
//! configuration files can reference them.

use std::fmt;

/// Every caller, authenticated or not, carries this principal.
pub const EVERYONE: &str = "system.Everyone";

/// Carried by any caller an authentication policy has identified.
pub const AUTHENTICATED: &str = "system.Authenticated";

/// Sentinel permission set meaning "every permission".
///
/// Reports containment for any permission name, iterates as empty and only
/// compares equal to another `AllPermissionsList`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AllPermissionsList;

impl AllPermissionsList {
    pub const fn new() -> Self {
        Self
    }

    pub fn contains(&self, _permission: &str) -> bool {
        true
    }

    pub fn iter(&self) -> std::iter::Empty<&str> {
        std::iter::empty()
    }
}

impl fmt::Display for AllPermissionsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ALL_PERMISSIONS")
    }
}

/// Shared instance used by ACEs that grant or deny everything.
pub const ALL_PERMISSIONS: AllPermissionsList = AllPermissionsList::new();

/// Render a principal list the way permission messages expect it.
pub fn render_principals(principals: &[String]) -> String {
    format!("[{}]", principals.join(", "))
}
