// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # ACL Authorization Policy
//!
//! Evaluates the ACLs found along a context's lineage.
//!
//! ## `permits`
//!
//! Locations are visited from the context up to the root. Within an ACL, ACEs
//! are tried in order; the first ACE whose principal is one of the caller's
//! principals and whose permissions cover the requested permission decides
//! (`Allow` → `ACLAllowed`, `Deny` → `ACLDenied`). When nothing matches the
//! answer is a default `ACLDenied`.
//!
//! ## `principals_allowed_by_permission`
//!
//! Locations are visited root first so that ACLs closer to the context
//! override inherited grants. A `Deny` for `system.Everyone` discards every
//! grant inherited so far.

use std::collections::BTreeSet;
use tracing::trace;

use crate::domain::security::{
    lineage, principal::render_principals, AceAction, AuthorizationPolicy, PermissionOutcome,
    PermissionResult, Resource, EVERYONE,
};

const DEFAULT_DENY_ACE: &str = "<default deny>";
const NO_ACL_FOUND: &str = "<No ACL found on any object in resource lineage>";

#[derive(Debug, Clone, Copy, Default)]
pub struct AclAuthorizationPolicy;

impl AclAuthorizationPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl AuthorizationPolicy for AclAuthorizationPolicy {
    fn permits(
        &self,
        context: &dyn Resource,
        principals: &[String],
        permission: &str,
    ) -> PermissionOutcome {
        let rendered_principals = render_principals(principals);
        let mut last_acl = NO_ACL_FOUND.to_string();

        for location in lineage(context) {
            let Some(acl) = location.acl() else {
                continue;
            };
            last_acl = acl.to_string();

            for ace in acl.entries() {
                if !principals.iter().any(|p| *p == ace.principal) || !ace.covers(permission) {
                    continue;
                }
                let result = match ace.action {
                    AceAction::Allow => PermissionResult::acl_allowed(
                        ace,
                        acl,
                        permission,
                        &rendered_principals,
                        location,
                    ),
                    AceAction::Deny => PermissionResult::acl_denied(
                        ace,
                        acl,
                        permission,
                        &rendered_principals,
                        location,
                    ),
                };
                trace!("{}", result);
                return result.into();
            }
        }

        PermissionResult::acl_denied(
            DEFAULT_DENY_ACE,
            last_acl,
            permission,
            &rendered_principals,
            context,
        )
        .into()
    }

    fn principals_allowed_by_permission(
        &self,
        context: &dyn Resource,
        permission: &str,
    ) -> Vec<String> {
        let locations: Vec<&dyn Resource> = lineage(context).collect();
        let mut allowed: BTreeSet<String> = BTreeSet::new();

        for location in locations.into_iter().rev() {
            let Some(acl) = location.acl() else {
                continue;
            };

            let mut allowed_here: BTreeSet<String> = BTreeSet::new();
            let mut denied_here: BTreeSet<String> = BTreeSet::new();

            for ace in acl.entries() {
                if !ace.covers(permission) {
                    continue;
                }
                match ace.action {
                    AceAction::Allow => {
                        if !denied_here.contains(&ace.principal) {
                            allowed_here.insert(ace.principal.clone());
                        }
                    }
                    AceAction::Deny => {
                        if ace.principal == EVERYONE {
                            allowed.clear();
                            break;
                        }
                        allowed.remove(&ace.principal);
                        denied_here.insert(ace.principal.clone());
                    }
                }
            }

            allowed.extend(allowed_here);
        }

        allowed.into_iter().collect()
    }
}
