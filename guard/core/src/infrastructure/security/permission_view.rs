// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use axum::http::request::Parts;
use tracing::warn;

use crate::application::security::has_permission;
use crate::domain::security::{
    PermissionOutcome, PermissionResult, Resource, SecuredView, SecurityRegistry,
};

/// Secured view requiring a single named permission on the view's context.
#[derive(Debug, Clone)]
pub struct PermissionView {
    permission: String,
}

impl PermissionView {
    pub fn new(permission: impl Into<String>) -> Self {
        Self {
            permission: permission.into(),
        }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }
}

impl SecuredView for PermissionView {
    fn permitted(
        &self,
        registry: &SecurityRegistry,
        context: &dyn Resource,
        request: &Parts,
    ) -> PermissionOutcome {
        match has_permission(registry, &self.permission, context, request) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Denying '{}' on '{}': {}", self.permission, context, e);
                PermissionResult::denied(e.to_string()).into()
            }
        }
    }
}
