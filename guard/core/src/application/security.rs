// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Security Application Service
//!
//! Entry points that consult a [`SecurityRegistry`]:
//!
//! - [`view_execution_permitted`] / [`has_permission`] answer permission
//!   questions and return a [`PermissionOutcome`];
//! - [`authenticated_userid`], [`effective_principals`], [`remember`],
//!   [`forget`] and [`principals_allowed_by_permission`] forward to whichever
//!   policy is registered and fall back to a fixed default when none is.
//!
//! Delegate results are returned verbatim. The only error is the
//! misconfiguration of an authentication policy without an authorization
//! policy, which is surfaced to the caller instead of guessed around.

use axum::http::request::Parts;
use thiserror::Error;
use tracing::debug;

use crate::domain::security::{
    HeaderInstruction, PermissionOutcome, PermissionResult, RememberOptions, Resource,
    SecurityRegistry, EVERYONE,
};

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Ask the secured view registered for `view_name` whether it may execute.
///
/// Without a registered secured view the view is unprotected and the result
/// is an `Allowed` explaining so.
pub fn view_execution_permitted(
    registry: &SecurityRegistry,
    context: &dyn Resource,
    request: &Parts,
    view_name: &str,
) -> PermissionOutcome {
    match registry.secured_view(context.kind(), view_name) {
        Some(view) => view.permitted(registry, context, request),
        None => {
            let msg = if registry.settings().debug_authorization {
                format!(
                    "Allowed: view name '{}' in context '{}' (no permission defined)",
                    view_name, context
                )
            } else {
                "Allowed (no permission registered)".to_string()
            };
            debug!(view_name, "{}", msg);
            PermissionResult::allowed(msg).into()
        }
    }
}

/// Check `permission` on `context` for the caller of `request`.
///
/// # Errors
///
/// `SecurityError::Configuration` when an authentication policy is
/// registered without an authorization policy.
pub fn has_permission(
    registry: &SecurityRegistry,
    permission: &str,
    context: &dyn Resource,
    request: &Parts,
) -> Result<PermissionOutcome, SecurityError> {
    let Some(authentication) = registry.authentication_policy() else {
        return Ok(PermissionResult::allowed("No authentication policy in use.").into());
    };

    let Some(authorization) = registry.authorization_policy() else {
        return Err(SecurityError::Configuration(
            "Authentication policy registered without authorization policy".to_string(),
        ));
    };

    let principals = authentication.effective_principals(request);
    let outcome = authorization.permits(context, &principals, permission);

    if registry.settings().debug_authorization {
        debug!(
            permission,
            context = %context,
            principals = ?principals,
            allowed = outcome.is_allowed(),
            "{}",
            outcome
        );
    }

    Ok(outcome)
}

pub fn authenticated_userid(registry: &SecurityRegistry, request: &Parts) -> Option<String> {
    registry
        .authentication_policy()
        .and_then(|policy| policy.authenticated_userid(request))
}

pub fn effective_principals(registry: &SecurityRegistry, request: &Parts) -> Vec<String> {
    match registry.authentication_policy() {
        Some(policy) => policy.effective_principals(request),
        None => Vec::new(),
    }
}

/// Header instructions that make the client remember `principal`.
pub fn remember(
    registry: &SecurityRegistry,
    request: &Parts,
    principal: &str,
    options: &RememberOptions,
) -> Vec<HeaderInstruction> {
    match registry.authentication_policy() {
        Some(policy) => policy.remember(request, principal, options),
        None => Vec::new(),
    }
}

/// Header instructions that make the client forget the current identity.
pub fn forget(registry: &SecurityRegistry, request: &Parts) -> Vec<HeaderInstruction> {
    match registry.authentication_policy() {
        Some(policy) => policy.forget(request),
        None => Vec::new(),
    }
}

/// Principals granted `permission` on `context`. Without an authorization
/// policy everything is public, so the answer is `[EVERYONE]`.
pub fn principals_allowed_by_permission(
    registry: &SecurityRegistry,
    context: &dyn Resource,
    permission: &str,
) -> Vec<String> {
    match registry.authorization_policy() {
        Some(policy) => policy.principals_allowed_by_permission(context, permission),
        None => vec![EVERYONE.to_string()],
    }
}
