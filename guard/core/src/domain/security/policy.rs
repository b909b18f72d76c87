// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Policy Capabilities
//!
//! | Trait | Answers |
//! |-------|---------|
//! | [`AuthenticationPolicy`] | who is the caller, and how to remember/forget them |
//! | [`AuthorizationPolicy`] | what the caller's principals may do on a context |
//! | [`SecuredView`] | whether a specific view may execute for a request |
//!
//! Implementations are registered in a [`super::SecurityRegistry`] and
//! looked up per call. Requests are the `http` request head; bodies are never
//! needed for a permission decision.

use axum::http::request::Parts;

use super::permission::PermissionOutcome;
use super::registry::SecurityRegistry;
use super::resource::Resource;

/// A `(header name, header value)` pair a response should carry.
pub type HeaderInstruction = (String, String);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RememberOptions {
    /// Lifetime of the remembered identity in seconds.
    pub max_age: Option<u64>,
}

pub trait AuthenticationPolicy: Send + Sync {
    fn authenticated_userid(&self, request: &Parts) -> Option<String>;

    fn effective_principals(&self, request: &Parts) -> Vec<String>;

    fn remember(
        &self,
        request: &Parts,
        principal: &str,
        options: &RememberOptions,
    ) -> Vec<HeaderInstruction>;

    fn forget(&self, request: &Parts) -> Vec<HeaderInstruction>;
}

pub trait AuthorizationPolicy: Send + Sync {
    fn permits(
        &self,
        context: &dyn Resource,
        principals: &[String],
        permission: &str,
    ) -> PermissionOutcome;

    fn principals_allowed_by_permission(
        &self,
        context: &dyn Resource,
        permission: &str,
    ) -> Vec<String>;
}

/// Permission guard attached to a named view.
pub trait SecuredView: Send + Sync {
    fn permitted(
        &self,
        registry: &SecurityRegistry,
        context: &dyn Resource,
        request: &Parts,
    ) -> PermissionOutcome;
}
