// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Security Registry
//!
//! Explicit holder for the policies an application runs with: at most one
//! authentication policy, at most one authorization policy, secured views
//! keyed by view name (optionally narrowed to a resource kind), and the
//! security settings. Absence is always explicit (`None`), never a default
//! policy.
//!
//! The registry is populated while an application is configured and shared
//! read-only (behind an `Arc`) with request handlers afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::policy::{AuthenticationPolicy, AuthorizationPolicy, SecuredView};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecuritySettings {
    /// Emit detailed authorization decisions.
    pub debug_authorization: bool,
}

/// `(resource kind, view name)`; `None` kind matches any resource.
type SecuredViewKey = (Option<String>, String);

#[derive(Clone, Default)]
pub struct SecurityRegistry {
    authentication: Option<Arc<dyn AuthenticationPolicy>>,
    authorization: Option<Arc<dyn AuthorizationPolicy>>,
    secured_views: HashMap<SecuredViewKey, Arc<dyn SecuredView>>,
    settings: SecuritySettings,
}

impl SecurityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authentication_policy(mut self, policy: Arc<dyn AuthenticationPolicy>) -> Self {
        self.register_authentication_policy(policy);
        self
    }

    pub fn with_authorization_policy(mut self, policy: Arc<dyn AuthorizationPolicy>) -> Self {
        self.register_authorization_policy(policy);
        self
    }

    pub fn with_settings(mut self, settings: SecuritySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Install the authentication policy, returning the one it replaces.
    pub fn register_authentication_policy(
        &mut self,
        policy: Arc<dyn AuthenticationPolicy>,
    ) -> Option<Arc<dyn AuthenticationPolicy>> {
        self.authentication.replace(policy)
    }

    /// Install the authorization policy, returning the one it replaces.
    pub fn register_authorization_policy(
        &mut self,
        policy: Arc<dyn AuthorizationPolicy>,
    ) -> Option<Arc<dyn AuthorizationPolicy>> {
        self.authorization.replace(policy)
    }

    pub fn register_secured_view(
        &mut self,
        kind: Option<&str>,
        view_name: &str,
        view: Arc<dyn SecuredView>,
    ) {
        self.secured_views
            .insert((kind.map(str::to_string), view_name.to_string()), view);
    }

    pub fn set_settings(&mut self, settings: SecuritySettings) {
        self.settings = settings;
    }

    pub fn authentication_policy(&self) -> Option<&dyn AuthenticationPolicy> {
        self.authentication.as_deref()
    }

    pub fn authorization_policy(&self) -> Option<&dyn AuthorizationPolicy> {
        self.authorization.as_deref()
    }

    /// Secured view for `view_name`, preferring one registered for `kind`
    /// over one registered for any resource.
    pub fn secured_view(&self, kind: &str, view_name: &str) -> Option<&dyn SecuredView> {
        self.secured_views
            .get(&(Some(kind.to_string()), view_name.to_string()))
            .or_else(|| self.secured_views.get(&(None, view_name.to_string())))
            .map(|view| &**view)
    }

    pub fn settings(&self) -> &SecuritySettings {
        &self.settings
    }

    /// Drop every registration and reset settings.
    pub fn clear(&mut self) {
        self.authentication = None;
        self.authorization = None;
        self.secured_views.clear();
        self.settings = SecuritySettings::default();
    }
}

impl fmt::Debug for SecurityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut views: Vec<&SecuredViewKey> = self.secured_views.keys().collect();
        views.sort();
        f.debug_struct("SecurityRegistry")
            .field("authentication", &self.authentication.is_some())
            .field("authorization", &self.authorization.is_some())
            .field("secured_views", &views)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::security::permission::PermissionOutcome;
    use crate::domain::security::resource::Resource;
    use axum::http::request::Parts;

    struct FixedView(bool);

    impl SecuredView for FixedView {
        fn permitted(
            &self,
            _registry: &SecurityRegistry,
            _context: &dyn Resource,
            _request: &Parts,
        ) -> PermissionOutcome {
            PermissionOutcome::Bool(self.0)
        }
    }

    struct Root;

    impl Resource for Root {
        fn name(&self) -> &str {
            "/"
        }
    }

    fn parts() -> Parts {
        axum::http::Request::builder().body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_empty_registry() {
        let registry = SecurityRegistry::new();
        assert!(registry.authentication_policy().is_none());
        assert!(registry.authorization_policy().is_none());
        assert!(registry.secured_view("resource", "").is_none());
        assert!(!registry.settings().debug_authorization);
    }

    #[test]
    fn test_secured_view_prefers_kind() {
        let mut registry = SecurityRegistry::new();
        registry.register_secured_view(None, "edit", Arc::new(FixedView(true)));
        registry.register_secured_view(Some("document"), "edit", Arc::new(FixedView(false)));

        let view = registry.secured_view("document", "edit").unwrap();
        assert!(!view.permitted(&registry, &Root, &parts()).is_allowed());

        let view = registry.secured_view("folder", "edit").unwrap();
        assert!(view.permitted(&registry, &Root, &parts()).is_allowed());

        assert!(registry.secured_view("folder", "view").is_none());
    }

    #[test]
    fn test_clear() {
        let mut registry = SecurityRegistry::new().with_settings(SecuritySettings {
            debug_authorization: true,
        });
        registry.register_secured_view(None, "edit", Arc::new(FixedView(true)));
        registry.clear();
        assert!(registry.secured_view("resource", "edit").is_none());
        assert!(!registry.settings().debug_authorization);
    }
}
