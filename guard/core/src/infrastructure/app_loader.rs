// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Application Loader - Configuration to Security Wiring
//
// Turns a named `AppConfig` into the pieces the HTTP layer serves:
// - a `SecurityRegistry` with the configured policies and settings
// - the root resource and one child resource per route carrying its own ACL
// - a `PermissionView` secured view for every permission-guarded route

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::domain::app_config::{
    AppConfig, AppConfigError, AuthenticationConfig, AuthorizationConfig, GuardConfig, RouteConfig,
};
use crate::domain::security::{SecurityRegistry, SecuritySettings, StaticResource};

use super::security::{AclAuthorizationPolicy, HeaderAuthenticationPolicy, PermissionView};

/// Resource kind of per-route resources.
pub const ROUTE_RESOURCE_KIND: &str = "route";

#[derive(Debug, Clone)]
pub struct LoadedRoute {
    pub config: RouteConfig,
    pub context: Arc<StaticResource>,
}

#[derive(Debug, Clone)]
pub struct LoadedApp {
    pub name: String,
    pub registry: Arc<SecurityRegistry>,
    pub root: Arc<StaticResource>,
    pub routes: Vec<LoadedRoute>,
}

impl LoadedApp {
    /// Load and validate application `name` from the YAML file at `path`
    pub fn from_file(path: impl AsRef<Path>, name: &str) -> Result<Self, AppConfigError> {
        let path = path.as_ref();
        info!("Loading application '{}' from {:?}", name, path);
        let config = GuardConfig::from_yaml_file(path)?;
        let app = config.app(name)?;
        Ok(Self::from_config(name, app))
    }

    /// Wire an already validated application configuration
    pub fn from_config(name: &str, app: &AppConfig) -> Self {
        let registry = build_registry(app);

        let root_acl = (!app.root_acl.is_empty()).then(|| app.root_acl.clone());
        let root = Arc::new(StaticResource::root(root_acl));

        let routes = app
            .routes
            .iter()
            .map(|route| {
                let context = if route.acl.is_empty() {
                    root.clone()
                } else {
                    Arc::new(StaticResource::child(
                        root.clone(),
                        route.view_name(),
                        ROUTE_RESOURCE_KIND,
                        Some(route.acl.clone()),
                    ))
                };
                LoadedRoute {
                    config: route.clone(),
                    context,
                }
            })
            .collect::<Vec<_>>();

        info!(
            "Application '{}' loaded: {} route(s), {:?}",
            name,
            routes.len(),
            registry
        );

        Self {
            name: name.to_string(),
            registry: Arc::new(registry),
            root,
            routes,
        }
    }
}

/// Build the security registry for an application
pub fn build_registry(app: &AppConfig) -> SecurityRegistry {
    let mut registry = SecurityRegistry::new().with_settings(SecuritySettings {
        debug_authorization: app.settings.debug_authorization,
    });

    if let Some(AuthenticationConfig::Header { header, groups }) = &app.security.authentication {
        info!("Authentication policy: request header '{}'", header);
        registry.register_authentication_policy(Arc::new(
            HeaderAuthenticationPolicy::new(header.clone()).with_groups(groups.clone()),
        ));
    }

    if let Some(AuthorizationConfig::Acl) = &app.security.authorization {
        info!("Authorization policy: ACL");
        registry.register_authorization_policy(Arc::new(AclAuthorizationPolicy::new()));
    }

    for route in &app.routes {
        if let Some(permission) = &route.permission {
            info!(
                "Securing view '{}' with permission '{}'",
                route.view_name(),
                permission
            );
            registry.register_secured_view(
                None,
                route.view_name(),
                Arc::new(PermissionView::new(permission.clone())),
            );
        }
    }

    registry
}
