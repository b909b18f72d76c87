// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Application Configuration Types
//
// Defines the YAML schema `prequest` loads applications from:
// - Named applications under `apps:` (the default one is `main`)
// - Security settings (debug_authorization)
// - Authentication and authorization policy selection
// - The root resource ACL
// - Routes, each optionally guarded by a permission

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::security::Acl;

pub const DEFAULT_APP_NAME: &str = "main";

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to read config at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No application named '{name}' in config (available: {available})")]
    UnknownApp { name: String, available: String },

    #[error("Invalid application '{app}': {reason}")]
    Invalid { app: String, reason: String },
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Applications keyed by name
    #[serde(default)]
    pub apps: BTreeMap<String, AppConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    /// ACL on the root resource, inherited by every route
    #[serde(default)]
    pub root_acl: Acl,

    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub debug_authorization: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthorizationConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthenticationConfig {
    /// Trust a request header carrying the user id
    Header {
        #[serde(default = "default_user_header")]
        header: String,

        /// Extra principals per user id
        #[serde(default)]
        groups: BTreeMap<String, Vec<String>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthorizationConfig {
    /// Evaluate ACLs along the resource lineage
    Acl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityAction {
    /// Attach the headers that remember the `principal` query parameter
    Remember,
    /// Attach the headers that forget the caller
    Forget,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub path: String,

    /// Allowed methods; empty means any
    #[serde(default)]
    pub methods: Vec<String>,

    /// View name used for secured view lookup (defaults to the path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,

    /// Permission required to execute the view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,

    /// ACL of the route's own resource (its parent is the root)
    #[serde(default)]
    pub acl: Acl,

    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default = "default_content_type")]
    pub content_type: String,

    /// Response body; `{userid}`, `{query}`, `{command_request}` and
    /// `{request_body}` are substituted
    #[serde(default)]
    pub body: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityAction>,

    /// `max_age` passed to `remember`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
}

impl RouteConfig {
    pub fn view_name(&self) -> &str {
        self.view.as_deref().unwrap_or(&self.path)
    }
}

fn default_user_header() -> String {
    "X-Remote-User".to_string()
}

fn default_status() -> u16 {
    200
}

fn default_content_type() -> String {
    "text/plain; charset=utf-8".to_string()
}

const SUPPORTED_METHODS: &[&str] = &["GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"];

impl GuardConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, AppConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AppConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AppConfigError> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Look up and validate a named application
    pub fn app(&self, name: &str) -> Result<&AppConfig, AppConfigError> {
        let app = self.apps.get(name).ok_or_else(|| AppConfigError::UnknownApp {
            name: name.to_string(),
            available: self.apps.keys().cloned().collect::<Vec<_>>().join(", "),
        })?;
        app.validate(name)?;
        Ok(app)
    }
}

/// Shape of a route path as the router matches it: captures become `{}` and
/// catch-alls `{*}`. `Err` holds the reason the router would reject it.
fn route_shape(path: &str) -> Result<String, String> {
    let segments: Vec<&str> = path.split('/').skip(1).collect();
    let mut shape = String::with_capacity(path.len());

    for (index, segment) in segments.iter().enumerate() {
        shape.push('/');
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err(format!(
                "segment '{}' uses the old capture syntax, write '{{name}}' or '{{*name}}'",
                segment
            ));
        }
        if !segment.contains(['{', '}']) {
            shape.push_str(segment);
            continue;
        }

        let capture = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .ok_or_else(|| format!("segment '{}' must be a whole '{{name}}' capture", segment))?;
        let (catch_all, capture_name) = match capture.strip_prefix('*') {
            Some(capture_name) => (true, capture_name),
            None => (false, capture),
        };
        if capture_name.is_empty()
            || !capture_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(format!("invalid capture '{}'", segment));
        }
        if catch_all && index + 1 != segments.len() {
            return Err(format!("catch-all '{}' must be the last segment", segment));
        }
        shape.push_str(if catch_all { "{*}" } else { "{}" });
    }

    Ok(shape)
}

impl AppConfig {
    /// Validate configuration
    pub fn validate(&self, name: &str) -> Result<(), AppConfigError> {
        let invalid = |reason: String| AppConfigError::Invalid {
            app: name.to_string(),
            reason,
        };

        // An authentication policy alone cannot answer permission checks
        if self.security.authentication.is_some() && self.security.authorization.is_none() {
            return Err(invalid(
                "authentication policy configured without an authorization policy".to_string(),
            ));
        }

        if let Some(AuthenticationConfig::Header { header, .. }) = &self.security.authentication {
            if header.is_empty() {
                return Err(invalid("authentication header name cannot be empty".to_string()));
            }
        }

        let mut seen_paths: BTreeMap<String, &str> = BTreeMap::new();
        let mut view_permissions: BTreeMap<&str, &str> = BTreeMap::new();
        for route in &self.routes {
            if route.path.is_empty() || !route.path.starts_with('/') {
                return Err(invalid(format!("route path '{}' must start with '/'", route.path)));
            }

            let shape = route_shape(&route.path)
                .map_err(|reason| invalid(format!("route path '{}': {}", route.path, reason)))?;
            if let Some(previous) = seen_paths.insert(shape, route.path.as_str()) {
                return Err(invalid(if previous == route.path {
                    format!("route path '{}' is declared twice", route.path)
                } else {
                    format!("route path '{}' conflicts with '{}'", route.path, previous)
                }));
            }

            // Secured views are looked up by view name
            if let Some(permission) = route.permission.as_deref() {
                if let Some(previous) = view_permissions.insert(route.view_name(), permission) {
                    if previous != permission {
                        return Err(invalid(format!(
                            "view '{}' is guarded by both '{}' and '{}'",
                            route.view_name(),
                            previous,
                            permission
                        )));
                    }
                }
            }

            for method in &route.methods {
                if !SUPPORTED_METHODS.contains(&method.to_uppercase().as_str()) {
                    return Err(invalid(format!(
                        "unsupported method '{}' on route '{}'",
                        method, route.path
                    )));
                }
            }

            if !(100..=999).contains(&route.status) {
                return Err(invalid(format!(
                    "invalid status {} on route '{}'",
                    route.status, route.path
                )));
            }

            if route.identity.is_some() && self.security.authentication.is_none() {
                tracing::warn!(
                    "Route '{}' remembers/forgets identities but app '{}' has no authentication policy",
                    route.path,
                    name
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::security::{Ace, EVERYONE};

    const SAMPLE: &str = r#"
apps:
  main:
    settings:
      debug_authorization: true
    security:
      authentication:
        type: header
        groups:
          fred: ["group:editors"]
      authorization:
        type: acl
    root_acl:
      - { action: Allow, principal: system.Everyone, permissions: view }
    routes:
      - path: /hello
        methods: [GET]
        permission: view
        body: "hello {userid}"
      - path: /edit
        view: edit
        permission: edit
        acl:
          - { action: Allow, principal: "group:editors", permissions: edit }
"#;

    #[test]
    fn test_parse_sample() {
        let config = GuardConfig::from_yaml_str(SAMPLE).unwrap();
        let app = config.app(DEFAULT_APP_NAME).unwrap();

        assert!(app.settings.debug_authorization);
        assert_eq!(
            app.security.authentication,
            Some(AuthenticationConfig::Header {
                header: "X-Remote-User".to_string(),
                groups: BTreeMap::from([("fred".to_string(), vec!["group:editors".to_string()])]),
            })
        );
        assert_eq!(app.security.authorization, Some(AuthorizationConfig::Acl));
        assert_eq!(app.root_acl.entries(), &[Ace::allow(EVERYONE, &["view"])]);

        assert_eq!(app.routes.len(), 2);
        assert_eq!(app.routes[0].view_name(), "/hello");
        assert_eq!(app.routes[0].status, 200);
        assert_eq!(app.routes[1].view_name(), "edit");
        assert_eq!(app.routes[1].acl.entries().len(), 1);
    }

    #[test]
    fn test_unknown_app() {
        let config = GuardConfig::from_yaml_str(SAMPLE).unwrap();
        match config.app("admin") {
            Err(AppConfigError::UnknownApp { name, available }) => {
                assert_eq!(name, "admin");
                assert_eq!(available, "main");
            }
            other => panic!("Expected UnknownApp, got {:?}", other),
        }
    }

    #[test]
    fn test_validation() {
        let mut app = AppConfig::default();
        assert!(app.validate("main").is_ok());

        // Authentication without authorization is a misconfiguration
        app.security.authentication = Some(AuthenticationConfig::Header {
            header: "X-Remote-User".to_string(),
            groups: BTreeMap::new(),
        });
        assert!(app.validate("main").is_err());
        app.security.authorization = Some(AuthorizationConfig::Acl);
        assert!(app.validate("main").is_ok());

        let route: RouteConfig = serde_yaml::from_str("path: relative").unwrap();
        app.routes.push(route);
        assert!(app.validate("main").is_err());
        app.routes[0].path = "/relative".to_string();
        assert!(app.validate("main").is_ok());

        app.routes[0].methods = vec!["BREW".to_string()];
        assert!(app.validate("main").is_err());
        app.routes[0].methods = vec!["post".to_string()];
        assert!(app.validate("main").is_ok());

        app.routes[0].status = 42;
        assert!(app.validate("main").is_err());
        app.routes[0].status = 201;

        let duplicate = app.routes[0].clone();
        app.routes.push(duplicate);
        assert!(app.validate("main").is_err());
    }

    #[test]
    fn test_route_path_syntax() {
        let with_path = |path: &str| {
            let mut app = AppConfig::default();
            app.routes
                .push(serde_yaml::from_str(&format!("path: \"{}\"", path)).unwrap());
            app.validate("main")
        };

        for path in ["/", "/users/{id}", "/files/{*rest}", "/a/b/", "/users/{user_id}/posts"] {
            assert!(with_path(path).is_ok(), "{} should be accepted", path);
        }
        for path in [
            "/users/:id",
            "/x/*rest",
            "/users/{id",
            "/users/id}",
            "/users/x{id}",
            "/users/{}",
            "/files/{*rest}/tail",
        ] {
            assert!(
                matches!(with_path(path), Err(AppConfigError::Invalid { .. })),
                "{} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_conflicting_captures() {
        let config = GuardConfig::from_yaml_str(
            r#"
apps:
  main:
    routes:
      - path: /users/{id}
      - path: /users/{name}
"#,
        )
        .unwrap();
        match config.app(DEFAULT_APP_NAME) {
            Err(AppConfigError::Invalid { reason, .. }) => {
                assert!(reason.contains("conflicts with '/users/{id}'"))
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_view_name_permissions() {
        let yaml = |second: &str| {
            format!(
                r#"
apps:
  main:
    routes:
      - {{ path: /a, view: shared, permission: view }}
      - {{ path: /b, view: shared, permission: {} }}
"#,
                second
            )
        };

        let config = GuardConfig::from_yaml_str(&yaml("view")).unwrap();
        assert!(config.app(DEFAULT_APP_NAME).is_ok());

        let config = GuardConfig::from_yaml_str(&yaml("admin")).unwrap();
        match config.app(DEFAULT_APP_NAME) {
            Err(AppConfigError::Invalid { reason, .. }) => {
                assert_eq!(reason, "view 'shared' is guarded by both 'view' and 'admin'")
            }
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = GuardConfig::from_yaml_file("/nonexistent/guard.yaml");
        assert!(matches!(result, Err(AppConfigError::Io { .. })));
    }
}
