// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP surface of a loaded application. Every configured route becomes an
//! axum route; permission-guarded routes sit behind
//! [`enforce_view_permission`], which consults the app's secured views.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, on, MethodFilter, MethodRouter},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::application::security::{
    authenticated_userid, forget, remember, view_execution_permitted,
};
use crate::domain::app_config::{AppConfigError, IdentityAction, RouteConfig};
use crate::domain::security::{RememberOptions, Resource, SecurityRegistry, StaticResource};
use crate::infrastructure::app_loader::{LoadedApp, LoadedRoute};

use super::environ::GatewayEnviron;

/// Largest request body a view will read.
const MAX_REQUEST_BODY: usize = 1024 * 1024;

pub struct RouteState {
    pub registry: Arc<SecurityRegistry>,
    pub context: Arc<StaticResource>,
    pub route: RouteConfig,
}

/// Load application `name` from `path` and build its router
pub fn load_app(path: impl AsRef<Path>, name: &str) -> Result<Router, AppConfigError> {
    Ok(app(LoadedApp::from_file(path, name)?))
}

pub fn app(loaded: LoadedApp) -> Router {
    let LoadedApp {
        registry, routes, ..
    } = loaded;

    routes
        .into_iter()
        .fold(Router::new(), |router, LoadedRoute { config, context }| {
            let path = config.path.clone();
            let guarded = config.permission.is_some();
            let state = Arc::new(RouteState {
                registry: registry.clone(),
                context,
                route: config,
            });

            let mut route = Router::new().route(&path, method_router(&state.route));
            if guarded {
                route = route.route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    enforce_view_permission,
                ));
            }
            router.merge(route.with_state(state))
        })
}

fn method_router(route: &RouteConfig) -> MethodRouter<Arc<RouteState>> {
    let filter = route
        .methods
        .iter()
        .filter_map(|method| method_filter(method))
        .reduce(MethodFilter::or);

    match filter {
        Some(filter) => on(filter, render_view),
        None => any(render_view),
    }
}

fn method_filter(method: &str) -> Option<MethodFilter> {
    let method = Method::from_bytes(method.to_uppercase().as_bytes()).ok()?;
    MethodFilter::try_from(method).ok()
}

/// Run the route's secured view check before the view itself; a denial
/// becomes `403 Forbidden` carrying the permission message.
pub async fn enforce_view_permission(
    State(state): State<Arc<RouteState>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let view_name = state.route.view_name();
    let outcome =
        view_execution_permitted(&state.registry, &*state.context, &parts, view_name);

    if !outcome.is_allowed() {
        warn!("Forbidden: view '{}' on '{}': {}", view_name, state.context.name(), outcome);
        return (StatusCode::FORBIDDEN, outcome.to_string()).into_response();
    }

    debug!("Permitted: view '{}': {}", view_name, outcome);
    next.run(Request::from_parts(parts, body)).await
}

async fn render_view(State(state): State<Arc<RouteState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let route = &state.route;

    let request_body = match to_bytes(body, MAX_REQUEST_BODY).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response();
        }
    };

    let userid = authenticated_userid(&state.registry, &parts).unwrap_or_default();
    let query = parts.uri.query().unwrap_or_default();
    let command_request = parts
        .extensions
        .get::<GatewayEnviron>()
        .map(|environ| environ.command_request)
        .unwrap_or(false)
        .to_string();

    let rendered = render_template(&route.body, |placeholder| match placeholder {
        "userid" => Some(userid.as_str()),
        "query" => Some(query),
        "command_request" => Some(command_request.as_str()),
        "request_body" => Some(request_body.as_str()),
        _ => None,
    });

    let mut headers = HeaderMap::new();
    if let Ok(content_type) = HeaderValue::from_str(&route.content_type) {
        headers.insert(header::CONTENT_TYPE, content_type);
    }

    let instructions = match route.identity {
        Some(IdentityAction::Remember) => {
            let principal = query_param(query, "principal").unwrap_or(userid);
            let options = RememberOptions {
                max_age: route.max_age,
            };
            remember(&state.registry, &parts, &principal, &options)
        }
        Some(IdentityAction::Forget) => forget(&state.registry, &parts),
        None => Vec::new(),
    };
    for (name, value) in instructions {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                headers.append(name, value);
            }
            _ => warn!("Skipping invalid header instruction '{}'", name),
        }
    }

    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK);
    (status, headers, Body::from(rendered)).into_response()
}

/// Substitute `{name}` placeholders in one pass; inserted values are never
/// rescanned and unknown placeholders are kept as written.
fn render_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let value = candidate
            .find('}')
            .and_then(|end| lookup(&candidate[1..end]).map(|value| (value, end)));
        match value {
            Some((value, end)) => {
                rendered.push_str(value);
                rest = &candidate[end + 1..];
            }
            None => {
                rendered.push('{');
                rest = &candidate[1..];
            }
        }
    }
    rendered.push_str(rest);
    rendered
}

fn query_param(query: &str, key: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
}
