// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Header Authentication Policy
//!
//! Trusts an upstream component (reverse proxy, test harness, `prequest
//! --header`) to put the caller's user id in a request header. Group
//! memberships come from configuration.

use axum::http::request::Parts;
use std::collections::BTreeMap;

use crate::domain::security::{
    AuthenticationPolicy, HeaderInstruction, RememberOptions, AUTHENTICATED, EVERYONE,
};

#[derive(Debug, Clone)]
pub struct HeaderAuthenticationPolicy {
    header: String,
    groups: BTreeMap<String, Vec<String>>,
}

impl HeaderAuthenticationPolicy {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            groups: BTreeMap::new(),
        }
    }

    pub fn with_groups(mut self, groups: BTreeMap<String, Vec<String>>) -> Self {
        self.groups = groups;
        self
    }

    pub fn header(&self) -> &str {
        &self.header
    }
}

impl AuthenticationPolicy for HeaderAuthenticationPolicy {
    fn authenticated_userid(&self, request: &Parts) -> Option<String> {
        request
            .headers
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    fn effective_principals(&self, request: &Parts) -> Vec<String> {
        let mut principals = vec![EVERYONE.to_string()];
        if let Some(userid) = self.authenticated_userid(request) {
            let groups = self.groups.get(&userid).cloned().unwrap_or_default();
            principals.push(AUTHENTICATED.to_string());
            principals.push(userid);
            principals.extend(groups);
        }
        principals
    }

    fn remember(
        &self,
        _request: &Parts,
        principal: &str,
        options: &RememberOptions,
    ) -> Vec<HeaderInstruction> {
        let mut headers = vec![(self.header.clone(), principal.to_string())];
        if let Some(max_age) = options.max_age {
            headers.push(("Cache-Control".to_string(), format!("max-age={}", max_age)));
        }
        headers
    }

    fn forget(&self, _request: &Parts) -> Vec<HeaderInstruction> {
        vec![(self.header.clone(), String::new())]
    }
}
