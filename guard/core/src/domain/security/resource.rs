// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Resources are the contexts permission checks are evaluated against. A
//! resource may carry an ACL and may have a parent; the chain of parents up to
//! the root is its lineage.

use std::fmt;
use std::sync::Arc;

use super::acl::Acl;

pub trait Resource: Send + Sync {
    fn name(&self) -> &str;

    /// Kind used to key secured views registered for a specific resource type.
    fn kind(&self) -> &str {
        "resource"
    }

    fn acl(&self) -> Option<&Acl> {
        None
    }

    fn parent(&self) -> Option<&dyn Resource> {
        None
    }
}

/// Walk from `resource` up to the root, `resource` first.
pub fn lineage<'a>(resource: &'a dyn Resource) -> impl Iterator<Item = &'a dyn Resource> + 'a {
    std::iter::successors(Some(resource), |current| current.parent())
}

impl fmt::Display for dyn Resource + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resource tree node built from configuration.
#[derive(Debug, Clone)]
pub struct StaticResource {
    name: String,
    kind: String,
    acl: Option<Acl>,
    parent: Option<Arc<StaticResource>>,
}

impl StaticResource {
    pub fn root(acl: Option<Acl>) -> Self {
        Self {
            name: "/".to_string(),
            kind: "root".to_string(),
            acl,
            parent: None,
        }
    }

    pub fn child(
        parent: Arc<StaticResource>,
        name: impl Into<String>,
        kind: impl Into<String>,
        acl: Option<Acl>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            acl,
            parent: Some(parent),
        }
    }
}

impl Resource for StaticResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn acl(&self) -> Option<&Acl> {
        self.acl.as_ref()
    }

    fn parent(&self) -> Option<&dyn Resource> {
        self.parent.as_deref().map(|parent| parent as &dyn Resource)
    }
}
