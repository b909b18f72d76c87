// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Security Domain Module
//!
//! Value objects and capability traits of the security subsystem.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`permission`] | `PermissionResult`, `PermissionOutcome` |
//! | [`principal`] | `EVERYONE`, `AUTHENTICATED`, `AllPermissionsList` |
//! | [`acl`] | `Ace`, `Acl` |
//! | [`resource`] | `Resource` trait, `StaticResource`, lineage walking |
//! | [`policy`] | `AuthenticationPolicy`, `AuthorizationPolicy`, `SecuredView` |
//! | [`registry`] | `SecurityRegistry`, `SecuritySettings` |
//!
//! The functions that consult a registry live in
//! [`crate::application::security`]; concrete policies live in
//! [`crate::infrastructure::security`].

pub mod acl;
pub mod permission;
pub mod policy;
pub mod principal;
pub mod registry;
pub mod resource;

pub use acl::{Ace, AceAction, AcePermissions, Acl};
pub use permission::{AclProvenance, PermissionOutcome, PermissionResult};
pub use policy::{
    AuthenticationPolicy, AuthorizationPolicy, HeaderInstruction, RememberOptions, SecuredView,
};
pub use principal::{AllPermissionsList, ALL_PERMISSIONS, AUTHENTICATED, EVERYONE};
pub use registry::{SecurityRegistry, SecuritySettings};
pub use resource::{lineage, Resource, StaticResource};
