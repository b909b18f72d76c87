// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod acl_policy;
pub mod header_policy;
pub mod permission_view;

pub use acl_policy::AclAuthorizationPolicy;
pub use header_policy::HeaderAuthenticationPolicy;
pub use permission_view::PermissionView;
