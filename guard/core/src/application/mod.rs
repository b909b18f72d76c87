// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod security;

// Re-export use cases for convenience
pub use security::{
    authenticated_userid, effective_principals, forget, has_permission,
    principals_allowed_by_permission, remember, view_execution_permitted, SecurityError,
};
