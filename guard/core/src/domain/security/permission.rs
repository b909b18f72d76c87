// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Permission Results
//!
//! A [`PermissionResult`] is a boolean-like verdict that carries a
//! human-readable explanation. The ACL variants additionally record which ACE
//! of which ACL decided the outcome, and on which context.
//!
//! Authorization policies and secured views may answer either with a bare
//! boolean or with a rich result; [`PermissionOutcome`] covers both and is
//! unwrapped to a boolean with [`PermissionOutcome::is_allowed`].

use std::fmt;

/// Provenance of an ACL-derived decision. The message is rendered once at
/// construction and never recomputed.
#[derive(Clone, PartialEq, Eq)]
pub struct AclProvenance {
    ace: String,
    acl: String,
    permission: String,
    principals: String,
    context: String,
    msg: String,
}

impl AclProvenance {
    fn new(
        variant: &str,
        ace: impl fmt::Display,
        acl: impl fmt::Display,
        permission: &str,
        principals: impl fmt::Display,
        context: impl fmt::Display,
    ) -> Self {
        let ace = ace.to_string();
        let acl = acl.to_string();
        let principals = principals.to_string();
        let context = context.to_string();
        let msg = format!(
            "{variant} permission '{permission}' via ACE '{ace}' in ACL '{acl}' \
             on context '{context}' for principals '{principals}'"
        );
        Self {
            ace,
            acl,
            permission: permission.to_string(),
            principals,
            context,
            msg,
        }
    }

    pub fn ace(&self) -> &str {
        &self.ace
    }

    pub fn acl(&self) -> &str {
        &self.acl
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn principals(&self) -> &str {
        &self.principals
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Boolean-like permission verdict with an explanation.
#[derive(Clone, PartialEq, Eq)]
pub enum PermissionResult {
    Allowed { msg: String },
    Denied { msg: String },
    AclAllowed(AclProvenance),
    AclDenied(AclProvenance),
}

impl PermissionResult {
    pub fn allowed(msg: impl Into<String>) -> Self {
        Self::Allowed { msg: msg.into() }
    }

    pub fn denied(msg: impl Into<String>) -> Self {
        Self::Denied { msg: msg.into() }
    }

    /// ACL grant, naming the ACE, ACL, permission, principals and context
    /// that produced it.
    pub fn acl_allowed(
        ace: impl fmt::Display,
        acl: impl fmt::Display,
        permission: &str,
        principals: impl fmt::Display,
        context: impl fmt::Display,
    ) -> Self {
        Self::AclAllowed(AclProvenance::new(
            "ACLAllowed",
            ace,
            acl,
            permission,
            principals,
            context,
        ))
    }

    /// ACL refusal; see [`PermissionResult::acl_allowed`].
    pub fn acl_denied(
        ace: impl fmt::Display,
        acl: impl fmt::Display,
        permission: &str,
        principals: impl fmt::Display,
        context: impl fmt::Display,
    ) -> Self {
        Self::AclDenied(AclProvenance::new(
            "ACLDenied",
            ace,
            acl,
            permission,
            principals,
            context,
        ))
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. } | Self::AclAllowed(_))
    }

    pub fn msg(&self) -> &str {
        match self {
            Self::Allowed { msg } | Self::Denied { msg } => msg,
            Self::AclAllowed(provenance) | Self::AclDenied(provenance) => &provenance.msg,
        }
    }

    /// ACL provenance, when the verdict came from an ACL.
    pub fn provenance(&self) -> Option<&AclProvenance> {
        match self {
            Self::AclAllowed(provenance) | Self::AclDenied(provenance) => Some(provenance),
            _ => None,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Allowed { .. } => "Allowed",
            Self::Denied { .. } => "Denied",
            Self::AclAllowed(_) => "ACLAllowed",
            Self::AclDenied(_) => "ACLDenied",
        }
    }
}

impl fmt::Display for PermissionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.msg())
    }
}

impl fmt::Debug for PermissionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} instance with msg '{}'>", self.variant_name(), self.msg())
    }
}

impl PartialEq<bool> for PermissionResult {
    fn eq(&self, other: &bool) -> bool {
        self.is_allowed() == *other
    }
}

impl From<PermissionResult> for bool {
    fn from(result: PermissionResult) -> Self {
        result.is_allowed()
    }
}

/// What a policy or secured view answered: a bare boolean or a rich result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionOutcome {
    Bool(bool),
    Detailed(PermissionResult),
}

impl PermissionOutcome {
    pub fn is_allowed(&self) -> bool {
        match self {
            Self::Bool(allowed) => *allowed,
            Self::Detailed(result) => result.is_allowed(),
        }
    }

    pub fn msg(&self) -> Option<&str> {
        match self {
            Self::Bool(_) => None,
            Self::Detailed(result) => Some(result.msg()),
        }
    }

    pub fn as_result(&self) -> Option<&PermissionResult> {
        match self {
            Self::Bool(_) => None,
            Self::Detailed(result) => Some(result),
        }
    }
}

impl From<bool> for PermissionOutcome {
    fn from(allowed: bool) -> Self {
        Self::Bool(allowed)
    }
}

impl From<PermissionResult> for PermissionOutcome {
    fn from(result: PermissionResult) -> Self {
        Self::Detailed(result)
    }
}

impl fmt::Display for PermissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("Allowed"),
            Self::Bool(false) => f.write_str("Denied"),
            Self::Detailed(result) => result.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed() {
        let allowed = PermissionResult::allowed("hello");
        assert_eq!(allowed.msg(), "hello");
        assert_eq!(allowed, true);
        assert!(allowed.is_allowed());
        assert_eq!(allowed.to_string(), "hello");
        assert_eq!(format!("{:?}", allowed), "<Allowed instance with msg 'hello'>");
    }

    #[test]
    fn test_denied() {
        let denied = PermissionResult::denied("hello");
        assert_eq!(denied.msg(), "hello");
        assert_eq!(denied, false);
        assert!(!denied.is_allowed());
        assert_eq!(denied.to_string(), "hello");
        assert_eq!(format!("{:?}", denied), "<Denied instance with msg 'hello'>");
    }

    #[test]
    fn test_acl_allowed() {
        let msg = "ACLAllowed permission 'permission' via ACE 'ace' in ACL 'acl' \
                   on context 'ctx' for principals 'principals'";
        let allowed = PermissionResult::acl_allowed("ace", "acl", "permission", "principals", "ctx");
        assert!(allowed.msg().contains(msg));
        assert_eq!(allowed, true);
        assert_eq!(allowed.to_string(), msg);
        assert!(format!("{:?}", allowed).starts_with("<ACLAllowed instance"));

        let provenance = allowed.provenance().unwrap();
        assert_eq!(provenance.ace(), "ace");
        assert_eq!(provenance.acl(), "acl");
        assert_eq!(provenance.permission(), "permission");
        assert_eq!(provenance.principals(), "principals");
        assert_eq!(provenance.context(), "ctx");
    }

    #[test]
    fn test_acl_denied() {
        let msg = "ACLDenied permission 'permission' via ACE 'ace' in ACL 'acl' \
                   on context 'ctx' for principals 'principals'";
        let denied = PermissionResult::acl_denied("ace", "acl", "permission", "principals", "ctx");
        assert!(denied.msg().contains(msg));
        assert_eq!(denied, false);
        assert_eq!(denied.to_string(), msg);
        assert!(format!("{:?}", denied).starts_with("<ACLDenied instance"));
    }

    #[test]
    fn test_outcome_unwraps_to_bool() {
        assert!(PermissionOutcome::from(true).is_allowed());
        assert!(!PermissionOutcome::from(false).is_allowed());
        assert!(PermissionOutcome::from(PermissionResult::allowed("ok")).is_allowed());
        assert!(!PermissionOutcome::from(PermissionResult::denied("no")).is_allowed());

        assert_eq!(PermissionOutcome::Bool(true).msg(), None);
        assert_eq!(PermissionOutcome::Bool(false).to_string(), "Denied");
        assert_eq!(
            PermissionOutcome::from(PermissionResult::denied("nope")).msg(),
            Some("nope")
        );
    }
}
