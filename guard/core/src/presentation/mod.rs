// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`aegis-guard-core`)
//!
//! HTTP surface of a configured application. **No policy logic lives here**;
//! permission decisions are delegated to `crate::application::security`.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`api`] | Axum router built from a loaded application, view permission middleware |
//! | [`environ`] | Gateway request environment synthesized by command-line callers |

pub mod api;
pub mod environ;

pub use api::{app, load_app};
pub use environ::{url_quote, GatewayEnviron};
