// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for AEGIS Guard CLI

pub mod prequest;

pub use self::prequest::{AppLoader, PRequestArgs, PRequestCommand, RequestMethod, EXIT_USAGE};
