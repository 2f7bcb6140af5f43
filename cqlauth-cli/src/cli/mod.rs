// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for cqlauth
//!
//! Offline helpers around the library: render the CQL a grant compiles to,
//! print the compatibility matrix, check a password against a stored hash
//! and show role statements with the password masked.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_matrix, handle_render, handle_role_statement, handle_verify_password};
