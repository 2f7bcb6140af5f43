// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Login roles and password drift detection

pub mod credential;
pub mod model;
pub mod reconciler;
pub mod statement;

pub use credential::{verify, PasswordAlgorithm, Verdict};
pub use model::{RoleSpec, RoleState};
pub use reconciler::RoleReconciler;
pub use statement::{render_drop_role, render_role, render_role_redacted, RoleVerb};
