// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Privilege grants
//!
//! Validation rules and statement rendering are pure; the reconciler is the
//! only part that talks to the cluster.

pub mod model;
pub mod reconciler;
pub mod rules;
pub mod statement;

pub use model::{Grant, GrantRequest, IdentifierKind, Privilege, ResourceType};
pub use reconciler::GrantReconciler;
pub use rules::{identifier_kind, is_compatible, requires_keyspace, valid_resource_types, validate};
pub use statement::{render_existence_query, render_grant, render_revoke};
