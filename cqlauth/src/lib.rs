// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! cqlauth - Role and grant reconciliation for Cassandra and ScyllaDB
//!
//! cqlauth turns declared roles and privilege grants into CQL statements and
//! reads the cluster's auth catalog back so a control loop can tell whether
//! anything drifted.
//!
//! # Features
//!
//! - **Grant rules**: the privilege / resource type compatibility table,
//!   keyspace qualification and identifier syntax checks
//! - **Statement rendering**: deterministic GRANT, REVOKE and catalog lookup text
//! - **Grant lifecycle**: create with read-back verification, existence
//!   checks, idempotent revoke
//! - **Role lifecycle**: CREATE / ALTER / DROP ROLE with password drift
//!   detection against bcrypt or SHA-512 hashes
//!
//! # Usage
//!
//! The crate never connects to a cluster. Implement [`QueryExecutor`] over
//! an existing session and pass it to each call:
//!
//! ```ignore
//! use cqlauth::{AuthzConfig, AuthzCoordinator, GrantRequest};
//!
//! let coordinator = AuthzCoordinator::new(AuthzConfig::default())?;
//! let request = GrantRequest::new("select", "table", "alice")
//!     .keyspace("ks1")
//!     .identifier("t1");
//! coordinator.create_grant(&session, &request)?;
//! assert!(coordinator.grant_exists(&session, &request)?);
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod grant;
pub mod role;

pub use config::{AuthzConfig, DEFAULT_SYSTEM_KEYSPACE};
pub use coordinator::AuthzCoordinator;
pub use error::{AuthzError, AuthzResult, ValidationError};
pub use executor::{ExecutorError, QueryExecutor, Row, Value};
pub use grant::{Grant, GrantRequest, IdentifierKind, Privilege, ResourceType};
pub use role::{PasswordAlgorithm, RoleSpec, RoleState, Verdict};

/// cqlauth version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// cqlauth crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
