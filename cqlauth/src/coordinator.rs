// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Authorization coordinator
//!
//! Single entry point used by the declarative layer. It owns the validated
//! configuration and dispatches grant and role operations to their
//! reconcilers. Every call borrows an executor for its duration only, so one
//! coordinator can serve concurrent callers working on distinct grants or
//! roles.

use crate::config::AuthzConfig;
use crate::error::AuthzResult;
use crate::executor::QueryExecutor;
use crate::grant::{Grant, GrantReconciler, GrantRequest};
use crate::role::{RoleReconciler, RoleSpec, RoleState};

#[derive(Debug, Clone)]
pub struct AuthzCoordinator {
    grants: GrantReconciler,
    roles: RoleReconciler,
}

impl AuthzCoordinator {
    /// Build a coordinator, rejecting an invalid configuration up front
    pub fn new(config: AuthzConfig) -> AuthzResult<Self> {
        let grants = GrantReconciler::new(config.clone())?;
        let roles = RoleReconciler::new(config)?;
        log::info!(
            "Authorization coordinator using {} with {} password hashes",
            grants.config().system_keyspace,
            grants.config().password_algorithm
        );
        Ok(Self { grants, roles })
    }

    pub fn config(&self) -> &AuthzConfig {
        self.grants.config()
    }

    pub fn create_grant(
        &self,
        executor: &dyn QueryExecutor,
        request: &GrantRequest,
    ) -> AuthzResult<Grant> {
        self.grants.create(executor, request)
    }

    pub fn grant_exists(
        &self,
        executor: &dyn QueryExecutor,
        request: &GrantRequest,
    ) -> AuthzResult<bool> {
        self.grants.exists(executor, request)
    }

    pub fn read_grant(
        &self,
        executor: &dyn QueryExecutor,
        request: &GrantRequest,
    ) -> AuthzResult<Grant> {
        self.grants.read(executor, request)
    }

    pub fn delete_grant(
        &self,
        executor: &dyn QueryExecutor,
        request: &GrantRequest,
    ) -> AuthzResult<()> {
        self.grants.delete(executor, request)
    }

    /// Always fails: grants are replaced, never altered
    pub fn update_grant(&self, request: &GrantRequest) -> AuthzResult<Grant> {
        self.grants.update(request)
    }

    pub fn create_role(
        &self,
        executor: &dyn QueryExecutor,
        spec: &RoleSpec,
    ) -> AuthzResult<RoleState> {
        self.roles.create(executor, spec)
    }

    pub fn update_role(
        &self,
        executor: &dyn QueryExecutor,
        spec: &RoleSpec,
    ) -> AuthzResult<RoleState> {
        self.roles.update(executor, spec)
    }

    pub fn read_role(
        &self,
        executor: &dyn QueryExecutor,
        name: &str,
        known_password: Option<&str>,
    ) -> AuthzResult<RoleState> {
        self.roles.read(executor, name, known_password)
    }

    pub fn delete_role(&self, executor: &dyn QueryExecutor, name: &str) -> AuthzResult<()> {
        self.roles.delete(executor, name)
    }
}
