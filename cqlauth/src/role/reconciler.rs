// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// RoleReconciler - create, alter, read and drop login roles
use super::credential::verify;
use super::model::{validate_role_name, RoleSpec, RoleState};
use super::statement::{render_drop_role, render_read_role, render_role, render_role_redacted, RoleVerb};
use crate::config::AuthzConfig;
use crate::error::{AuthzError, AuthzResult};
use crate::executor::QueryExecutor;

#[derive(Debug, Clone)]
pub struct RoleReconciler {
    config: AuthzConfig,
}

impl RoleReconciler {
    pub fn new(config: AuthzConfig) -> AuthzResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AuthzConfig {
        &self.config
    }

    pub fn create(&self, executor: &dyn QueryExecutor, spec: &RoleSpec) -> AuthzResult<RoleState> {
        self.apply(executor, RoleVerb::Create, spec)
    }

    pub fn update(&self, executor: &dyn QueryExecutor, spec: &RoleSpec) -> AuthzResult<RoleState> {
        self.apply(executor, RoleVerb::Alter, spec)
    }

    fn apply(
        &self,
        executor: &dyn QueryExecutor,
        verb: RoleVerb,
        spec: &RoleSpec,
    ) -> AuthzResult<RoleState> {
        spec.validate()?;

        // Only the redacted form may leave this function
        let redacted = render_role_redacted(verb, spec);
        log::debug!("Executing statement {}", redacted);
        executor
            .execute(&render_role(verb, spec))
            .map_err(|e| AuthzError::execution(redacted, e))?;

        log::info!("{} ROLE '{}' applied", verb.as_str(), spec.name);
        self.read(executor, &spec.name, Some(&spec.password))
    }

    /// Read the role back from the catalog
    ///
    /// `known_password` is the plaintext the caller last applied. It is
    /// reported back unchanged when it still verifies against the stored
    /// hash; otherwise, or when no plaintext is known, the stored hash is
    /// reported so the caller sees the drift.
    pub fn read(
        &self,
        executor: &dyn QueryExecutor,
        name: &str,
        known_password: Option<&str>,
    ) -> AuthzResult<RoleState> {
        validate_role_name(name)?;
        let query = render_read_role(name, &self.config.system_keyspace);

        log::debug!("Executing query {}", query);
        let rows = executor
            .query(&query)
            .map_err(|e| AuthzError::execution(&query, e))?;

        let row = rows.first().ok_or_else(|| {
            AuthzError::RoleNotFound(format!(
                "cannot read role with name {} from {}.roles",
                name, self.config.system_keyspace
            ))
        })?;

        let column_error = |e| AuthzError::execution(&query, e);
        let observed_name = row.get_str("role").map_err(column_error)?.to_string();
        let login = row.get_bool("can_login").map_err(column_error)?;
        let super_user = row.get_bool("is_superuser").map_err(column_error)?;
        let salted_hash = row
            .get_opt_str("salted_hash")
            .map_err(column_error)?
            .unwrap_or_default()
            .to_string();

        let (password, password_drifted) = match known_password {
            Some(plaintext)
                if verify(self.config.password_algorithm, &salted_hash, plaintext).is_match() =>
            {
                (plaintext.to_string(), false)
            }
            Some(_) => {
                log::debug!(
                    "Password for role '{}' no longer matches the stored {} hash",
                    name,
                    self.config.password_algorithm
                );
                (salted_hash, true)
            }
            None => (salted_hash, true),
        };

        Ok(RoleState {
            name: observed_name,
            super_user,
            login,
            password,
            password_drifted,
        })
    }

    /// Drop the role; a missing role is reported by the cluster and surfaced
    pub fn delete(&self, executor: &dyn QueryExecutor, name: &str) -> AuthzResult<()> {
        validate_role_name(name)?;
        let statement = render_drop_role(name);

        log::debug!("Executing statement {}", statement);
        executor
            .execute(&statement)
            .map_err(|e| AuthzError::execution(&statement, e))?;

        log::info!("Dropped role '{}'", name);
        Ok(())
    }
}
