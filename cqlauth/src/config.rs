// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Reconciler configuration

use crate::error::{AuthzError, AuthzResult};
use crate::role::credential::PasswordAlgorithm;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Keyspace holding `roles` and `role_permissions` on a stock cluster
pub const DEFAULT_SYSTEM_KEYSPACE: &str = "system_auth";

static KEYSPACE_NAME_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]{1,48}$").ok());

/// Check a keyspace name against the CQL naming rule
pub(crate) fn is_valid_keyspace_name(name: &str) -> bool {
    KEYSPACE_NAME_REGEX
        .as_ref()
        .map_or(false, |regex| regex.is_match(name))
}

/// Settings supplied once by the provider configuration layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthzConfig {
    /// Keyspace that holds the role and permission tables
    pub system_keyspace: String,

    /// Hashing scheme the cluster uses for `salted_hash`
    pub password_algorithm: PasswordAlgorithm,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            system_keyspace: DEFAULT_SYSTEM_KEYSPACE.to_string(),
            password_algorithm: PasswordAlgorithm::Bcrypt,
        }
    }
}

impl AuthzConfig {
    pub fn new(system_keyspace: impl Into<String>, password_algorithm: PasswordAlgorithm) -> Self {
        Self {
            system_keyspace: system_keyspace.into(),
            password_algorithm,
        }
    }

    pub fn with_system_keyspace(mut self, system_keyspace: impl Into<String>) -> Self {
        self.system_keyspace = system_keyspace.into();
        self
    }

    pub fn with_password_algorithm(mut self, password_algorithm: PasswordAlgorithm) -> Self {
        self.password_algorithm = password_algorithm;
        self
    }

    /// Parse and validate a JSON configuration document; missing keys take
    /// their defaults
    pub fn from_json(raw: &str) -> AuthzResult<Self> {
        let config: AuthzConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AuthzResult<()> {
        if !is_valid_keyspace_name(&self.system_keyspace) {
            return Err(AuthzError::Config(format!(
                "'{}' is not a valid system keyspace name",
                self.system_keyspace
            )));
        }
        Ok(())
    }
}
