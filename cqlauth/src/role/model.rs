// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Role definitions

use crate::error::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

const MAX_ROLE_NAME_LEN: usize = 256;
const MIN_PASSWORD_LEN: usize = 40;
const MAX_PASSWORD_LEN: usize = 512;

/// Desired state of a login role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSpec {
    pub name: String,
    #[serde(default)]
    pub super_user: bool,
    #[serde(default = "default_login")]
    pub login: bool,
    pub password: String,
}

fn default_login() -> bool {
    true
}

impl RoleSpec {
    /// Login role without superuser rights
    pub fn new(name: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            super_user: false,
            login: true,
            password: password.to_string(),
        }
    }

    pub fn super_user(mut self, super_user: bool) -> Self {
        self.super_user = super_user;
        self
    }

    pub fn login(mut self, login: bool) -> Self {
        self.login = login;
        self
    }

    /// Boundary checks applied before any statement is rendered
    pub fn validate(&self) -> AuthzResult<()> {
        validate_role_name(&self.name)?;
        let len = self.password.chars().count();
        if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
            return Err(AuthzError::InvalidRole(format!(
                "password for role '{}' must contain between {} and {} characters, got {}",
                self.name, MIN_PASSWORD_LEN, MAX_PASSWORD_LEN, len
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_role_name(name: &str) -> AuthzResult<()> {
    let len = name.chars().count();
    if !(1..=MAX_ROLE_NAME_LEN).contains(&len) {
        return Err(AuthzError::InvalidRole(format!(
            "role name must contain between 1 and {} characters, got {}",
            MAX_ROLE_NAME_LEN, len
        )));
    }
    Ok(())
}

/// Role as observed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleState {
    pub name: String,
    pub super_user: bool,
    pub login: bool,
    /// The caller's plaintext when it still verifies, the stored hash
    /// otherwise
    pub password: String,
    /// Set when `password` is the stored hash
    pub password_drifted: bool,
}
