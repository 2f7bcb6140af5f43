// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// CQL text for roles

use super::model::RoleSpec;
use crate::grant::statement::quote_literal;

/// Placeholder substituted for passwords in anything that gets logged
pub const REDACTED: &str = "'***'";

/// CREATE for new roles, ALTER for existing ones; the rest of the
/// statement is identical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleVerb {
    Create,
    Alter,
}

impl RoleVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleVerb::Create => "CREATE",
            RoleVerb::Alter => "ALTER",
        }
    }
}

fn render_with_password(verb: RoleVerb, spec: &RoleSpec, password: &str) -> String {
    format!(
        "{} ROLE {} WITH PASSWORD = {} AND LOGIN = {} AND SUPERUSER = {}",
        verb.as_str(),
        quote_literal(&spec.name),
        password,
        spec.login,
        spec.super_user
    )
}

pub fn render_role(verb: RoleVerb, spec: &RoleSpec) -> String {
    render_with_password(verb, spec, &quote_literal(&spec.password))
}

/// Same statement with the password masked, for logs and error context
pub fn render_role_redacted(verb: RoleVerb, spec: &RoleSpec) -> String {
    render_with_password(verb, spec, REDACTED)
}

pub fn render_drop_role(name: &str) -> String {
    format!("DROP ROLE {}", quote_literal(name))
}

pub fn render_read_role(name: &str, system_keyspace: &str) -> String {
    format!(
        "SELECT role, can_login, is_superuser, salted_hash FROM {}.roles WHERE role = {}",
        system_keyspace,
        quote_literal(name)
    )
}
