// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CQL text for grants
//!
//! GRANT and REVOKE share one layout:
//!
//! ```text
//! <VERB> <privilege> ON <resource type> ["ks"][.]["identifier"] <TO|FROM> "grantee"
//! ```
//!
//! The keyspace and identifier segments appear only when present and the
//! dot only when both do. Rendering is a pure function of the grant.

use super::model::Grant;

/// Double-quote a CQL identifier, doubling any embedded quote
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quote a CQL string literal, doubling any embedded quote
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn render_with(verb: &str, preposition: &str, grant: &Grant) -> String {
    let mut resource = String::new();
    if let Some(keyspace) = grant.keyspace.as_deref() {
        resource.push_str(&quote_identifier(keyspace));
    }
    if grant.keyspace.is_some() && grant.identifier.is_some() {
        resource.push('.');
    }
    if let Some(identifier) = grant.identifier.as_deref() {
        resource.push_str(&quote_identifier(identifier));
    }

    let mut statement = format!("{} {} ON {}", verb, grant.privilege, grant.resource_type);
    if !resource.is_empty() {
        statement.push(' ');
        statement.push_str(&resource);
    }
    statement.push_str(&format!(
        " {} {}",
        preposition,
        quote_identifier(&grant.grantee)
    ));
    statement
}

pub fn render_grant(grant: &Grant) -> String {
    render_with("GRANT", "TO", grant)
}

pub fn render_revoke(grant: &Grant) -> String {
    render_with("REVOKE", "FROM", grant)
}

/// Permission catalog path for the grant, `data/<ks>[/<identifier>]`
pub fn resource_path(grant: &Grant) -> String {
    let mut path = String::from("data/");
    path.push_str(grant.keyspace());
    if grant.keyspace.is_some() && grant.identifier.is_some() {
        path.push('/');
    }
    path.push_str(grant.identifier());
    path
}

/// Lookup against `<system_keyspace>.role_permissions` for the grant's
/// resource and grantee
pub fn render_existence_query(grant: &Grant, system_keyspace: &str) -> String {
    format!(
        "SELECT permissions FROM {}.role_permissions where resource={} and role={} ALLOW FILTERING;",
        system_keyspace,
        quote_literal(&resource_path(grant)),
        quote_literal(&grant.grantee)
    )
}
