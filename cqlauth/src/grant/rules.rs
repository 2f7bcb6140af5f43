// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Grant validation rules
//!
//! Three lookup tables decide whether a grant request is legal:
//!
//! - privilege → resource types it may be granted on
//! - resource types that must be qualified by a keyspace
//! - resource type → identifier kind it requires
//!
//! The tables are built once on first use and never mutated afterwards. All
//! access goes through the pure functions below.

use super::model::{Grant, GrantRequest, IdentifierKind, Privilege, ResourceType};
use crate::config::is_valid_keyspace_name;
use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

const MAX_NAME_LEN: usize = 256;

static PRIVILEGE_RESOURCE_TYPES: Lazy<HashMap<Privilege, Vec<ResourceType>>> = Lazy::new(|| {
    use ResourceType::*;
    HashMap::from([
        (
            Privilege::All,
            vec![
                AllFunctions,
                AllFunctionsInKeyspace,
                Function,
                AllKeyspaces,
                Keyspace,
                Table,
                AllRoles,
                Role,
            ],
        ),
        (
            Privilege::Create,
            vec![
                AllKeyspaces,
                Keyspace,
                AllFunctions,
                AllFunctionsInKeyspace,
                AllRoles,
            ],
        ),
        (
            Privilege::Alter,
            vec![
                AllKeyspaces,
                Keyspace,
                Table,
                AllFunctions,
                AllFunctionsInKeyspace,
                Function,
                AllRoles,
                Role,
            ],
        ),
        (
            Privilege::Drop,
            vec![
                Keyspace,
                Table,
                AllFunctions,
                AllFunctionsInKeyspace,
                Function,
                AllRoles,
                Role,
            ],
        ),
        (
            Privilege::Select,
            vec![AllKeyspaces, Keyspace, Table, AllMbeans, Mbeans, Mbean],
        ),
        (
            Privilege::Modify,
            vec![AllKeyspaces, Keyspace, Table, AllMbeans, Mbeans, Mbean],
        ),
        (
            Privilege::Authorize,
            vec![
                AllKeyspaces,
                Keyspace,
                Table,
                Function,
                AllFunctions,
                AllFunctionsInKeyspace,
                AllRoles,
                Roles,
            ],
        ),
        (Privilege::Describe, vec![AllRoles, AllMbeans]),
        (
            Privilege::Execute,
            vec![AllFunctions, AllFunctionsInKeyspace, Function],
        ),
    ])
});

static KEYSPACE_SCOPED: Lazy<HashSet<ResourceType>> = Lazy::new(|| {
    HashSet::from([
        ResourceType::AllFunctionsInKeyspace,
        ResourceType::Function,
        ResourceType::Keyspace,
        ResourceType::Table,
    ])
});

static IDENTIFIER_KINDS: Lazy<HashMap<ResourceType, IdentifierKind>> = Lazy::new(|| {
    HashMap::from([
        (ResourceType::Function, IdentifierKind::FunctionName),
        (ResourceType::Mbean, IdentifierKind::MbeanName),
        (ResourceType::Mbeans, IdentifierKind::MbeanPattern),
        (ResourceType::Table, IdentifierKind::TableName),
        (ResourceType::Role, IdentifierKind::RoleName),
    ])
});

static TABLE_NAME_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_]{0,255}$").ok());

/// Resource types `privilege` may be granted on, in declaration order
pub fn valid_resource_types(privilege: Privilege) -> &'static [ResourceType] {
    PRIVILEGE_RESOURCE_TYPES
        .get(&privilege)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn is_compatible(privilege: Privilege, resource_type: ResourceType) -> bool {
    valid_resource_types(privilege).contains(&resource_type)
}

/// Whether `resource_type` must be qualified by a keyspace
pub fn requires_keyspace(resource_type: ResourceType) -> bool {
    KEYSPACE_SCOPED.contains(&resource_type)
}

/// Identifier the resource type needs, if any
pub fn identifier_kind(resource_type: ResourceType) -> Option<IdentifierKind> {
    IDENTIFIER_KINDS.get(&resource_type).copied()
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// 1..=256 characters, counted as chars rather than bytes
fn within_name_length(value: &str) -> bool {
    (1..=MAX_NAME_LEN).contains(&value.chars().count())
}

fn check_grantee(grantee: &str) -> Result<(), ValidationError> {
    if grantee.is_empty() {
        return Err(ValidationError::MissingIdentifier {
            field: "grantee".to_string(),
            resource_type: "any".to_string(),
        });
    }
    if !within_name_length(grantee) || grantee.contains('"') {
        return Err(ValidationError::InvalidIdentifierFormat {
            field: "grantee".to_string(),
            value: grantee.to_string(),
        });
    }
    Ok(())
}

/// Check `value` against the syntax rule for `kind`
pub fn check_identifier(kind: IdentifierKind, value: &str) -> Result<(), ValidationError> {
    let valid = match kind {
        IdentifierKind::FunctionName | IdentifierKind::MbeanName => {
            within_name_length(value) && !value.contains('"')
        }
        IdentifierKind::TableName => TABLE_NAME_REGEX
            .as_ref()
            .map_or(false, |regex| regex.is_match(value)),
        IdentifierKind::RoleName => within_name_length(value),
        IdentifierKind::MbeanPattern => {
            return Regex::new(value)
                .map(|_| ())
                .map_err(|e| ValidationError::InvalidPattern {
                    pattern: value.to_string(),
                    reason: e.to_string(),
                });
        }
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidIdentifierFormat {
            field: kind.field_name().to_string(),
            value: value.to_string(),
        })
    }
}

/// Turn a raw request into a [`Grant`], or say precisely why it is illegal
///
/// Pure and total: no I/O, and every input yields either a grant or a
/// [`ValidationError`]. A keyspace qualifier or identifier supplied for a
/// resource type that does not use it is dropped rather than rejected.
pub fn validate(request: &GrantRequest) -> Result<Grant, ValidationError> {
    let privilege: Privilege =
        request
            .privilege
            .parse()
            .map_err(|_| ValidationError::UnknownPrivilege {
                privilege: request.privilege.clone(),
                valid: join(&Privilege::ALL),
            })?;

    let allowed = valid_resource_types(privilege);
    if allowed.is_empty() {
        return Err(ValidationError::UnknownPrivilege {
            privilege: request.privilege.clone(),
            valid: join(&Privilege::ALL),
        });
    }

    let resource_type = request
        .resource_type
        .parse::<ResourceType>()
        .ok()
        .filter(|resource_type| allowed.contains(resource_type))
        .ok_or_else(|| ValidationError::IncompatibleResourceType {
            privilege: privilege.to_string(),
            resource_type: request.resource_type.clone(),
            valid: join(allowed),
        })?;

    check_grantee(&request.grantee)?;

    let keyspace = if requires_keyspace(resource_type) {
        if request.keyspace_name.is_empty() {
            return Err(ValidationError::MissingKeyspaceQualifier {
                resource_type: resource_type.to_string(),
            });
        }
        if !is_valid_keyspace_name(&request.keyspace_name) {
            return Err(ValidationError::InvalidIdentifierFormat {
                field: "keyspace_name".to_string(),
                value: request.keyspace_name.clone(),
            });
        }
        Some(request.keyspace_name.clone())
    } else {
        if !request.keyspace_name.is_empty() {
            log::debug!(
                "Ignoring keyspace_name '{}' for resource type {}",
                request.keyspace_name,
                resource_type
            );
        }
        None
    };

    let identifier = match identifier_kind(resource_type) {
        Some(kind) => {
            if request.identifier.is_empty() {
                return Err(ValidationError::MissingIdentifier {
                    field: kind.field_name().to_string(),
                    resource_type: resource_type.to_string(),
                });
            }
            check_identifier(kind, &request.identifier)?;
            Some(request.identifier.clone())
        }
        None => None,
    };

    Ok(Grant {
        privilege,
        resource_type,
        grantee: request.grantee.clone(),
        keyspace,
        identifier,
    })
}
