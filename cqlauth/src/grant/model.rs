// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Grant data model
//!
//! [`GrantRequest`] is the raw, string-typed input coming from the caller.
//! [`Grant`] is what survives validation: typed privilege and resource type,
//! with the keyspace qualifier and identifier kept only when the resource
//! type actually uses them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Action categories that can be granted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privilege {
    All,
    Create,
    Alter,
    Drop,
    Select,
    Modify,
    Authorize,
    Describe,
    Execute,
}

impl Privilege {
    pub const ALL: [Privilege; 9] = [
        Privilege::All,
        Privilege::Create,
        Privilege::Alter,
        Privilege::Drop,
        Privilege::Select,
        Privilege::Modify,
        Privilege::Authorize,
        Privilege::Describe,
        Privilege::Execute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::All => "all",
            Privilege::Create => "create",
            Privilege::Alter => "alter",
            Privilege::Drop => "drop",
            Privilege::Select => "select",
            Privilege::Modify => "modify",
            Privilege::Authorize => "authorize",
            Privilege::Describe => "describe",
            Privilege::Execute => "execute",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Privilege::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "'{}' is not a valid privilege, must be one of {}",
                    s,
                    one_of(Privilege::ALL.iter().map(|p| p.as_str()))
                )
            })
    }
}

fn one_of<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// Kinds of object a privilege applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "all functions")]
    AllFunctions,
    #[serde(rename = "all functions in keyspace")]
    AllFunctionsInKeyspace,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "all keyspaces")]
    AllKeyspaces,
    #[serde(rename = "keyspace")]
    Keyspace,
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "all roles")]
    AllRoles,
    #[serde(rename = "role")]
    Role,
    #[serde(rename = "roles")]
    Roles,
    #[serde(rename = "mbean")]
    Mbean,
    #[serde(rename = "mbeans")]
    Mbeans,
    #[serde(rename = "all mbeans")]
    AllMbeans,
}

impl ResourceType {
    pub const ALL: [ResourceType; 12] = [
        ResourceType::AllFunctions,
        ResourceType::AllFunctionsInKeyspace,
        ResourceType::Function,
        ResourceType::AllKeyspaces,
        ResourceType::Keyspace,
        ResourceType::Table,
        ResourceType::AllRoles,
        ResourceType::Role,
        ResourceType::Roles,
        ResourceType::Mbean,
        ResourceType::Mbeans,
        ResourceType::AllMbeans,
    ];

    /// CQL spelling, used verbatim in rendered statements
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::AllFunctions => "all functions",
            ResourceType::AllFunctionsInKeyspace => "all functions in keyspace",
            ResourceType::Function => "function",
            ResourceType::AllKeyspaces => "all keyspaces",
            ResourceType::Keyspace => "keyspace",
            ResourceType::Table => "table",
            ResourceType::AllRoles => "all roles",
            ResourceType::Role => "role",
            ResourceType::Roles => "roles",
            ResourceType::Mbean => "mbean",
            ResourceType::Mbeans => "mbeans",
            ResourceType::AllMbeans => "all mbeans",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    /// Accepts `all keyspaces`, `all-keyspaces` and `all_keyspaces` alike,
    /// case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .split(|c: char| c == ' ' || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();
        ResourceType::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "'{}' is not a valid resource type, must be one of {}",
                    s,
                    one_of(ResourceType::ALL.iter().map(|r| r.as_str()))
                )
            })
    }
}

/// Which identifier field a resource type needs, and therefore which
/// syntax rule applies to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    FunctionName,
    TableName,
    RoleName,
    MbeanName,
    MbeanPattern,
}

impl IdentifierKind {
    /// Field name as exposed to the declarative layer
    pub fn field_name(&self) -> &'static str {
        match self {
            IdentifierKind::FunctionName => "function_name",
            IdentifierKind::TableName => "table_name",
            IdentifierKind::RoleName => "role_name",
            IdentifierKind::MbeanName => "mbean_name",
            IdentifierKind::MbeanPattern => "mbean_pattern",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Unvalidated grant input as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrantRequest {
    pub privilege: String,
    pub resource_type: String,
    pub grantee: String,
    pub keyspace_name: String,
    pub identifier: String,
}

impl GrantRequest {
    pub fn new(privilege: &str, resource_type: &str, grantee: &str) -> Self {
        Self {
            privilege: privilege.to_string(),
            resource_type: resource_type.to_string(),
            grantee: grantee.to_string(),
            ..Default::default()
        }
    }

    pub fn keyspace(mut self, keyspace_name: &str) -> Self {
        self.keyspace_name = keyspace_name.to_string();
        self
    }

    pub fn identifier(mut self, identifier: &str) -> Self {
        self.identifier = identifier.to_string();
        self
    }
}

/// A validated authorization edge
///
/// Equality is over the full tuple, so two grants compare equal exactly when
/// they render to the same statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub privilege: Privilege,
    pub resource_type: ResourceType,
    pub grantee: String,
    pub keyspace: Option<String>,
    pub identifier: Option<String>,
}

impl Grant {
    pub fn keyspace(&self) -> &str {
        self.keyspace.as_deref().unwrap_or("")
    }

    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or("")
    }

    /// Stable state identifier: hex SHA-256 over the identity tuple
    pub fn id(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [
            self.privilege.as_str(),
            self.resource_type.as_str(),
            self.grantee.as_str(),
            self.keyspace(),
            self.identifier(),
        ] {
            hasher.update(part.as_bytes());
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.privilege, self.resource_type)?;
        match (self.keyspace.as_deref(), self.identifier.as_deref()) {
            (Some(ks), Some(id)) => write!(f, " {}.{}", ks, id)?,
            (Some(ks), None) => write!(f, " {}", ks)?,
            (None, Some(id)) => write!(f, " {}", id)?,
            (None, None) => {}
        }
        write!(f, " to {}", self.grantee)
    }
}
