// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for grant and role reconciliation

use crate::executor::ExecutorError;
use thiserror::Error;

/// Rejections raised while checking a grant request, before any statement
/// is sent to the cluster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown privilege '{privilege}': must be one of {valid}")]
    UnknownPrivilege { privilege: String, valid: String },

    #[error(
        "Resource type '{resource_type}' not applicable for privilege {privilege} - valid resource types are {valid}"
    )]
    IncompatibleResourceType {
        privilege: String,
        resource_type: String,
        valid: String,
    },

    #[error("keyspace_name must be set for resource type {resource_type}")]
    MissingKeyspaceQualifier { resource_type: String },

    #[error("{field} needs to be set when resource type = {resource_type}")]
    MissingIdentifier {
        field: String,
        resource_type: String,
    },

    #[error("'{value}' is not a valid {field}")]
    InvalidIdentifierFormat { field: String, value: String },

    #[error("'{pattern}' is not a valid mbean_pattern: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ValidationError {
    /// Name of the request field the error refers to
    pub fn field(&self) -> &str {
        match self {
            ValidationError::UnknownPrivilege { .. } => "privilege",
            ValidationError::IncompatibleResourceType { .. } => "resource_type",
            ValidationError::MissingKeyspaceQualifier { .. } => "keyspace_name",
            ValidationError::MissingIdentifier { field, .. } => field,
            ValidationError::InvalidIdentifierFormat { field, .. } => field,
            ValidationError::InvalidPattern { .. } => "mbean_pattern",
        }
    }
}

/// Top level error returned by every grant and role operation
#[derive(Error, Debug)]
pub enum AuthzError {
    #[error("Invalid grant: {0}")]
    Validation(#[from] ValidationError),

    #[error("Statement failed: {statement}: {source}")]
    Execution {
        statement: String,
        #[source]
        source: ExecutorError,
    },

    #[error("Verification failed: {0}")]
    VerificationFailed(String),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Grant not found: {0}")]
    GrantNotFound(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthzError {
    pub(crate) fn execution(statement: impl Into<String>, source: ExecutorError) -> Self {
        AuthzError::Execution {
            statement: statement.into(),
            source,
        }
    }

    /// True for rejections that happened before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(self, AuthzError::Validation(_) | AuthzError::InvalidRole(_))
    }
}

impl From<serde_json::Error> for AuthzError {
    fn from(err: serde_json::Error) -> Self {
        AuthzError::Config(err.to_string())
    }
}

pub type AuthzResult<T> = Result<T, AuthzError>;
