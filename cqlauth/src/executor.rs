// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query executor seam
//!
//! The reconcilers never open sessions themselves. The caller hands them
//! something implementing [`QueryExecutor`] that is already connected to the
//! cluster, and every statement the reconcilers produce goes through it as
//! opaque CQL text. Rows come back as column-name keyed [`Value`] maps.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Failures reported by a [`QueryExecutor`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Cluster unavailable: {0}")]
    Unavailable(String),

    #[error("Column '{column}': {reason}")]
    Column { column: String, reason: String },
}

/// A single CQL cell value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Boolean(bool),
    Set(Vec<String>),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[String]> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
            Value::Set(_) => "set<text>",
            Value::Null => "null",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Set(items) => write!(f, "{{{}}}", items.join(", ")),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// One result row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub values: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a row from a HashMap of values
    pub fn from_values(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Builder style column insert
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.insert(column.to_string(), value.into());
        self
    }

    pub fn get_value(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Typed access to a text column
    pub fn get_str(&self, column: &str) -> Result<&str, ExecutorError> {
        let value = self.require(column)?;
        value.as_str().ok_or_else(|| ExecutorError::Column {
            column: column.to_string(),
            reason: format!("expected text, found {}", value.type_name()),
        })
    }

    /// Text column that may legitimately be null or absent
    pub fn get_opt_str(&self, column: &str) -> Result<Option<&str>, ExecutorError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get_str(column).map(Some),
        }
    }

    /// Typed access to a boolean column
    pub fn get_bool(&self, column: &str) -> Result<bool, ExecutorError> {
        let value = self.require(column)?;
        value.as_bool().ok_or_else(|| ExecutorError::Column {
            column: column.to_string(),
            reason: format!("expected boolean, found {}", value.type_name()),
        })
    }

    /// Typed access to a set<text> column; null or absent reads as empty
    pub fn get_set(&self, column: &str) -> Result<&[String], ExecutorError> {
        match self.values.get(column) {
            None | Some(Value::Null) => Ok(&[]),
            Some(value) => value.as_set().ok_or_else(|| ExecutorError::Column {
                column: column.to_string(),
                reason: format!("expected set<text>, found {}", value.type_name()),
            }),
        }
    }

    fn require(&self, column: &str) -> Result<&Value, ExecutorError> {
        self.values.get(column).ok_or_else(|| ExecutorError::Column {
            column: column.to_string(),
            reason: "missing from result row".to_string(),
        })
    }
}

/// A connected handle able to run CQL statements
///
/// Implementations own session handling, consistency, timeouts and retries.
/// Every failure returned here is treated as final by the reconcilers.
pub trait QueryExecutor {
    /// Run a statement that returns no rows (GRANT, REVOKE, CREATE ROLE, ...)
    fn execute(&self, statement: &str) -> Result<(), ExecutorError>;

    /// Run a statement and collect its rows
    fn query(&self, statement: &str) -> Result<Vec<Row>, ExecutorError>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, statement: &str) -> Result<(), ExecutorError> {
        (**self).execute(statement)
    }

    fn query(&self, statement: &str) -> Result<Vec<Row>, ExecutorError> {
        (**self).query(statement)
    }
}
