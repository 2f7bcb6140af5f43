// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// GrantReconciler - create, read and revoke grants against a live cluster
use super::model::{Grant, GrantRequest, Privilege};
use super::rules::validate;
use super::statement::{render_existence_query, render_grant, render_revoke};
use crate::config::AuthzConfig;
use crate::error::{AuthzError, AuthzResult};
use crate::executor::QueryExecutor;

/// Drives the grant lifecycle. Holds configuration only; no grant state is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct GrantReconciler {
    config: AuthzConfig,
}

impl GrantReconciler {
    /// Rejects a configuration whose system keyspace could not be spliced
    /// into catalog queries safely
    pub fn new(config: AuthzConfig) -> AuthzResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AuthzConfig {
        &self.config
    }

    /// Issue the GRANT, then confirm the permission catalog shows it
    pub fn create(
        &self,
        executor: &dyn QueryExecutor,
        request: &GrantRequest,
    ) -> AuthzResult<Grant> {
        let grant = validate(request)?;
        let statement = render_grant(&grant);

        log::debug!("Executing statement {}", statement);
        executor
            .execute(&statement)
            .map_err(|e| AuthzError::execution(&statement, e))?;

        if !self.lookup(executor, &grant)? {
            return Err(AuthzError::VerificationFailed(format!(
                "grant {} was accepted but is not present in {}.role_permissions",
                grant, self.config.system_keyspace
            )));
        }

        log::info!("Granted {} (id {})", grant, grant.id());
        Ok(grant)
    }

    /// True when the grantee holds the grant's privilege on its resource
    pub fn exists(&self, executor: &dyn QueryExecutor, request: &GrantRequest) -> AuthzResult<bool> {
        let grant = validate(request)?;
        self.lookup(executor, &grant)
    }

    /// Observed state of the grant, or `GrantNotFound`
    pub fn read(&self, executor: &dyn QueryExecutor, request: &GrantRequest) -> AuthzResult<Grant> {
        let grant = validate(request)?;
        if self.lookup(executor, &grant)? {
            Ok(grant)
        } else {
            Err(AuthzError::GrantNotFound(grant.to_string()))
        }
    }

    /// Issue the REVOKE. The cluster treats revoking a privilege the grantee
    /// does not hold as a no-op, so repeated deletes succeed.
    pub fn delete(&self, executor: &dyn QueryExecutor, request: &GrantRequest) -> AuthzResult<()> {
        let grant = validate(request)?;
        let statement = render_revoke(&grant);

        log::debug!("Executing statement {}", statement);
        executor
            .execute(&statement)
            .map_err(|e| AuthzError::execution(&statement, e))?;

        log::info!("Revoked {} (id {})", grant, grant.id());
        Ok(())
    }

    /// Grants are immutable; callers delete and re-create instead
    pub fn update(&self, request: &GrantRequest) -> AuthzResult<Grant> {
        Err(AuthzError::UnsupportedOperation(format!(
            "updating grants is not supported ({} on {} to {}); delete and re-create the grant",
            request.privilege, request.resource_type, request.grantee
        )))
    }

    fn lookup(&self, executor: &dyn QueryExecutor, grant: &Grant) -> AuthzResult<bool> {
        let query = render_existence_query(grant, &self.config.system_keyspace);

        log::debug!("Executing query {}", query);
        let rows = executor
            .query(&query)
            .map_err(|e| AuthzError::execution(&query, e))?;

        let mut held = Vec::new();
        for row in &rows {
            let permissions = row
                .get_set("permissions")
                .map_err(|e| AuthzError::execution(&query, e))?;
            held.extend(permissions.iter().map(|p| p.to_ascii_uppercase()));
        }

        // ALL expands to whatever subset applies to the resource
        let present = match grant.privilege {
            Privilege::All => !held.is_empty(),
            privilege => {
                let wanted = privilege.as_str().to_ascii_uppercase();
                held.iter().any(|p| *p == wanted)
            }
        };
        if !present && !held.is_empty() {
            log::debug!(
                "{} holds {} on {} but not {}",
                grant.grantee,
                held.join(", "),
                grant.resource_type,
                grant.privilege
            );
        }
        Ok(present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ExecutorError, Row, Value};
    use std::cell::RefCell;

    /// Replays canned query results and records statements
    #[derive(Default)]
    struct ScriptedExecutor {
        rows: Vec<Row>,
        fail_execute: bool,
        statements: RefCell<Vec<String>>,
    }

    impl QueryExecutor for ScriptedExecutor {
        fn execute(&self, statement: &str) -> Result<(), ExecutorError> {
            self.statements.borrow_mut().push(statement.to_string());
            if self.fail_execute {
                return Err(ExecutorError::QueryFailed("Unauthorized".to_string()));
            }
            Ok(())
        }

        fn query(&self, statement: &str) -> Result<Vec<Row>, ExecutorError> {
            self.statements.borrow_mut().push(statement.to_string());
            Ok(self.rows.clone())
        }
    }

    fn permission_row() -> Row {
        Row::new().with("permissions", Value::Set(vec!["SELECT".to_string()]))
    }

    fn table_request() -> GrantRequest {
        GrantRequest::new("select", "table", "alice")
            .keyspace("ks1")
            .identifier("t1")
    }

    #[test]
    fn test_create_issues_grant_then_verifies() {
        let executor = ScriptedExecutor {
            rows: vec![permission_row()],
            ..Default::default()
        };
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();

        let grant = reconciler.create(&executor, &table_request()).unwrap();
        assert_eq!(grant.grantee, "alice");

        let statements = executor.statements.borrow();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], r#"GRANT select ON table "ks1"."t1" TO "alice""#);
        assert!(statements[1].starts_with("SELECT permissions FROM system_auth.role_permissions"));
    }

    #[test]
    fn test_create_without_catalog_row_fails_verification() {
        let executor = ScriptedExecutor::default();
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();

        let err = reconciler.create(&executor, &table_request()).unwrap_err();
        assert!(matches!(err, AuthzError::VerificationFailed(_)));
    }

    #[test]
    fn test_execution_error_carries_statement() {
        let executor = ScriptedExecutor {
            fail_execute: true,
            ..Default::default()
        };
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();

        match reconciler.delete(&executor, &table_request()).unwrap_err() {
            AuthzError::Execution { statement, source } => {
                assert_eq!(statement, r#"REVOKE select ON table "ks1"."t1" FROM "alice""#);
                assert_eq!(source, ExecutorError::QueryFailed("Unauthorized".to_string()));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_request_issues_nothing() {
        let executor = ScriptedExecutor::default();
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();

        let err = reconciler
            .create(&executor, &GrantRequest::new("select", "role", "alice"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(executor.statements.borrow().is_empty());
    }

    #[test]
    fn test_update_is_rejected() {
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();
        let err = reconciler.update(&table_request()).unwrap_err();
        assert!(matches!(err, AuthzError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_read_reports_missing_grant() {
        let executor = ScriptedExecutor::default();
        let reconciler =
            GrantReconciler::new(AuthzConfig::default().with_system_keyspace("system")).unwrap();

        let err = reconciler.read(&executor, &table_request()).unwrap_err();
        assert!(matches!(err, AuthzError::GrantNotFound(_)));
        assert!(executor.statements.borrow()[0].contains("FROM system.role_permissions"));
    }

    #[test]
    fn test_other_privilege_on_same_resource_is_not_the_grant() {
        let executor = ScriptedExecutor {
            rows: vec![Row::new().with("permissions", Value::Set(vec!["MODIFY".to_string()]))],
            ..Default::default()
        };
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();

        assert!(!reconciler.exists(&executor, &table_request()).unwrap());
        assert!(matches!(
            reconciler.create(&executor, &table_request()),
            Err(AuthzError::VerificationFailed(_))
        ));

        let modify = GrantRequest::new("modify", "table", "alice")
            .keyspace("ks1")
            .identifier("t1");
        assert!(reconciler.exists(&executor, &modify).unwrap());
    }

    #[test]
    fn test_all_matches_any_held_privilege() {
        let executor = ScriptedExecutor {
            rows: vec![permission_row()],
            ..Default::default()
        };
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();
        let all = GrantRequest::new("all", "table", "alice")
            .keyspace("ks1")
            .identifier("t1");
        assert!(reconciler.exists(&executor, &all).unwrap());

        let empty = ScriptedExecutor {
            rows: vec![Row::new().with("permissions", Value::Set(Vec::new()))],
            ..Default::default()
        };
        assert!(!reconciler.exists(&empty, &all).unwrap());
    }

    #[test]
    fn test_malformed_permissions_column_is_an_execution_error() {
        let executor = ScriptedExecutor {
            rows: vec![Row::new().with("permissions", "SELECT")],
            ..Default::default()
        };
        let reconciler = GrantReconciler::new(AuthzConfig::default()).unwrap();
        assert!(matches!(
            reconciler.exists(&executor, &table_request()),
            Err(AuthzError::Execution { .. })
        ));
    }

    #[test]
    fn test_new_rejects_unsafe_system_keyspace() {
        let config = AuthzConfig::default().with_system_keyspace("system_auth.roles; --");
        assert!(matches!(
            GrantReconciler::new(config),
            Err(AuthzError::Config(_))
        ));
    }
}
