//! In-memory auth catalog implementing `QueryExecutor`
//!
//! Interprets exactly the statement shapes cqlauth renders: GRANT / REVOKE,
//! the `role_permissions` lookup, CREATE / ALTER / DROP ROLE and the `roles`
//! lookup. Anything else is rejected the way a cluster would reject a
//! syntax error. Behaviour mirrors Cassandra where it matters to the
//! reconcilers: GRANT ALL stores every privilege applicable to the resource,
//! REVOKE of a privilege that is not held is a no-op, DROP of a missing role
//! is an error, passwords are stored only as hashes.

use cqlauth::role::credential::sha512_hex;
use cqlauth::grant::is_compatible;
use cqlauth::{
    ExecutorError, PasswordAlgorithm, Privilege, QueryExecutor, ResourceType, Row, Value,
};
use parking_lot::Mutex;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

const QUOTED_IDENT: &str = r#""((?:[^"]|"")*)""#;
const QUOTED_LITERAL: &str = r#"'((?:[^']|'')*)'"#;

#[derive(Debug, Clone)]
struct StoredRole {
    can_login: bool,
    is_superuser: bool,
    salted_hash: Option<String>,
}

#[derive(Default)]
struct CatalogState {
    /// (resource path, role) -> granted permissions
    permissions: HashMap<(String, String), BTreeSet<String>>,
    roles: HashMap<String, StoredRole>,
    statements: Vec<String>,
    fail_next: Option<ExecutorError>,
    swallow_grants: bool,
}

struct Patterns {
    grant: Regex,
    segments: Regex,
    permissions_lookup: Regex,
    role_upsert: Regex,
    role_drop: Regex,
    role_lookup: Regex,
}

impl Patterns {
    fn new(system_keyspace: &str) -> Self {
        let ks = regex::escape(system_keyspace);
        Self {
            grant: Regex::new(&format!(
                r#"^(GRANT|REVOKE) (\w+) ON (.+) (TO|FROM) {}$"#,
                QUOTED_IDENT
            ))
            .unwrap(),
            segments: Regex::new(&format!(r#"^{}(?:\.{})?$"#, QUOTED_IDENT, QUOTED_IDENT)).unwrap(),
            permissions_lookup: Regex::new(&format!(
                r#"^SELECT permissions FROM {}\.role_permissions where resource={} and role={} ALLOW FILTERING;$"#,
                ks, QUOTED_LITERAL, QUOTED_LITERAL
            ))
            .unwrap(),
            role_upsert: Regex::new(&format!(
                r#"^(CREATE|ALTER) ROLE {} WITH PASSWORD = {} AND LOGIN = (true|false) AND SUPERUSER = (true|false)$"#,
                QUOTED_LITERAL, QUOTED_LITERAL
            ))
            .unwrap(),
            role_drop: Regex::new(&format!(r#"^DROP ROLE {}$"#, QUOTED_LITERAL)).unwrap(),
            role_lookup: Regex::new(&format!(
                r#"^SELECT role, can_login, is_superuser, salted_hash FROM {}\.roles WHERE role = {}$"#,
                ks, QUOTED_LITERAL
            ))
            .unwrap(),
        }
    }
}

fn unescape_ident(raw: &str) -> String {
    raw.replace("\"\"", "\"")
}

fn unescape_literal(raw: &str) -> String {
    raw.replace("''", "'")
}

/// Mock cluster with a single auth keyspace
pub struct MockCluster {
    algorithm: PasswordAlgorithm,
    patterns: Patterns,
    state: Mutex<CatalogState>,
}

impl MockCluster {
    pub fn new(system_keyspace: &str, algorithm: PasswordAlgorithm) -> Self {
        Self {
            algorithm,
            patterns: Patterns::new(system_keyspace),
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// Cluster on `system_auth` hashing with bcrypt
    pub fn bcrypt() -> Self {
        Self::new("system_auth", PasswordAlgorithm::Bcrypt)
    }

    /// Cluster on `system_auth` hashing with unsalted SHA-512
    pub fn sha512() -> Self {
        Self::new("system_auth", PasswordAlgorithm::Sha512)
    }

    /// Every statement received so far, in order
    pub fn statements(&self) -> Vec<String> {
        self.state.lock().statements.clone()
    }

    /// Make the next statement fail with `error`
    pub fn fail_next(&self, error: ExecutorError) {
        self.state.lock().fail_next = Some(error);
    }

    /// Accept GRANT statements without recording them
    pub fn swallow_grants(&self, swallow: bool) {
        self.state.lock().swallow_grants = swallow;
    }

    /// Change a role's password behind the reconciler's back
    pub fn rotate_password(&self, role: &str, plaintext: &str) {
        let hash = self.hash(plaintext);
        if let Some(stored) = self.state.lock().roles.get_mut(role) {
            stored.salted_hash = Some(hash);
        }
    }

    /// Stored hash for a role, as the catalog holds it
    pub fn salted_hash(&self, role: &str) -> Option<String> {
        self.state
            .lock()
            .roles
            .get(role)
            .and_then(|stored| stored.salted_hash.clone())
    }

    /// Permissions recorded for (resource, role)
    pub fn permissions(&self, resource: &str, role: &str) -> BTreeSet<String> {
        self.state
            .lock()
            .permissions
            .get(&(resource.to_string(), role.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn hash(&self, plaintext: &str) -> String {
        match self.algorithm {
            // lowest cost bcrypt accepts, keeps the tests fast
            PasswordAlgorithm::Bcrypt => bcrypt::hash(plaintext, 4).unwrap(),
            PasswordAlgorithm::Sha512 => sha512_hex(plaintext),
        }
    }

    fn begin(&self, statement: &str) -> Result<(), ExecutorError> {
        let mut state = self.state.lock();
        state.statements.push(statement.to_string());
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn resource_path(&self, resource: &str) -> Result<(ResourceType, String), ExecutorError> {
        let resource_type = ResourceType::ALL
            .iter()
            .copied()
            .filter(|r| resource.starts_with(r.as_str()))
            .max_by_key(|r| r.as_str().len())
            .ok_or_else(|| ExecutorError::QueryFailed(format!("Unknown resource {}", resource)))?;

        let rest = resource[resource_type.as_str().len()..].trim();
        if rest.is_empty() {
            return Ok((resource_type, "data/".to_string()));
        }

        let captures = self
            .patterns
            .segments
            .captures(rest)
            .ok_or_else(|| ExecutorError::QueryFailed(format!("line 1: syntax error near {}", rest)))?;
        let first = unescape_ident(&captures[1]);
        let second = captures.get(2).map(|m| unescape_ident(m.as_str()));

        let path = match second {
            Some(identifier) => format!("data/{}/{}", first, identifier),
            None => format!("data/{}", first),
        };
        Ok((resource_type, path))
    }

    fn apply_grant(&self, statement: &str) -> Result<bool, ExecutorError> {
        let Some(captures) = self.patterns.grant.captures(statement) else {
            return Ok(false);
        };
        let verb = &captures[1];
        let privilege: Privilege = captures[2]
            .parse()
            .map_err(|e| ExecutorError::QueryFailed(format!("line 1: {}", e)))?;
        let (resource_type, path) = self.resource_path(&captures[3])?;
        let grantee = unescape_ident(&captures[5]);

        let affected: Vec<String> = match privilege {
            Privilege::All => Privilege::ALL
                .iter()
                .copied()
                .filter(|&p| p != Privilege::All && is_compatible(p, resource_type))
                .map(|p| p.as_str().to_uppercase())
                .collect(),
            single => vec![single.as_str().to_uppercase()],
        };

        let mut state = self.state.lock();
        if verb == "GRANT" {
            if !state.swallow_grants {
                state
                    .permissions
                    .entry((path, grantee))
                    .or_default()
                    .extend(affected);
            }
        } else if let Some(held) = state.permissions.get_mut(&(path.clone(), grantee.clone())) {
            for privilege in &affected {
                held.remove(privilege);
            }
            if held.is_empty() {
                state.permissions.remove(&(path, grantee));
            }
        }
        Ok(true)
    }

    fn apply_role(&self, statement: &str) -> Result<bool, ExecutorError> {
        if let Some(captures) = self.patterns.role_upsert.captures(statement) {
            let name = unescape_literal(&captures[2]);
            let hash = self.hash(&unescape_literal(&captures[3]));
            let role = StoredRole {
                can_login: &captures[4] == "true",
                is_superuser: &captures[5] == "true",
                salted_hash: Some(hash),
            };

            let mut state = self.state.lock();
            let exists = state.roles.contains_key(&name);
            match (&captures[1], exists) {
                ("CREATE", true) => {
                    return Err(ExecutorError::QueryFailed(format!("{} already exists", name)))
                }
                ("ALTER", false) => {
                    return Err(ExecutorError::QueryFailed(format!("{} doesn't exist", name)))
                }
                _ => {}
            }
            state.roles.insert(name, role);
            return Ok(true);
        }

        if let Some(captures) = self.patterns.role_drop.captures(statement) {
            let name = unescape_literal(&captures[1]);
            let mut state = self.state.lock();
            if state.roles.remove(&name).is_none() {
                return Err(ExecutorError::QueryFailed(format!(
                    "Cannot drop non existent role '{}'",
                    name
                )));
            }
            state.permissions.retain(|(_, role), _| role != &name);
            return Ok(true);
        }

        Ok(false)
    }
}

impl QueryExecutor for MockCluster {
    fn execute(&self, statement: &str) -> Result<(), ExecutorError> {
        self.begin(statement)?;
        if self.apply_grant(statement)? || self.apply_role(statement)? {
            return Ok(());
        }
        Err(ExecutorError::QueryFailed(format!(
            "line 1: no viable alternative at input '{}'",
            statement
        )))
    }

    fn query(&self, statement: &str) -> Result<Vec<Row>, ExecutorError> {
        self.begin(statement)?;
        let state = self.state.lock();

        if let Some(captures) = self.patterns.permissions_lookup.captures(statement) {
            let key = (unescape_literal(&captures[1]), unescape_literal(&captures[2]));
            return Ok(state
                .permissions
                .get(&key)
                .filter(|held| !held.is_empty())
                .map(|held| {
                    vec![Row::new().with("permissions", Value::Set(held.iter().cloned().collect()))]
                })
                .unwrap_or_default());
        }

        if let Some(captures) = self.patterns.role_lookup.captures(statement) {
            let name = unescape_literal(&captures[1]);
            return Ok(state
                .roles
                .get(&name)
                .map(|stored| {
                    vec![Row::new()
                        .with("role", name.as_str())
                        .with("can_login", stored.can_login)
                        .with("is_superuser", stored.is_superuser)
                        .with(
                            "salted_hash",
                            stored
                                .salted_hash
                                .clone()
                                .map(Value::Text)
                                .unwrap_or(Value::Null),
                        )]
                })
                .unwrap_or_default());
        }

        Err(ExecutorError::QueryFailed(format!(
            "unconfigured table or bad query: {}",
            statement
        )))
    }
}
