//! Test utilities for cqlauth integration tests
//!
//! - MockCluster: in-memory stand-in for a cluster's auth catalog that
//!   understands the statements cqlauth renders

#![allow(dead_code)]

pub mod mock_cluster;

/// Route `log` output through the test harness; safe to call repeatedly
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Unique role name so parallel tests never share catalog rows
pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, fastrand::u64(..))
}

/// Password that satisfies the 40..=512 character rule
pub fn strong_password() -> String {
    let suffix: String = (0..40).map(|_| fastrand::alphanumeric()).collect();
    format!("pw-{}", suffix)
}
