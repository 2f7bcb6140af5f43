// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Credential verification
//!
//! The role table only ever exposes `salted_hash`. To tell whether a managed
//! password is still the one the cluster holds, the caller's plaintext is
//! re-derived into the stored representation and compared. The hash is
//! never reversed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;
use std::str::FromStr;

/// Hashing scheme the cluster was configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PasswordAlgorithm {
    #[serde(rename = "bcrypt")]
    Bcrypt,
    #[serde(rename = "sha-512")]
    Sha512,
}

impl PasswordAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordAlgorithm::Bcrypt => "bcrypt",
            PasswordAlgorithm::Sha512 => "sha-512",
        }
    }
}

impl fmt::Display for PasswordAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PasswordAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bcrypt" => Ok(PasswordAlgorithm::Bcrypt),
            "sha-512" => Ok(PasswordAlgorithm::Sha512),
            other => Err(format!(
                "'{}' is not a supported password algorithm, must be one of bcrypt, sha-512",
                other
            )),
        }
    }
}

/// Outcome of comparing a plaintext against a stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    Mismatch,
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// Lowercase hex SHA-512 digest of `plaintext`
pub fn sha512_hex(plaintext: &str) -> String {
    hex::encode(Sha512::digest(plaintext.as_bytes()))
}

/// Decide whether `plaintext` is the password behind `stored_hash`
///
/// Malformed hashes are a mismatch, not an error: a hash the verifier cannot
/// parse was certainly not produced from the caller's plaintext by the
/// configured scheme.
pub fn verify(algorithm: PasswordAlgorithm, stored_hash: &str, plaintext: &str) -> Verdict {
    let matched = match algorithm {
        PasswordAlgorithm::Sha512 => sha512_hex(plaintext) == stored_hash,
        PasswordAlgorithm::Bcrypt => match bcrypt::verify(plaintext, stored_hash) {
            Ok(matched) => matched,
            Err(e) => {
                log::debug!("Stored bcrypt hash could not be checked: {}", e);
                false
            }
        },
    };

    if matched {
        Verdict::Match
    } else {
        Verdict::Mismatch
    }
}
