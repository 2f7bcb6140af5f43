// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command line definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use cqlauth::{GrantRequest, PasswordAlgorithm, DEFAULT_SYSTEM_KEYSPACE};

#[derive(Parser)]
#[command(name = "cqlauth")]
#[command(about = "Render and check Cassandra / ScyllaDB grants and roles", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<log::Level>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show version information
    Version,

    /// Validate a grant and print the statements it compiles to
    Render {
        #[command(flatten)]
        grant: GrantArgs,

        /// Keyspace holding role_permissions
        #[arg(long, default_value = DEFAULT_SYSTEM_KEYSPACE)]
        system_keyspace: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show which resource types each privilege can be granted on
    Matrix {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check a plaintext password (prompted) against a stored salted_hash
    VerifyPassword {
        /// Hashing scheme of the cluster: bcrypt or sha-512
        #[arg(long, default_value = "bcrypt", value_parser = parse_algorithm)]
        algorithm: PasswordAlgorithm,

        /// The salted_hash value from the roles table
        #[arg(long)]
        hash: String,
    },

    /// Print a role statement with the password masked
    RoleStatement {
        /// Role name
        name: String,

        #[arg(long, value_enum, default_value_t = RoleAction::Create)]
        action: RoleAction,

        /// Whether the role may log in
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        login: bool,

        /// Whether the role is a superuser
        #[arg(long, default_value_t = false)]
        super_user: bool,
    },
}

#[derive(Args)]
pub struct GrantArgs {
    /// Privilege to grant (all, create, alter, drop, select, modify, authorize, describe, execute)
    #[arg(long)]
    pub privilege: String,

    /// Resource type, e.g. "table" or "all-keyspaces"
    #[arg(long)]
    pub resource_type: String,

    /// Role receiving the privilege
    #[arg(long)]
    pub grantee: String,

    /// Keyspace qualifier for keyspace scoped resources
    #[arg(long, default_value = "")]
    pub keyspace: String,

    /// Function, table, role, mbean name or mbean pattern
    #[arg(long, default_value = "")]
    pub identifier: String,
}

impl GrantArgs {
    pub fn into_request(self) -> GrantRequest {
        GrantRequest::new(&self.privilege, &self.resource_type, &self.grantee)
            .keyspace(&self.keyspace)
            .identifier(&self.identifier)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoleAction {
    Create,
    Alter,
    Drop,
}

fn parse_algorithm(raw: &str) -> Result<PasswordAlgorithm, String> {
    raw.parse()
}
