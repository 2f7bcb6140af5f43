// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! cqlauth CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // RUST_LOG can still raise this
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "cqlauth".bold().green(), cqlauth::VERSION);
            println!("Role and grant reconciliation for Cassandra and ScyllaDB");
            Ok(())
        }

        Commands::Render {
            grant,
            system_keyspace,
            format,
        } => cli::handle_render(grant.into_request(), system_keyspace, format),

        Commands::Matrix { format } => cli::handle_matrix(format),

        Commands::VerifyPassword { algorithm, hash } => {
            cli::handle_verify_password(algorithm, hash)
        }

        Commands::RoleStatement {
            name,
            action,
            login,
            super_user,
        } => cli::handle_role_statement(name, action, login, super_user),
    }
}
