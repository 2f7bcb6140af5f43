// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command handlers

use crate::cli::commands::{OutputFormat, RoleAction};
use crate::cli::output::{OutputFormatter, RenderedGrant};
use colored::*;
use cqlauth::grant::{render_existence_query, render_grant, render_revoke, validate};
use cqlauth::role::{render_drop_role, render_role_redacted, verify, RoleVerb};
use cqlauth::{AuthzConfig, GrantRequest, PasswordAlgorithm, RoleSpec};

type HandlerResult = Result<(), Box<dyn std::error::Error>>;

/// Validate a grant request and print the statements reconciling it would issue
pub fn handle_render(
    request: GrantRequest,
    system_keyspace: String,
    format: OutputFormat,
) -> HandlerResult {
    let config = AuthzConfig::default().with_system_keyspace(system_keyspace);
    config.validate()?;

    let grant = match validate(&request) {
        Ok(grant) => grant,
        Err(e) => {
            eprintln!("{} {}", "Invalid grant:".bold().red(), e);
            return Err(e.into());
        }
    };
    log::debug!("Validated grant {}", grant);

    let rendered = RenderedGrant {
        id: grant.id(),
        grant_statement: render_grant(&grant),
        revoke_statement: render_revoke(&grant),
        existence_query: render_existence_query(&grant, &config.system_keyspace),
        grant,
    };
    print!("{}", OutputFormatter::format_rendered(&rendered, format));
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

pub fn handle_matrix(format: OutputFormat) -> HandlerResult {
    print!("{}", OutputFormatter::format_matrix(format));
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

/// Prompt for a plaintext and compare it with a stored salted_hash
pub fn handle_verify_password(algorithm: PasswordAlgorithm, hash: String) -> HandlerResult {
    let plaintext = rpassword::prompt_password("Password: ")?;
    check_password(algorithm, &hash, &plaintext)
}

/// Mismatch is an error so the process exits non-zero
fn check_password(algorithm: PasswordAlgorithm, hash: &str, plaintext: &str) -> HandlerResult {
    if verify(algorithm, hash, plaintext).is_match() {
        println!("{}", format!("✅ Password matches the stored {} hash", algorithm).green());
        Ok(())
    } else {
        eprintln!(
            "{}",
            format!("❌ Password does not match the stored {} hash", algorithm).red()
        );
        Err(format!("password does not match the stored {} hash", algorithm).into())
    }
}

/// Print CREATE / ALTER / DROP ROLE text with the password masked
pub fn handle_role_statement(
    name: String,
    action: RoleAction,
    login: bool,
    super_user: bool,
) -> HandlerResult {
    let statement = match action {
        RoleAction::Drop => render_drop_role(&name),
        RoleAction::Create | RoleAction::Alter => {
            let verb = if action == RoleAction::Create {
                RoleVerb::Create
            } else {
                RoleVerb::Alter
            };
            let spec = RoleSpec::new(&name, "")
                .login(login)
                .super_user(super_user);
            render_role_redacted(verb, &spec)
        }
    };
    println!("{}", statement);
    Ok(())
}
