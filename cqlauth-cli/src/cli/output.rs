// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Formatting for CLI output

use crate::cli::commands::OutputFormat;
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use cqlauth::grant::{identifier_kind, is_compatible, requires_keyspace};
use cqlauth::{Grant, Privilege, ResourceType};
use serde::Serialize;

/// Everything `render` reports about one validated grant
#[derive(Debug, Serialize)]
pub struct RenderedGrant {
    pub id: String,
    pub grant: Grant,
    pub grant_statement: String,
    pub revoke_statement: String,
    pub existence_query: String,
}

#[derive(Debug, Serialize)]
struct MatrixRow {
    resource_type: ResourceType,
    requires_keyspace: bool,
    identifier: Option<&'static str>,
    privileges: Vec<Privilege>,
}

/// Formatter for the different output formats
pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_rendered(rendered: &RenderedGrant, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => {
                let mut output = format!("{}\n", rendered.grant.to_string().bold().green());
                output.push_str(&format!("Grant id: {}\n\n", rendered.id));

                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec![
                    Cell::new("Operation").fg(Color::Green),
                    Cell::new("CQL").fg(Color::Green),
                ]);
                table.add_row(vec!["create", rendered.grant_statement.as_str()]);
                table.add_row(vec!["delete", rendered.revoke_statement.as_str()]);
                table.add_row(vec!["exists", rendered.existence_query.as_str()]);

                output.push_str(&table.to_string());
                output.push('\n');
                output
            }
            OutputFormat::Json => Self::to_json(rendered),
        }
    }

    /// Privilege / resource type compatibility, one row per resource type
    pub fn format_matrix(format: OutputFormat) -> String {
        let rows: Vec<MatrixRow> = ResourceType::ALL
            .iter()
            .map(|&resource_type| MatrixRow {
                resource_type,
                requires_keyspace: requires_keyspace(resource_type),
                identifier: identifier_kind(resource_type).map(|kind| kind.field_name()),
                privileges: Privilege::ALL
                    .iter()
                    .copied()
                    .filter(|&privilege| is_compatible(privilege, resource_type))
                    .collect(),
            })
            .collect();

        match format {
            OutputFormat::Json => Self::to_json(&rows),
            OutputFormat::Table => {
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);

                let mut header = vec![Cell::new("resource type").fg(Color::Green)];
                header.extend(
                    Privilege::ALL
                        .iter()
                        .map(|p| Cell::new(p.as_str()).fg(Color::Green)),
                );
                header.push(Cell::new("keyspace").fg(Color::Green));
                header.push(Cell::new("identifier").fg(Color::Green));
                table.set_header(header);

                for row in &rows {
                    let mut cells = vec![Cell::new(row.resource_type.as_str())];
                    cells.extend(Privilege::ALL.iter().map(|p| {
                        if row.privileges.contains(p) {
                            Cell::new("✓").fg(Color::Green)
                        } else {
                            Cell::new("")
                        }
                    }));
                    cells.push(Cell::new(if row.requires_keyspace { "required" } else { "" }));
                    cells.push(Cell::new(row.identifier.unwrap_or("")));
                    table.add_row(cells);
                }

                format!("{}\n", table)
            }
        }
    }

    fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| {
            format!(
                "{{\"status\": \"error\", \"error\": \"Could not serialize output to JSON: {}\"}}",
                e
            )
        })
    }
}
