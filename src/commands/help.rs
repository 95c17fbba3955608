//! Help tables, suggestions and the startup banner.
//!
//! Everything here is read-only over the registry and returns plain strings.
//! Rows are always emitted in registration order.

use super::aliases::AliasTable;
use super::definitions::{CommandDescriptor, Group};
use super::registry::CommandRegistry;
use super::router::ResolutionFailure;
use crate::config::{BannerConfig, ShellConfig};

/// Padding added to a column's longest entry.
pub const COLUMN_PADDING: usize = 5;

/// Padding used instead when the longest entry is this short or shorter.
pub const SHORT_COLUMN_THRESHOLD: usize = 4;

/// Padding for short columns.
pub const SHORT_COLUMN_PADDING: usize = 12;

/// Cells per row in suggestion grids.
pub const SUGGESTION_COLUMNS: usize = 4;

/// Padding added to the longest suggestion.
pub const SUGGESTION_PADDING: usize = 12;

/// Usage text for the alias built-in.
pub const ALIAS_USAGE: &str = "Usage:
  alias add <name> <command> [arguments...]
  alias remove <name>
  alias view";

/// Layout options for help tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpStyle {
    /// Spaces before every table line.
    pub indent: usize,
    /// Adds the Type column.
    pub verbose: bool,
}

impl Default for HelpStyle {
    fn default() -> Self {
        Self {
            indent: 2,
            verbose: false,
        }
    }
}

impl HelpStyle {
    pub fn from_config(config: &ShellConfig) -> Self {
        Self {
            indent: config.help_indent,
            verbose: config.verbose_help,
        }
    }
}

/// Renders the help table for every top-level command and group.
pub fn render_full_help<C>(registry: &CommandRegistry<C>, style: HelpStyle) -> String {
    if registry.is_empty() {
        return "No commands registered".to_string();
    }
    render_command_table(registry.iter(), style)
}

/// Renders the help table for top-level names starting with `prefix`.
pub fn render_filtered_help<C>(
    registry: &CommandRegistry<C>,
    prefix: &str,
    style: HelpStyle,
) -> String {
    let matching: Vec<&CommandDescriptor<C>> = registry
        .iter()
        .filter(|d| d.name().starts_with(prefix))
        .collect();

    if matching.is_empty() {
        return no_matches("command", prefix);
    }
    render_command_table(matching.into_iter(), style)
}

/// Renders the help table for the members of one group.
pub fn render_group_help<C>(name: &str, group: &Group<C>, style: HelpStyle) -> String {
    if group.is_empty() {
        return format!("Group '{name}' has no commands");
    }
    format!("{name} commands:\n{}", render_command_table(group.iter(), style))
}

/// Renders the alias table.
pub fn render_alias_table(aliases: &AliasTable, style: HelpStyle) -> String {
    if aliases.is_empty() {
        return "No aliases defined".to_string();
    }
    let rows: Vec<Vec<String>> = aliases
        .iter()
        .map(|(name, expansion)| vec![name.to_string(), expansion.to_string()])
        .collect();
    render_table(&["Alias", "Expansion"], &rows, style.indent)
}

/// Suggests top-level names starting with `prefix`.
pub fn suggest_commands<C>(registry: &CommandRegistry<C>, prefix: &str) -> String {
    let names: Vec<&str> = registry.names_with_prefix(prefix).collect();
    render_suggestions(&names, prefix, "command")
}

/// Suggests members of `group` starting with `prefix`.
pub fn suggest_group_commands<C>(group: &Group<C>, prefix: &str) -> String {
    let names: Vec<&str> = group.names().filter(|n| n.starts_with(prefix)).collect();
    render_suggestions(&names, prefix, "command")
}

/// Lists strict options starting with `prefix`.
pub fn suggest_options(options: &[String], prefix: &str) -> String {
    let names: Vec<&str> = options
        .iter()
        .map(String::as_str)
        .filter(|o| o.starts_with(prefix))
        .collect();
    render_suggestions(&names, prefix, "option")
}

/// Returns the suggestion block that follows a failure message, if the
/// failure has one.
pub fn suggestions_for<C>(failure: &ResolutionFailure, registry: &CommandRegistry<C>) -> Option<String> {
    match failure {
        ResolutionFailure::UnknownCommand { token } => Some(suggest_commands(registry, token)),
        ResolutionFailure::UnknownGroupMember { group, token } => registry
            .group(group)
            .map(|g| suggest_group_commands(g, token)),
        ResolutionFailure::InvalidOption { given, options, .. } => {
            Some(suggest_options(options, given))
        }
        _ => None,
    }
}

/// Renders the startup banner.
pub fn render_banner(banner: &BannerConfig) -> String {
    if let Some(custom) = &banner.custom {
        return custom.clone();
    }

    let rule = banner.decorator.repeat(banner.decorator_length);
    let mut lines = Vec::with_capacity(banner.lines.len() + 2);
    lines.push(rule.clone());
    lines.extend(banner.lines.iter().cloned());
    lines.push(rule);
    lines.join("\n")
}

fn render_command_table<'a, C: 'a>(
    descriptors: impl Iterator<Item = &'a CommandDescriptor<C>>,
    style: HelpStyle,
) -> String {
    let rows: Vec<Vec<String>> = descriptors
        .map(|d| {
            let mut row = vec![d.name().to_string(), d.help().to_string()];
            if style.verbose {
                row.push(d.kind().label().to_string());
            }
            row
        })
        .collect();

    if style.verbose {
        render_table(&["Command", "Description", "Type"], &rows, style.indent)
    } else {
        render_table(&["Command", "Description"], &rows, style.indent)
    }
}

/// Renders a table with a header row and a dash rule.
///
/// Every column but the last is padded to its longest entry plus
/// [`COLUMN_PADDING`] (or [`SHORT_COLUMN_PADDING`] for short columns).
pub fn render_table(headers: &[&str], rows: &[Vec<String>], indent: usize) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            column_width(longest, header)
        })
        .collect();

    let dashes: Vec<String> = headers.iter().map(|h| "-".repeat(h.chars().count())).collect();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut lines = vec![
        table_line(&header_cells, &widths, indent),
        table_line(&dashes, &widths, indent),
    ];
    lines.extend(rows.iter().map(|row| table_line(row, &widths, indent)));
    lines.join("\n")
}

fn column_width(longest: usize, header: &str) -> usize {
    let padding = if longest <= SHORT_COLUMN_THRESHOLD {
        SHORT_COLUMN_PADDING
    } else {
        COLUMN_PADDING
    };
    (longest + padding).max(header.chars().count() + 1)
}

fn table_line(cells: &[String], widths: &[usize], indent: usize) -> String {
    let last = cells.len().saturating_sub(1);
    let body: String = cells
        .iter()
        .enumerate()
        .map(|(col, cell)| {
            if col == last {
                cell.clone()
            } else {
                let width = widths.get(col).copied().unwrap_or(0);
                format!("{cell:<width$}")
            }
        })
        .collect();
    format!("{}{}", " ".repeat(indent), body).trim_end().to_string()
}

/// Renders matches in a fixed-width grid, or a "not found" line.
fn render_suggestions(names: &[&str], prefix: &str, noun: &str) -> String {
    if names.is_empty() {
        return no_matches(noun, prefix);
    }

    let width = names.iter().map(|n| n.chars().count()).max().unwrap_or(0) + SUGGESTION_PADDING;
    let mut cells = names.to_vec();
    while cells.len() % SUGGESTION_COLUMNS != 0 {
        cells.push("");
    }

    let grid = cells
        .chunks(SUGGESTION_COLUMNS)
        .map(|row| {
            row.iter()
                .map(|cell| format!("{cell:<width$}"))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Possible {noun}(s):\n{grid}")
}

fn no_matches(noun: &str, prefix: &str) -> String {
    format!("No {noun}(s) found matching '{prefix}'")
}
