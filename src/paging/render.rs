//! Response Rendering
//!
//! Turns a page into the plain-text block returned to the caller: a titled
//! header, the page body, a navigation footer and the cache-status line.

use std::time::Duration;

use serde_json::Value;

use crate::dataset::{Field, Record};
use crate::export::ExportRecord;
use crate::paging::estimator::estimate_tokens;
use crate::paging::Page;

const RULE_WIDTH: usize = 70;
/// Widest a table column is allowed to grow
pub const MAX_COLUMN_WIDTH: usize = 15;

// == Render Style ==
/// How the items of a page are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Aligned columns, one record per line
    Table,
    /// Numbered entries with one line per field
    List,
    /// `key: value` lines
    Fields,
}

// == Cache Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached { age: Duration, remaining: Duration },
}

impl CacheStatus {
    pub fn describe(&self) -> String {
        match self {
            CacheStatus::Fresh => "CACHE: Fresh data (not cached)".to_string(),
            CacheStatus::Cached { age, remaining } => format!(
                "CACHE: Cached data (age: {}s, expires in {}s)",
                age.as_secs(),
                remaining.as_secs()
            ),
        }
    }
}

// == Render Context ==
/// Everything about a response that does not come from the page itself.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub title: String,
    /// Normalized query parameters shown under the title
    pub parameters: Vec<(String, String)>,
    pub token_budget: usize,
    pub cache_status: CacheStatus,
    /// Suggested file name in the export hint
    pub export_hint: String,
}

/// Renders a page of records.
pub fn render_records(page: &Page<'_, Record>, style: RenderStyle, ctx: &RenderContext) -> String {
    let body = match style {
        RenderStyle::Table => format_table(page.items),
        RenderStyle::List => format_list(page.items, page.first_item()),
        RenderStyle::Fields => page
            .items
            .iter()
            .map(|record| {
                let fields: Vec<Field> = record
                    .iter()
                    .map(|(key, value)| Field::new(key.clone(), value.clone()))
                    .collect();
                format_fields(&fields, 0)
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    };
    render_page(page, body, ctx)
}

/// Renders a page of mapping fields.
pub fn render_fields(page: &Page<'_, Field>, ctx: &RenderContext) -> String {
    render_page(page, format_fields(page.items, 0), ctx)
}

fn render_page<T>(page: &Page<'_, T>, body: String, ctx: &RenderContext) -> String {
    let mut lines = header(ctx);

    if page.total_items == 0 {
        lines.push("No data available".to_string());
    } else {
        lines.push(body);
    }
    lines.push(String::new());
    lines.push("─".repeat(RULE_WIDTH));
    lines.push(format!(
        "PAGE {} of {} | Showing items {}-{} of {} total",
        page.page_number,
        page.total_pages,
        page.first_item(),
        page.last_item(),
        page.total_items
    ));

    let tokens_so_far = estimate_tokens(&lines.join("\n"));
    lines.push(format!(
        "Estimated tokens: {} / {} max",
        group_thousands(tokens_so_far),
        group_thousands(ctx.token_budget)
    ));
    lines.push("─".repeat(RULE_WIDTH));
    lines.push(String::new());

    lines.push("NAVIGATION:".to_string());
    if let Some((start, end)) = page.next_range() {
        lines.push(format!(
            "  - Next page: use page={} to see items {}-{}",
            page.page_number + 1,
            start,
            end
        ));
    }
    if let Some((start, end)) = page.previous_range() {
        lines.push(format!(
            "  - Previous page: use page={} to see items {}-{}",
            page.page_number - 1,
            start,
            end
        ));
    }
    lines.push(format!(
        "  - Export all data: add export_path=\"{}\"",
        ctx.export_hint
    ));
    lines.push(String::new());

    lines.push(ctx.cache_status.describe());
    lines.push("═".repeat(RULE_WIDTH));
    lines.join("\n")
}

fn header(ctx: &RenderContext) -> Vec<String> {
    let mut lines = vec!["═".repeat(RULE_WIDTH), ctx.title.clone()];
    if !ctx.parameters.is_empty() {
        let params = ctx
            .parameters
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Query: {}", params));
    }
    lines.push("═".repeat(RULE_WIDTH));
    lines.push(String::new());
    lines
}

/// Confirmation block for a completed export.
pub fn render_export(record: &ExportRecord, title: &str) -> String {
    [
        "═".repeat(RULE_WIDTH),
        format!("DATA EXPORTED SUCCESSFULLY - {}", title),
        "═".repeat(RULE_WIDTH),
        String::new(),
        format!("File: {}", record.destination_path.display()),
        format!("Size: {:.2} KB", record.byte_size as f64 / 1024.0),
        format!("Items: {}", record.item_count),
        format!("Generated: {}", record.generated_at.to_rfc3339()),
        String::new(),
        "The complete dataset has been saved to the specified file.".to_string(),
        "═".repeat(RULE_WIDTH),
    ]
    .join("\n")
}

// == Body Formatters ==

/// Aligned table over the union of the rows' columns.
pub fn format_table(rows: &[Record]) -> String {
    if rows.is_empty() {
        return "No data available".to_string();
    }

    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for name in row.keys() {
            if !columns.contains(&name.as_str()) {
                columns.push(name.as_str());
            }
        }
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            let widest_cell = rows
                .iter()
                .map(|row| cell_text(row.get(*column)).chars().count())
                .max()
                .unwrap_or(0);
            widest_cell.max(column.chars().count()).min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(columns.iter().map(|c| c.to_string()), &widths));
    lines.push(format_row(widths.iter().map(|w| "-".repeat(*w)), &widths));
    for row in rows {
        lines.push(format_row(
            columns.iter().map(|column| cell_text(row.get(*column))),
            &widths,
        ));
    }
    lines.join("\n")
}

fn format_row(values: impl Iterator<Item = String>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", truncate(&value, *width), width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// Numbered entries: the headline field first, the rest indented below.
pub fn format_list(rows: &[Record], first_number: usize) -> String {
    rows.iter()
        .enumerate()
        .map(|(offset, row)| {
            let headline_key = if row.contains_key("title") {
                Some("title")
            } else {
                row.keys().next().map(String::as_str)
            };

            let mut lines = vec![format!(
                "[{}] {}",
                first_number + offset,
                headline_key
                    .map(|key| cell_text(row.get(key)))
                    .unwrap_or_default()
            )];
            for (key, value) in row {
                if Some(key.as_str()) == headline_key || is_blank(value) {
                    continue;
                }
                lines.push(format!("    {}: {}", capitalize(key), cell_text(Some(value))));
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `key: value` lines; nested objects indent, arrays are summarised.
pub fn format_fields(fields: &[Field], indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    let mut lines = Vec::with_capacity(fields.len());

    for field in fields {
        match &field.value {
            Value::Object(map) => {
                lines.push(format!("{}{}:", prefix, field.key));
                let nested: Vec<Field> = map
                    .iter()
                    .map(|(key, value)| Field::new(key.clone(), value.clone()))
                    .collect();
                if !nested.is_empty() {
                    lines.push(format_fields(&nested, indent + 1));
                }
            }
            Value::Array(items) => {
                lines.push(format!("{}{}: [{} items]", prefix, field.key, items.len()))
            }
            value => lines.push(format!("{}{}: {}", prefix, field.key, cell_text(Some(value)))),
        }
    }
    lines.join("\n")
}

// == Helpers ==

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
