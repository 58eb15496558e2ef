use std::borrow::Cow;

use comfy_table::{Table, presets::ASCII_BORDERS_ONLY_CONDENSED};
use serde_json::Value;

use crate::object::GenericObject;

/// Maximum width for the STATUS column
const MAX_STATUS_WIDTH: usize = 40;

/// Truncate a string to max_len chars, adding "..." if truncated
fn truncate_value(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        Cow::Owned(format!("{}...", truncated))
    }
}

fn field<'a>(item: &'a Value, pointer: &str) -> &'a str {
    item.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

/// Short status summary: pods have `status.phase`, most other kinds don't
/// surface anything tabular, so fall back to empty.
fn status_of(item: &Value) -> &str {
    field(item, "/status/phase")
}

pub struct TableFormatter;

impl TableFormatter {
    pub fn format(object: &GenericObject, no_headers: bool) -> String {
        let items = object.items();
        if items.is_empty() {
            return "(0 items)".to_string();
        }

        let mut table = Table::new();
        // ASCII_BORDERS_ONLY_CONDENSED is close to kubectl wide output
        table.load_preset(ASCII_BORDERS_ONLY_CONDENSED);

        if !no_headers {
            table.set_header(vec!["NAMESPACE", "NAME", "KIND", "STATUS"]);
        }

        for item in items {
            let kind = item.get("kind").and_then(Value::as_str).unwrap_or_else(|| {
                // List items often omit kind; borrow the list's kind minus "List".
                object
                    .kind()
                    .and_then(|k| k.strip_suffix("List"))
                    .unwrap_or("")
            });
            table.add_row(vec![
                field(item, "/metadata/namespace").to_string(),
                field(item, "/metadata/name").to_string(),
                kind.to_string(),
                truncate_value(status_of(item), MAX_STATUS_WIDTH).into_owned(),
            ]);
        }

        format!("{table}\n({} items)", object.items().len())
    }
}
