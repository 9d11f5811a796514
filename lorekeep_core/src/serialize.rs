//! Deterministic YAML rendering of the record stores.
//!
//! Every record becomes its own YAML document: a `---` separator, the
//! category header, then the attributes in insertion order. String scalars
//! are emitted with JSON-compatible double quoting, so multi-line values are
//! escaped in place and never folded across lines.

use serde_yaml::Value;

use crate::record::Record;
use crate::store::Category;

/// Which categories to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    All,
    /// A single category, addressed by key or by its singular form
    /// (`character` matches `characters`).
    Category(String),
}

impl ListScope {
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => key == name || key.strip_suffix('s') == Some(name),
        }
    }
}

/// Render every record of every category, in category then insertion order.
#[must_use]
pub fn render(categories: &[Category]) -> String {
    render_scope(categories, &ListScope::All)
}

/// Render the categories selected by `scope`.
#[must_use]
pub fn render_scope(categories: &[Category], scope: &ListScope) -> String {
    let mut out = String::new();
    for category in categories {
        if !scope.matches(category.key()) {
            continue;
        }
        for record in category.records() {
            out.push_str("\n---\n\n");
            out.push_str(category.header());
            out.push('\n');
            emit_record(&mut out, record);
        }
    }
    out
}

fn emit_record(out: &mut String, record: &Record) {
    for (key, value) in record.fields() {
        emit_entry(out, key, value, 0);
    }
}

fn emit_entry(out: &mut String, key: &str, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Sequence(items) => {
            out.push_str(&format!("{pad}{}:\n", emit_key(key)));
            for item in items {
                emit_sequence_item(out, item, indent + 1);
            }
        }
        Value::Mapping(mapping) => {
            out.push_str(&format!("{pad}{}:\n", emit_key(key)));
            for (nested_key, nested_value) in mapping {
                let nested_key = scalar_to_plain(nested_key);
                emit_entry(out, &nested_key, nested_value, indent + 1);
            }
        }
        _ => {
            out.push_str(&format!("{pad}{}: {}\n", emit_key(key), emit_scalar(value)));
        }
    }
}

fn emit_sequence_item(out: &mut String, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Mapping(mapping) => {
            let mut first = true;
            for (nested_key, nested_value) in mapping {
                let nested_key = scalar_to_plain(nested_key);
                if first {
                    let mut inline = String::new();
                    emit_entry(&mut inline, &nested_key, nested_value, 0);
                    out.push_str(&format!("{pad}- {inline}"));
                    first = false;
                } else {
                    emit_entry(out, &nested_key, nested_value, indent + 1);
                }
            }
            if first {
                out.push_str(&format!("{pad}- {{}}\n"));
            }
        }
        Value::Sequence(items) => {
            out.push_str(&format!("{pad}-\n"));
            for item in items {
                emit_sequence_item(out, item, indent + 1);
            }
        }
        _ => {
            out.push_str(&format!("{pad}- {}\n", emit_scalar(value)));
        }
    }
}

/// JSON-compatible scalar form: strings double-quoted with JSON escaping,
/// numbers, booleans, and null as their JSON spelling.
fn emit_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => json_quote(s),
        Value::Tagged(tagged) => emit_scalar(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => String::new(),
    }
}

fn emit_key(key: &str) -> String {
    if is_plain_key(key) {
        key.to_string()
    } else {
        json_quote(key)
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn json_quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

fn scalar_to_plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
