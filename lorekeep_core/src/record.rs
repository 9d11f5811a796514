//! Record type and YAML block parsing.
//!
//! A record is an insertion-ordered mapping of attribute names to YAML values.
//! Every `id` attribute, at any nesting depth, is canonicalized while parsing:
//! numeric or boolean ids become their string form left-padded with `0` to
//! four characters, string ids are kept verbatim.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Canonical identifier attribute.
pub const ID_FIELD: &str = "id";
/// Display-name attribute.
pub const NAME_FIELD: &str = "name";

const ID_PAD_WIDTH: usize = 4;

/// One entity's attribute set, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_fields(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }

    /// The normalized identifier, if present and a non-empty string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.fields.get(NAME_FIELD).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), Value::String(value.into()));
    }

    /// Shallow-merge `incoming` over this record: incoming values overwrite,
    /// attributes absent from `incoming` are preserved.
    pub fn merge_from(&mut self, incoming: Self) {
        for (key, value) in incoming.fields {
            self.fields.insert(key, value);
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Why a tagged block produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The block was not valid YAML.
    InvalidYaml,
    /// The block parsed, but not to a mapping.
    NotAMapping,
    /// The mapping carried no usable `id`.
    MissingId,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidYaml => write!(f, "invalid YAML"),
            Self::NotAMapping => write!(f, "not a mapping"),
            Self::MissingId => write!(f, "missing id"),
        }
    }
}

/// Result of parsing one extracted block.
///
/// Skips are data, not errors: callers count or log them without changing
/// control flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Parsed(Record),
    Skipped(SkipReason),
}

/// Parse the inner text of one tagged block into a record.
#[must_use]
pub fn parse_block(raw: &str) -> ParseOutcome {
    let mut value: Value = match serde_yaml::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!("discarding block: {err}");
            return ParseOutcome::Skipped(SkipReason::InvalidYaml);
        }
    };
    normalize_id_fields(&mut value);

    let Value::Mapping(mapping) = value else {
        return ParseOutcome::Skipped(SkipReason::NotAMapping);
    };

    let mut fields = IndexMap::with_capacity(mapping.len());
    for (key, value) in mapping {
        let Some(key) = scalar_key(&key) else {
            continue;
        };
        fields.insert(key, value);
    }

    let record = Record::from_fields(fields);
    if record.id().is_none() {
        return ParseOutcome::Skipped(SkipReason::MissingId);
    }
    ParseOutcome::Parsed(record)
}

/// Canonicalize every `id` attribute in the parsed tree.
///
/// Numeric and boolean ids become strings left-padded with `0` to a minimum
/// width of four characters, at any depth. String ids and non-scalar ids are
/// left untouched.
fn normalize_id_fields(value: &mut Value) {
    match value {
        Value::Mapping(mapping) => {
            for (key, entry) in mapping.iter_mut() {
                if key.as_str() == Some(ID_FIELD)
                    && matches!(entry, Value::Number(_) | Value::Bool(_))
                {
                    *entry = Value::String(normalize_id(entry));
                } else {
                    normalize_id_fields(entry);
                }
            }
        }
        Value::Sequence(items) => {
            for item in items {
                normalize_id_fields(item);
            }
        }
        Value::Tagged(tagged) => normalize_id_fields(&mut tagged.value),
        _ => {}
    }
}

fn normalize_id(value: &Value) -> String {
    match value {
        Value::Number(n) => pad_id(&n.to_string()),
        Value::Bool(b) => pad_id(&b.to_string()),
        _ => String::new(),
    }
}

fn pad_id(raw: &str) -> String {
    format!("{raw:0>width$}", width = ID_PAD_WIDTH)
}

fn scalar_key(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
