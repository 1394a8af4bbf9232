//! Import and export of the quote collection as a JSON file payload.
//!
//! Export is a pure function over the collection. Import performs an
//! explicit schema validation pass instead of trusting the decoded
//! structure: the top level must be an array, every entry must be an object
//! with a usable `text` field, and a missing `category` is coerced to the
//! empty string rather than dropped.

use serde_json::Value;

use crate::capabilities::ExportFile;
use crate::model::Quote;
use crate::{FormatError, EXPORT_FILE_NAME};

/// Pretty-printed JSON array of the full collection, text before category
/// per record.
#[must_use]
pub fn export_json(quotes: &[Quote]) -> String {
    // Vec<Quote> cannot fail to serialize; the fallback is unreachable in
    // practice but avoids a panic path.
    serde_json::to_string_pretty(quotes).unwrap_or_else(|_| "[]".to_string())
}

/// The downloadable artifact handed to the shell.
#[must_use]
pub fn export_file(quotes: &[Quote]) -> ExportFile {
    ExportFile {
        name: EXPORT_FILE_NAME.to_string(),
        contents: export_json(quotes).into_bytes(),
    }
}

/// Validates and decodes an import payload into quotes. Nothing is applied
/// to the collection here; the caller appends on success.
pub fn parse_import(payload: &[u8]) -> Result<Vec<Quote>, FormatError> {
    let value: Value =
        serde_json::from_slice(payload).map_err(|e| FormatError::Malformed(e.to_string()))?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(FormatError::NotAnArray {
                found: json_type_name(&other),
            })
        }
    };

    let mut quotes = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(mut fields) = entry else {
            return Err(FormatError::NotAnObject { index });
        };

        let text = match fields.remove("text") {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            _ => return Err(FormatError::MissingText { index }),
        };

        // Lenient on category only: missing or non-string becomes "".
        let category = match fields.remove("category") {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };

        quotes.push(Quote { text, category });
    }

    Ok(quotes)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
