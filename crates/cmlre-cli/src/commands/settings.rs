//! Settings commands.

use anyhow::{Context, Result};
use cmlre::Platform;
use serde_json::{Map, Value};

use crate::OutputFormat;
use crate::style::colors::SemanticStyle;
use crate::style::{print_header, print_labeled, print_success};

pub fn show(platform: &Platform, format: OutputFormat) -> Result<()> {
    let settings = platform.settings().load()?;

    match format {
        OutputFormat::Json => println!("{settings}"),
        OutputFormat::Text => {
            print_header("Settings");
            let value = serde_json::to_value(&settings)?;
            if let Value::Object(fields) = value {
                print_fields(&fields, "");
            }
        }
    }
    Ok(())
}

fn print_fields(fields: &Map<String, Value>, prefix: &str) {
    for (key, value) in fields {
        let name = format!("{prefix}{key}");
        match value {
            Value::Object(nested) => print_fields(nested, &format!("{name}.")),
            Value::String(s) => print_labeled(&name, s),
            other => print_labeled(&name, &other.to_string()),
        }
    }
}

/// Sets one top-level key. The value is parsed as JSON when possible so
/// `false` and `{"research":true}` keep their types.
pub fn set(platform: &Platform, key: &str, value: &str) -> Result<()> {
    let parsed = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    let mut patch = Map::new();
    patch.insert(key.to_string(), parsed);

    platform
        .settings()
        .update(&Value::Object(patch))
        .with_context(|| format!("Failed to set '{key}'"))?;
    print_success(&format!("Updated {}", key.code()));
    Ok(())
}

pub fn reset(platform: &Platform) -> Result<()> {
    platform.settings().reset()?;
    print_success("Settings restored to defaults");
    Ok(())
}
