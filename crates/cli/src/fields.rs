//! `--set` field parsing for create and edit.
//!
//! `key=value` sets a string; `key:=value` sets raw JSON (numbers, booleans,
//! arrays). Keys use the API's camelCase names.

use anyhow::{anyhow, bail, Context};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Build a JSON object from `--set` arguments. Later keys override earlier
/// ones.
pub fn parse_fields(args: &[String]) -> anyhow::Result<Map<String, Value>> {
    let mut fields = Map::new();
    for arg in args {
        let (key, value) = parse_field(arg)?;
        fields.insert(key, value);
    }
    Ok(fields)
}

fn parse_field(arg: &str) -> anyhow::Result<(String, Value)> {
    let eq = arg
        .find('=')
        .ok_or_else(|| anyhow!("expected key=value or key:=json, got '{arg}'"))?;
    let (key, raw) = (&arg[..eq], &arg[eq + 1..]);

    let (key, value) = match key.strip_suffix(':') {
        Some(key) => {
            let value = serde_json::from_str(raw)
                .with_context(|| format!("value of '{key}' is not valid JSON: {raw}"))?;
            (key, value)
        }
        None => (key, Value::String(raw.to_string())),
    };

    let key = key.trim();
    if key.is_empty() {
        bail!("missing field name in '{arg}'");
    }
    Ok((key.to_string(), value))
}

/// Parse `--set` arguments straight into a form payload.
pub fn form_from_fields<T: DeserializeOwned>(args: &[String]) -> anyhow::Result<T> {
    let fields = parse_fields(args)?;
    serde_json::from_value(Value::Object(fields)).context("fields do not match the form")
}
