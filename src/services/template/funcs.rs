//! Filters and functions registered on every template.

use serde_json::Value;
use std::collections::HashMap;
use tera::Tera;

/// Escapes the five XML-reserved characters.
///
/// `&` is replaced first so the entities introduced for the other four are
/// never escaped a second time.
pub fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub(crate) fn register(tera: &mut Tera) {
    tera.register_filter("xmlEscape", xml_escape_filter);
    tera.register_function("add", add_function);
}

/// `{{ value | xmlEscape }}`: scalars are converted to text first.
fn xml_escape_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(tera::Error::msg(format!(
                "xmlEscape: cannot escape {}",
                kind_of(other)
            )))
        }
    };
    Ok(Value::String(xml_escape(&text)))
}

/// `{{ add(a=..., b=...) }}`: checked integer addition.
fn add_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let a = integer_arg(args, "a")?;
    let b = integer_arg(args, "b")?;
    a.checked_add(b)
        .map(Value::from)
        .ok_or_else(|| tera::Error::msg(format!("add: {a} + {b} overflows")))
}

fn integer_arg(args: &HashMap<String, Value>, key: &str) -> tera::Result<i64> {
    let value = args
        .get(key)
        .ok_or_else(|| tera::Error::msg(format!("add: missing argument `{key}`")))?;
    value.as_i64().ok_or_else(|| {
        tera::Error::msg(format!(
            "add: expected integer for `{key}`, got {}",
            kind_of(value)
        ))
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
