//! Per-item template rendering for node parameters.
//!
//! String parameters may reference the current item:
//! - {{ input }} - Full input value
//! - {{ input.field }} - Input field access (missing fields render empty)
//! - {{ env.VAR }} - Environment variable (safe vars only)

use std::sync::OnceLock;

use regex_lite::Regex;
use serde_json::Value;

use super::types::NodeContext;

fn input_field_regex() -> &'static Regex {
    static INPUT_FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
    INPUT_FIELD_REGEX.get_or_init(|| {
        Regex::new(r"\{\{\s*input\.([A-Za-z0-9_]+)\s*\}\}").expect("valid regex")
    })
}

fn input_regex() -> &'static Regex {
    static INPUT_REGEX: OnceLock<Regex> = OnceLock::new();
    INPUT_REGEX.get_or_init(|| Regex::new(r"\{\{\s*input\s*\}\}").expect("valid regex"))
}

/// Get the regex for matching environment variable templates: {{ env.VAR }}
fn env_template_regex() -> &'static Regex {
    static ENV_TEMPLATE_REGEX: OnceLock<Regex> = OnceLock::new();
    ENV_TEMPLATE_REGEX.get_or_init(|| Regex::new(r"\{\{\s*env\.(\w+)\s*\}\}").expect("valid regex"))
}

/// Check if an environment variable is safe to expose in templates.
///
/// Only AMF_* prefixed variables are allowed, plus anything listed in
/// AMF_ALLOWED_ENV_VARS (comma-separated list).
pub fn is_safe_env_var(var_name: &str) -> bool {
    if var_name == "AMF_API_KEY" {
        return false;
    }
    if var_name.starts_with("AMF_") {
        return true;
    }

    if let Ok(allowed) = std::env::var("AMF_ALLOWED_ENV_VARS") {
        let allowed_vars: Vec<&str> = allowed.split(',').map(|s| s.trim()).collect();
        if allowed_vars.contains(&var_name) {
            return true;
        }
    }

    false
}

/// Convert a JSON value to a string for template substitution.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Render templates in a single string.
pub fn render_template(template: &str, ctx: &NodeContext) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }

    let result = input_regex().replace_all(template, |_: &regex_lite::Captures| {
        value_to_string(&ctx.input)
    });

    let result = input_field_regex().replace_all(&result, |caps: &regex_lite::Captures| {
        ctx.input
            .get(&caps[1])
            .map(value_to_string)
            .unwrap_or_default()
    });

    env_template_regex()
        .replace_all(&result, |caps: &regex_lite::Captures| {
            let var_name = &caps[1];
            if is_safe_env_var(var_name) {
                std::env::var(var_name).unwrap_or_default()
            } else {
                tracing::warn!(
                    "Blocked access to environment variable '{}' in template (not in allowlist)",
                    var_name
                );
                String::new()
            }
        })
        .to_string()
}

/// Render templates in every string inside a JSON value.
pub fn render_value(value: &Value, ctx: &NodeContext) -> Value {
    match value {
        Value::String(s) => Value::String(render_template(s, ctx)),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), render_value(v, ctx)))
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| render_value(v, ctx)).collect()),
        _ => value.clone(),
    }
}
