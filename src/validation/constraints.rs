//! Constraint checking over a deserialized configuration

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Result, infrastructure_missing};

use super::Violation;
use super::schema::{ConfigType, Constraint, Field, FieldType};
use super::value::{ConfigValue, child_path};

/// Checks a [`ConfigValue`] against the constraints of its [`ConfigType`]
#[derive(Debug)]
pub struct ConstraintChecker {
    patterns: HashMap<String, Regex>,
}

impl ConstraintChecker {
    /// Compile every pattern the type declares, failing on the first invalid one
    pub fn new(config_type: &ConfigType) -> Result<Self> {
        let mut patterns = HashMap::new();
        collect_patterns(config_type, &mut patterns)?;
        Ok(Self { patterns })
    }

    /// Every violation in `value`, in traversal order
    pub fn check(&self, value: &ConfigValue, config_type: &ConfigType) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check_struct(value, config_type, "", &mut violations);
        violations
    }

    fn check_struct(
        &self,
        value: &ConfigValue,
        config_type: &ConfigType,
        path: &str,
        out: &mut Vec<Violation>,
    ) {
        for field in &config_type.fields {
            let field_value = value.get(&field.name).unwrap_or(&ConfigValue::Null);
            let field_path = child_path(path, &field.name);
            self.check_field(field, field_value, &field_path, out);
            self.descend(&field.ty, field_value, &field_path, out);
        }
    }

    fn check_field(&self, field: &Field, value: &ConfigValue, path: &str, out: &mut Vec<Violation>) {
        for constraint in &field.constraints {
            if let Some(message) = self.violation(constraint, value) {
                out.push(Violation::new(path, message));
            }
        }
    }

    fn descend(&self, ty: &FieldType, value: &ConfigValue, path: &str, out: &mut Vec<Violation>) {
        match (ty, value) {
            (FieldType::Struct(inner), ConfigValue::Struct(_)) => {
                self.check_struct(value, inner, path, out);
            }
            (FieldType::List { item }, ConfigValue::List(items)) => {
                for (index, item_value) in items.iter().enumerate() {
                    self.descend(item, item_value, &format!("{path}[{index}]"), out);
                }
            }
            (FieldType::Map { value: value_ty }, ConfigValue::Map(map)) => {
                for (key, item_value) in map {
                    self.descend(value_ty, item_value, &format!("{path}[{key}]"), out);
                }
            }
            _ => {}
        }
    }

    /// Message for a failed constraint, `None` when satisfied
    fn violation(&self, constraint: &Constraint, value: &ConfigValue) -> Option<String> {
        match constraint {
            Constraint::NotNull => value.is_null().then(|| "must not be null".to_string()),
            Constraint::NotBlank => match value {
                ConfigValue::Null => Some("must not be blank".to_string()),
                ConfigValue::String(s) if s.trim().is_empty() => {
                    Some("must not be blank".to_string())
                }
                _ => None,
            },
            Constraint::NotEmpty => {
                let empty = match value {
                    ConfigValue::Null => true,
                    ConfigValue::String(s) => s.is_empty(),
                    ConfigValue::List(items) => items.is_empty(),
                    ConfigValue::Map(map) => map.is_empty(),
                    _ => false,
                };
                empty.then(|| "must not be empty".to_string())
            }
            Constraint::Min { value: bound } => {
                let below = numeric(value)? < bound.as_f64()?;
                below.then(|| format!("must be greater than or equal to {bound}"))
            }
            Constraint::Max { value: bound } => {
                let above = numeric(value)? > bound.as_f64()?;
                above.then(|| format!("must be less than or equal to {bound}"))
            }
            Constraint::Size { min, max } => {
                let len = length(value)?;
                match (*min, *max) {
                    (Some(min), Some(max)) if len < min || len > max => {
                        Some(format!("size must be between {min} and {max}"))
                    }
                    (Some(min), None) if len < min => Some(format!("size must be at least {min}")),
                    (None, Some(max)) if len > max => Some(format!("size must be at most {max}")),
                    _ => None,
                }
            }
            Constraint::Pattern { regex } => {
                let ConfigValue::String(text) = value else {
                    return None;
                };
                let compiled = self.patterns.get(regex)?;
                (!compiled.is_match(text)).then(|| format!("must match \"{regex}\""))
            }
            Constraint::OneOf { values } => {
                if value.is_null() {
                    return None;
                }
                let actual = value.as_json()?;
                let matched = values.iter().any(|allowed| same_scalar(allowed, &actual));
                (!matched).then(|| {
                    let listed: Vec<String> = values.iter().map(display_scalar).collect();
                    format!("must be one of [{}]", listed.join(", "))
                })
            }
        }
    }
}

fn collect_patterns(config_type: &ConfigType, patterns: &mut HashMap<String, Regex>) -> Result<()> {
    for field in &config_type.fields {
        for constraint in &field.constraints {
            if let Constraint::Pattern { regex } = constraint {
                if !patterns.contains_key(regex) {
                    let anchored = Regex::new(&format!("^(?:{regex})$")).map_err(|e| {
                        infrastructure_missing(format!(
                            "invalid pattern for {}.{}: {e}",
                            config_type.name, field.name
                        ))
                    })?;
                    patterns.insert(regex.clone(), anchored);
                }
            }
        }
        collect_type_patterns(&field.ty, patterns)?;
    }
    Ok(())
}

fn collect_type_patterns(ty: &FieldType, patterns: &mut HashMap<String, Regex>) -> Result<()> {
    match ty {
        FieldType::Struct(inner) => collect_patterns(inner, patterns),
        FieldType::List { item } => collect_type_patterns(item, patterns),
        FieldType::Map { value } => collect_type_patterns(value, patterns),
        _ => Ok(()),
    }
}

#[allow(clippy::cast_precision_loss)]
fn numeric(value: &ConfigValue) -> Option<f64> {
    match value {
        ConfigValue::Integer(i) => Some(*i as f64),
        ConfigValue::Float(f) => Some(*f),
        _ => None,
    }
}

fn length(value: &ConfigValue) -> Option<usize> {
    match value {
        ConfigValue::String(s) => Some(s.chars().count()),
        ConfigValue::List(items) => Some(items.len()),
        ConfigValue::Map(map) => Some(map.len()),
        _ => None,
    }
}

fn same_scalar(allowed: &serde_json::Value, actual: &serde_json::Value) -> bool {
    match (allowed, actual) {
        (serde_json::Value::Number(a), serde_json::Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => allowed == actual,
    }
}

fn display_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
