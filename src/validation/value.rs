//! Typed deserialization of a configuration document
//!
//! Follows the conventions services built on the runtime deserialize with: absent
//! keys take the field default (or null), scalars are coerced the way a lenient data
//! binder would (`"8080"` is an integer, `8080` is a string), and anything that cannot
//! be coerced is a deserialization error at the offending property path.

use std::collections::BTreeMap;

use serde_yaml::Value as Yaml;

use crate::error::{Result, deserialization};

use super::schema::{ConfigType, FieldType};

/// A deserialized configuration value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Map(BTreeMap<String, ConfigValue>),
    /// Fields in declaration order
    Struct(Vec<(String, ConfigValue)>),
}

impl ConfigValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Value of a struct field
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Struct(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            ConfigValue::Map(map) => map.get(name),
            _ => None,
        }
    }

    /// Scalar as JSON, for comparison against descriptor values
    pub fn as_json(&self) -> Option<serde_json::Value> {
        match self {
            ConfigValue::Null => Some(serde_json::Value::Null),
            ConfigValue::Bool(b) => Some((*b).into()),
            ConfigValue::Integer(i) => Some((*i).into()),
            ConfigValue::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
            ConfigValue::String(s) => Some(s.clone().into()),
            ConfigValue::List(_) | ConfigValue::Map(_) | ConfigValue::Struct(_) => None,
        }
    }
}

/// Join a property path
pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

/// Parse `document` and bind it to `config_type`
pub fn deserialize(document: &str, config_type: &ConfigType) -> Result<ConfigValue> {
    let yaml: Yaml = if document.trim().is_empty() {
        Yaml::Mapping(serde_yaml::Mapping::new())
    } else {
        serde_yaml::from_str(document).map_err(|e| deserialization("", e.to_string()))?
    };
    let yaml = match yaml {
        Yaml::Null => Yaml::Mapping(serde_yaml::Mapping::new()),
        other => other,
    };
    bind_struct(&yaml, config_type, "")
}

fn bind(yaml: &Yaml, ty: &FieldType, path: &str) -> Result<ConfigValue> {
    let yaml = untag(yaml);
    if matches!(yaml, Yaml::Null) {
        return Ok(ConfigValue::Null);
    }
    let mismatch = || deserialization(path, format!("expected {}, found {}", ty.describe(), kind(yaml)));

    match ty {
        FieldType::String => scalar_text(yaml).map(ConfigValue::String).ok_or_else(mismatch),
        FieldType::Integer => match yaml {
            Yaml::Number(n) => n.as_i64().map(ConfigValue::Integer).ok_or_else(mismatch),
            Yaml::String(s) => s.trim().parse().map(ConfigValue::Integer).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldType::Float => match yaml {
            Yaml::Number(n) => n.as_f64().map(ConfigValue::Float).ok_or_else(mismatch),
            Yaml::String(s) => s.trim().parse().map(ConfigValue::Float).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldType::Boolean => match yaml {
            Yaml::Bool(b) => Ok(ConfigValue::Bool(*b)),
            Yaml::String(s) => match s.trim() {
                "true" => Ok(ConfigValue::Bool(true)),
                "false" => Ok(ConfigValue::Bool(false)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        FieldType::List { item } => match yaml {
            Yaml::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| bind(v, item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>>>()
                .map(ConfigValue::List),
            _ => Err(mismatch()),
        },
        FieldType::Map { value } => match yaml {
            Yaml::Mapping(mapping) => {
                let mut map = BTreeMap::new();
                for (key, v) in mapping {
                    let key = scalar_text(untag(key))
                        .ok_or_else(|| deserialization(path, "mapping keys must be scalars"))?;
                    let bound = bind(v, value, &format!("{path}[{key}]"))?;
                    map.insert(key, bound);
                }
                Ok(ConfigValue::Map(map))
            }
            _ => Err(mismatch()),
        },
        FieldType::Struct(inner) => bind_struct(yaml, inner, path),
        FieldType::Any => Ok(any_value(yaml)),
    }
}

fn bind_struct(yaml: &Yaml, config_type: &ConfigType, path: &str) -> Result<ConfigValue> {
    let Yaml::Mapping(mapping) = untag(yaml) else {
        return Err(deserialization(
            path,
            format!("expected a mapping for {}, found {}", config_type.name, kind(yaml)),
        ));
    };

    if config_type.deny_unknown_fields {
        for key in mapping.keys() {
            let name = scalar_text(untag(key)).unwrap_or_default();
            if config_type.field(&name).is_none() {
                return Err(deserialization(
                    child_path(path, &name),
                    format!("unknown field for {}", config_type.name),
                ));
            }
        }
    }

    let mut fields = Vec::with_capacity(config_type.fields.len());
    for field in &config_type.fields {
        let field_path = child_path(path, &field.name);
        let value = match mapping.get(field.name.as_str()) {
            Some(yaml) => bind(yaml, &field.ty, &field_path)?,
            None => match &field.default {
                Some(default) => {
                    let yaml = serde_yaml::to_value(default)
                        .map_err(|e| deserialization(&field_path, e.to_string()))?;
                    bind(&yaml, &field.ty, &field_path)?
                }
                None => ConfigValue::Null,
            },
        };
        fields.push((field.name.clone(), value));
    }
    Ok(ConfigValue::Struct(fields))
}

fn any_value(yaml: &Yaml) -> ConfigValue {
    match untag(yaml) {
        Yaml::Null => ConfigValue::Null,
        Yaml::Bool(b) => ConfigValue::Bool(*b),
        Yaml::Number(n) => n
            .as_i64()
            .map(ConfigValue::Integer)
            .or_else(|| n.as_f64().map(ConfigValue::Float))
            .unwrap_or(ConfigValue::Null),
        Yaml::String(s) => ConfigValue::String(s.clone()),
        Yaml::Sequence(items) => ConfigValue::List(items.iter().map(any_value).collect()),
        Yaml::Mapping(mapping) => ConfigValue::Map(
            mapping
                .iter()
                .filter_map(|(k, v)| scalar_text(untag(k)).map(|k| (k, any_value(v))))
                .collect(),
        ),
        Yaml::Tagged(_) => ConfigValue::Null,
    }
}

fn untag(yaml: &Yaml) -> &Yaml {
    match yaml {
        Yaml::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn scalar_text(yaml: &Yaml) -> Option<String> {
    match yaml {
        Yaml::String(s) => Some(s.clone()),
        Yaml::Number(n) => Some(n.to_string()),
        Yaml::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn kind(yaml: &Yaml) -> &'static str {
    match untag(yaml) {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a list",
        Yaml::Mapping(_) => "a mapping",
        Yaml::Tagged(_) => "a tagged value",
    }
}
