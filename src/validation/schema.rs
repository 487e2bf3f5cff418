//! Configuration type descriptors exported by a service artifact

use serde::{Deserialize, Serialize};

/// A structured configuration type: named, with ordered fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigType {
    /// Type name as declared by the service
    pub name: String,

    /// Reject document keys that match no field
    #[serde(default)]
    pub deny_unknown_fields: bool,

    #[serde(default)]
    pub fields: Vec<Field>,
}

/// One field of a [`ConfigType`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Key as written in the document
    pub name: String,

    #[serde(rename = "type")]
    pub ty: FieldType,

    /// Value taken when the key is absent; absent without a default means null
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

/// Shape of a field's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    /// Sequence of `item`
    List { item: Box<FieldType> },
    /// String-keyed mapping onto `value`
    Map { value: Box<FieldType> },
    /// Nested configuration type
    Struct(ConfigType),
    /// Any YAML value, taken as is
    Any,
}

impl FieldType {
    /// Name used in deserialization messages
    pub fn describe(&self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Integer => "an integer",
            FieldType::Float => "a number",
            FieldType::Boolean => "a boolean",
            FieldType::List { .. } => "a list",
            FieldType::Map { .. } | FieldType::Struct(_) => "a mapping",
            FieldType::Any => "a value",
        }
    }
}

/// Declarative constraint attached to a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    NotNull,
    /// Non-null string with at least one non-whitespace character
    NotBlank,
    /// Non-null and, for strings, lists and maps, non-empty
    NotEmpty,
    Min { value: serde_json::Number },
    Max { value: serde_json::Number },
    /// Length bounds for strings (in characters), lists and maps
    Size {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
    },
    /// Whole-string regular expression match
    Pattern { regex: String },
    /// Value must equal one of the listed scalars
    OneOf { values: Vec<serde_json::Value> },
}

impl ConfigType {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}
