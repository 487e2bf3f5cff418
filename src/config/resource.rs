//! User-declared resource rules (`files:` in svcdeb.yaml)

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Mapping of one source file onto one installed destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceRule {
    /// Source file; relative paths resolve against the config directory
    pub source: PathBuf,

    /// Absolute install destination
    pub target: String,

    /// Render the source as a template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FileMode>,
}

impl ResourceRule {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            filter: None,
            user: None,
            group: None,
            mode: None,
        }
    }
}

/// Permission bits of an installed file
///
/// Written as a quoted octal string (`"0644"`, `"0o644"`). YAML integers are rejected:
/// the parser has already picked a radix for them, so `0o644` and `644` arrive as
/// different numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(u32);

impl FileMode {
    pub const MASK: u32 = 0o7777;

    pub fn new(bits: u32) -> Self {
        Self(bits & Self::MASK)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    /// Parse octal digits such as `644`, `0644` or `0o644`
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 5 {
            return None;
        }
        let bits = u32::from_str_radix(digits, 8).ok()?;
        (bits <= Self::MASK).then_some(Self(bits))
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawMode {
            Number(u64),
            Text(String),
        }

        let text = match RawMode::deserialize(deserializer)? {
            RawMode::Number(n) => {
                return Err(serde::de::Error::custom(format!(
                    "file mode {n} must be a quoted octal string such as \"0644\""
                )));
            }
            RawMode::Text(s) => s,
        };
        FileMode::parse(&text).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid file mode '{text}', expected octal digits such as 0644"
            ))
        })
    }
}
