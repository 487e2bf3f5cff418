//! Run-as identity for installed files

use serde::{Deserialize, Serialize};

/// Unix section of svcdeb.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnixConfig {
    /// Service user; defaults to the package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Service group; defaults to the service user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Resolved owner and group applied to files that do not declare their own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnixIdentity {
    pub user: String,
    pub group: String,
}

impl UnixIdentity {
    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }

    /// The superuser identity used for system files
    pub fn root() -> Self {
        Self::new("root", "root")
    }
}

impl UnixConfig {
    /// Resolve against the package name
    pub fn resolve(&self, package_name: &str) -> UnixIdentity {
        let user = self
            .user
            .clone()
            .unwrap_or_else(|| package_name.to_string());
        let group = self.group.clone().unwrap_or_else(|| user.clone());
        UnixIdentity { user, group }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_package_name() {
        let identity = UnixConfig::default().resolve("hello");
        assert_eq!(identity, UnixIdentity::new("hello", "hello"));
    }

    #[test]
    fn test_group_defaults_to_user() {
        let unix = UnixConfig {
            user: Some("svc".to_string()),
            group: None,
        };
        assert_eq!(unix.resolve("hello"), UnixIdentity::new("svc", "svc"));
    }

    #[test]
    fn test_explicit_group() {
        let unix = UnixConfig {
            user: Some("svc".to_string()),
            group: Some("daemon".to_string()),
        };
        assert_eq!(unix.resolve("hello"), UnixIdentity::new("svc", "daemon"));
    }
}
