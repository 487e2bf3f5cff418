//! Resources synthesized from user-declared rules
//!
//! Precedence is per field: a value present on the rule wins over the run-as
//! default; the default only fills gaps.

use crate::config::{ResourceRule, UnixIdentity};
use crate::error::{Result, config_invalid};

use super::Resource;

/// Mode for produced files that do not declare one
pub const DEFAULT_MODE: u32 = 0o644;

/// Map one rule onto one resource
pub fn produce(rule: &ResourceRule, default_owner: &UnixIdentity) -> Result<Resource> {
    if rule.source.as_os_str().is_empty() {
        return Err(config_invalid(format!(
            "resource rule for '{}' has no source",
            rule.target
        )));
    }
    if rule.target.trim().is_empty() {
        return Err(config_invalid(format!(
            "resource rule for '{}' has no target",
            rule.source.display()
        )));
    }

    let identity = UnixIdentity {
        user: rule
            .user
            .clone()
            .unwrap_or_else(|| default_owner.user.clone()),
        group: rule
            .group
            .clone()
            .unwrap_or_else(|| default_owner.group.clone()),
    };
    let mode = rule.mode.map_or(DEFAULT_MODE, |m| m.bits());

    Ok(Resource::file(
        rule.source.clone(),
        rule.filter.unwrap_or(false),
        rule.target.clone(),
        &identity,
        mode,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::FileMode;
    use crate::resource::ResourceSource;
    use std::path::PathBuf;

    fn default_owner() -> UnixIdentity {
        UnixIdentity::new("hello", "hello")
    }

    #[test]
    fn test_defaults_fill_unset_fields() {
        let rule = ResourceRule::new("/src/a.conf", "/etc/a.conf");
        let resource = produce(&rule, &default_owner()).unwrap();
        assert_eq!(resource.source, ResourceSource::File(PathBuf::from("/src/a.conf")));
        assert_eq!(resource.destination, "/etc/a.conf");
        assert_eq!(resource.owner, "hello");
        assert_eq!(resource.group, "hello");
        assert_eq!(resource.mode.bits(), 0o644);
        assert!(!resource.template);
    }

    #[test]
    fn test_rule_values_win_over_defaults() {
        let rule = ResourceRule {
            filter: Some(true),
            user: Some("root".to_string()),
            group: Some("adm".to_string()),
            mode: Some(FileMode::new(0o640)),
            ..ResourceRule::new("/src/a.conf", "/etc/a.conf")
        };
        let resource = produce(&rule, &default_owner()).unwrap();
        assert_eq!(resource.owner, "root");
        assert_eq!(resource.group, "adm");
        assert_eq!(resource.mode.bits(), 0o640);
        assert!(resource.template);
    }

    #[test]
    fn test_precedence_is_per_field() {
        let rule = ResourceRule {
            user: Some("root".to_string()),
            ..ResourceRule::new("/src/a.conf", "/etc/a.conf")
        };
        let resource = produce(&rule, &UnixIdentity::new("hello", "daemon")).unwrap();
        assert_eq!(resource.owner, "root");
        assert_eq!(resource.group, "daemon");
    }

    #[test]
    fn test_empty_source_rejected() {
        let rule = ResourceRule::new("", "/etc/a.conf");
        assert!(produce(&rule, &default_owner()).is_err());
    }

    #[test]
    fn test_produce_does_not_touch_filesystem() {
        let rule = ResourceRule::new("/nonexistent/svcdeb/a.conf", "/etc/a.conf");
        assert!(produce(&rule, &default_owner()).is_ok());
    }
}
