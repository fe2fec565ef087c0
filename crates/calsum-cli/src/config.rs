//! Configuration loading and management.

use std::path::{Path, PathBuf};

use calsum_core::SerializedRule;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Category rules, in precedence order. Built-in rules apply when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<SerializedRule>>,

    /// Pattern an attending participant's name must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_filter: Option<String>,
}

impl Config {
    /// Loads configuration from default locations, then an optional file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // CALSUM_ATTENDEE_FILTER etc.
        figment = figment.merge(Env::prefixed("CALSUM_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for calsum.
///
/// On Linux: `~/.config/calsum`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calsum"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_calsum() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "calsum");
    }

    #[test]
    fn test_config_file_supplies_rules_and_filter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
attendee_filter = "me@example.com"

[[rules]]
name = "interview"
pattern = "INTERVIEW.*"

[[rules]]
name = "sync"
pattern = ".*[sS]ync.*"
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path())).unwrap();
        let rules = config.rules.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], SerializedRule::new("interview", "INTERVIEW.*"));
        assert_eq!(config.attendee_filter.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn test_missing_config_file_is_not_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(Config::load_from(Some(&temp.path().join("absent.toml"))).is_ok());
    }

    #[test]
    fn test_malformed_rules_are_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rules = \"not a list\"").unwrap();
        assert!(Config::load_from(Some(file.path())).is_err());
    }
}
