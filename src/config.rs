use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for userdir
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UserdirConfig {
    /// External utility locations and defaults
    pub scripts: ScriptsConfig,
    /// Event notification settings
    pub signals: SignalsConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Utility listing users (also used for single-user queries)
    pub list_users: String,
    /// Utility listing groups (also used for single-group queries)
    pub list_groups: String,
    /// Utility listing the groups a user belongs to
    pub user_groups: String,
    /// Random password generator
    pub password_gen: String,
    /// Validation rule runner
    pub validate: String,
    /// Timeout forwarded to the listing utilities when the caller gives none
    pub default_timeout_secs: u64,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            list_users: "/usr/libexec/userdir/list-users".to_string(),
            list_groups: "/usr/libexec/userdir/list-groups".to_string(),
            user_groups: "/usr/libexec/userdir/user-groups".to_string(),
            password_gen: "/usr/libexec/userdir/gen-password".to_string(),
            validate: "/usr/libexec/userdir/validate".to_string(),
            default_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalsConfig {
    /// Utility that hands a named event to the account service
    pub notifier: String,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            notifier: "/usr/libexec/userdir/notify".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable tracing output
    pub tracing_enabled: bool,
    /// Log level
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            tracing_enabled: true,
            log_level: "info".to_string(),
        }
    }
}

impl UserdirConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. userdir.toml in the working directory, if present
    /// 3. Environment variables (prefixed with USERDIR_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("userdir.toml").exists() {
            builder = builder.add_source(File::with_name("userdir"));
        }

        builder = builder.add_source(
            Environment::with_prefix("USERDIR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from an explicit file, with env overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("USERDIR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_complete() {
        let config = UserdirConfig::default();
        assert_eq!(config.scripts.default_timeout_secs, 5);
        assert!(config.scripts.list_users.ends_with("list-users"));
        assert!(config.signals.notifier.ends_with("notify"));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[scripts]\nlist_users = \"/opt/dir/list-users\"\ndefault_timeout_secs = 9"
        )
        .unwrap();

        let config = UserdirConfig::load_from(file.path()).unwrap();
        assert_eq!(config.scripts.list_users, "/opt/dir/list-users");
        assert_eq!(config.scripts.default_timeout_secs, 9);
        // Untouched sections keep their defaults
        assert!(config.scripts.list_groups.ends_with("list-groups"));
        assert!(config.signals.notifier.ends_with("notify"));
    }
}
