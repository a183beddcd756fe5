pub mod legacy;
pub mod resolver;
pub mod store;
pub mod types;

use crate::error::ConfigError;
use crate::locality::{Region, Zone};
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use tracing::warn;
use types::SETTINGS_PATH;

pub use legacy::{LegacyConfigFile, legacy_config_path, read_legacy_config};
pub use resolver::{ConfigResolver, ExplicitConfig};
pub use store::{ConfigStore, Profile};
pub use types::{LogFormat, LoggingSettings, NetworkSettings, ProviderSettings, RetrySettings, SETTINGS};

/// Effective configuration used to build the SDK clients.
///
/// Every field is optional: an absent value leaves the SDK default in place.
/// `secret_key` is the only credential used to sign requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub default_organization_id: Option<String>,
    pub default_region: Option<Region>,
    pub default_zone: Option<Zone>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("default_organization_id", &self.default_organization_id)
            .field("default_region", &self.default_region)
            .field("default_zone", &self.default_zone)
            .finish()
    }
}

impl ProviderSettings {
    fn new() -> Self {
        Self::from_env_path(std::env::var_os(SETTINGS_PATH))
    }

    /// Settings from the file named by [`SETTINGS_PATH`], or the defaults
    ///
    /// A file that cannot be loaded is reported and replaced by the defaults.
    fn from_env_path(path: Option<OsString>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        Self::load_from_file(&path).unwrap_or_else(|err| {
            warn!(
                path = %Path::new(&path).display(),
                error = %err,
                "cannot load provider settings, using defaults"
            );
            Self::default()
        })
    }

    /// Load settings from a TOML file
    ///
    /// ## Errors
    /// - `ConfigError::Settings` - file cannot be read or parsed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<ProviderSettings>(&content)?)
    }
}

/// Read settings from the file named by [`SETTINGS_PATH`]
pub fn get_settings() -> Result<ProviderSettings, ConfigError> {
    std::env::var(SETTINGS_PATH)
        .map_err(ConfigError::from)
        .and_then(ProviderSettings::load_from_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    #[test]
    fn test_settings_default() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.retry.max_retries, 3);
        assert_eq!(settings.retry.min_wait_secs, 60);
        assert_eq!(settings.retry.max_wait_secs, 120);
        assert_eq!(settings.network.request_timeout_secs, 30);
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert!(settings.network.user_agent.starts_with("scaleway-provider/"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[retry]
max_retries = 5

[logging]
format = "json"
"#
        )
        .unwrap();

        let settings = ProviderSettings::load_from_file(file.path()).unwrap();
        assert_eq!(settings.retry.max_retries, 5);
        assert_eq!(settings.retry.min_wait_secs, 60);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.network, NetworkSettings::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml content [[[").unwrap();
        let err = ProviderSettings::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProviderSettings::load_from_file("/path/that/does/not/exist.toml");
        assert!(result.is_err());
    }

    fn capture_warnings<F: FnOnce()>(f: F) -> String {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || LogSink(writer.clone()))
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    struct LogSink(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_settings_env_path_unset_uses_defaults() {
        let mut settings = None;
        let output = capture_warnings(|| settings = Some(ProviderSettings::from_env_path(None)));
        assert_eq!(settings, Some(ProviderSettings::default()));
        assert!(output.is_empty());
    }

    #[test]
    fn test_settings_env_path_malformed_warns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml content [[[").unwrap();
        let path = file.path().as_os_str().to_owned();

        let mut settings = None;
        let output =
            capture_warnings(|| settings = Some(ProviderSettings::from_env_path(Some(path))));

        assert_eq!(settings, Some(ProviderSettings::default()));
        assert!(output.contains("WARN"));
        assert!(output.contains("cannot load provider settings, using defaults"));
        assert!(output.contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = Config {
            access_key: Some("SCWXXXXXXXXXXXXXXXXX".to_string()),
            secret_key: Some("11111111-1111-1111-1111-111111111111".to_string()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("11111111"));
        assert!(debug.contains("SCWXXXXXXXXXXXXXXXXX"));
    }
}
