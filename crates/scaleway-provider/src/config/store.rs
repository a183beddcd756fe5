//! Structured `scw` configuration store
//!
//! The store reads `~/.config/scw/config.yaml` (or `$SCW_CONFIG_PATH`) once,
//! applies the active profile and the `SCW_*` environment overlay, and exposes
//! existence-checked accessors: `None` means absent, `Some("")` means the value
//! was explicitly set to empty.
use crate::error::ConfigError;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_PATH_ENV: &str = "SCW_CONFIG_PATH";
pub const PROFILE_ENV: &str = "SCW_PROFILE";
pub const ACCESS_KEY_ENV: &str = "SCW_ACCESS_KEY";
pub const SECRET_KEY_ENV: &str = "SCW_SECRET_KEY";
pub const DEFAULT_ORGANIZATION_ID_ENV: &str = "SCW_DEFAULT_ORGANIZATION_ID";
pub const DEFAULT_REGION_ENV: &str = "SCW_DEFAULT_REGION";
pub const DEFAULT_ZONE_ENV: &str = "SCW_DEFAULT_ZONE";

static GLOBAL_STORE: OnceCell<ConfigStore> = OnceCell::new();

/// One set of values, either the top level of the file or a named profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_zone: Option<String>,
}

impl Profile {
    /// Values present in `other` replace the ones in `self`
    fn overlay(&mut self, other: Profile) {
        if other.access_key.is_some() {
            self.access_key = other.access_key;
        }
        if other.secret_key.is_some() {
            self.secret_key = other.secret_key;
        }
        if other.default_organization_id.is_some() {
            self.default_organization_id = other.default_organization_id;
        }
        if other.default_region.is_some() {
            self.default_region = other.default_region;
        }
        if other.default_zone.is_some() {
            self.default_zone = other.default_zone;
        }
    }

    fn from_env(env: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            access_key: env(ACCESS_KEY_ENV),
            secret_key: env(SECRET_KEY_ENV),
            default_organization_id: env(DEFAULT_ORGANIZATION_ID_ENV),
            default_region: env(DEFAULT_REGION_ENV),
            default_zone: env(DEFAULT_ZONE_ENV),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    defaults: Profile,
    #[serde(default)]
    active_profile: Option<String>,
    #[serde(default)]
    profiles: HashMap<String, Profile>,
}

/// Loaded `scw` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    values: Profile,
    path: Option<PathBuf>,
    profile: Option<String>,
}

impl ConfigStore {
    /// Load the store from the process environment and the config file
    ///
    /// ## Errors
    /// - `ConfigError::StoreLoad` - the file exists but cannot be read or parsed
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(|key| std::env::var(key).ok())
    }

    /// Load the store with a custom environment lookup
    pub fn load_with_env<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = env(CONFIG_PATH_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .or_else(default_config_path);

        let file = match &path {
            Some(path) => read_config_file(path)?,
            None => None,
        };
        let found = file.is_some();
        let file = file.unwrap_or_default();

        let profile = env(PROFILE_ENV)
            .filter(|name| !name.is_empty())
            .or(file.active_profile);

        let mut values = file.defaults;
        let mut profiles = file.profiles;
        if let Some(name) = &profile {
            match profiles.remove(name) {
                Some(selected) => values.overlay(selected),
                None if found => warn!(profile = %name, "profile not found in scw configuration"),
                None => {}
            }
        }
        values.overlay(Profile::from_env(&env));

        debug!(
            path = ?path,
            found,
            profile = ?profile,
            "scw configuration loaded"
        );

        Ok(Self {
            values,
            path,
            profile,
        })
    }

    /// Process-wide store, loaded by the first caller
    ///
    /// A failed load is not cached; later callers retry it.
    pub fn global() -> Result<&'static ConfigStore, ConfigError> {
        GLOBAL_STORE.get_or_try_init(Self::load)
    }

    /// Build a store from already known values
    pub fn from_profile(values: Profile) -> Self {
        Self {
            values,
            path: None,
            profile: None,
        }
    }

    pub fn access_key(&self) -> Option<&str> {
        self.values.access_key.as_deref()
    }

    pub fn secret_key(&self) -> Option<&str> {
        self.values.secret_key.as_deref()
    }

    pub fn default_organization_id(&self) -> Option<&str> {
        self.values.default_organization_id.as_deref()
    }

    pub fn default_region(&self) -> Option<&str> {
        self.values.default_region.as_deref()
    }

    pub fn default_zone(&self) -> Option<&str> {
        self.values.default_zone.as_deref()
    }

    /// Path the store was read from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Active profile name
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

/// `~/.config/scw/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("scw").join("config.yaml"))
}

fn read_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::StoreLoad {
                path: path.to_path_buf(),
                source: Box::new(err),
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(Some(ConfigFile::default()));
    }
    serde_yaml::from_str::<ConfigFile>(&content)
        .map(Some)
        .map_err(|err| ConfigError::StoreLoad {
            path: path.to_path_buf(),
            source: Box::new(err),
        })
}
