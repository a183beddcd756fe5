//! Configuration resolution
//!
//! Merges explicit values, the environment, the `scw` store and the legacy
//! `~/.scwrc` into one effective [`Config`]. Resolution never fails: a value
//! missing from every source is simply absent.
use super::Config;
use super::legacy::{LegacyConfigFile, legacy_config_path, read_legacy_config};
use super::store::ConfigStore;
use crate::locality::{Region, Zone};
use once_cell::unsync::OnceCell;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const LEGACY_ACCESS_KEY_ENV: &str = "SCALEWAY_ACCESS_KEY";
pub const LEGACY_TOKEN_ENV: &str = "SCALEWAY_TOKEN";
pub const LEGACY_ORGANIZATION_ENV: &str = "SCALEWAY_ORGANIZATION";
pub const LEGACY_REGION_ENV: &str = "SCALEWAY_REGION";

/// Region used when no source provides one
pub const DEFAULT_REGION: Region = Region::FR_PAR;
/// Zone used together with [`DEFAULT_REGION`]
pub const DEFAULT_ZONE: Zone = Zone::FR_PAR_1;

/// Values supplied by the caller (provider schema or command line)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitConfig {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub organization_id: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,
    /// Deprecated alias of `secret_key`
    pub token: Option<String>,
    /// Deprecated alias of `organization_id`
    pub organization: Option<String>,
}

type EnvLookup<'a> = Box<dyn Fn(&str) -> Option<String> + 'a>;

/// Resolves the effective configuration
pub struct ConfigResolver<'a> {
    store: &'a ConfigStore,
    env: EnvLookup<'a>,
    legacy_path: Option<PathBuf>,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self {
            store,
            env: Box::new(|key| std::env::var(key).ok()),
            legacy_path: legacy_config_path(),
        }
    }

    /// Replace the process environment lookup
    pub fn with_env<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'a,
    {
        self.env = Box::new(env);
        self
    }

    /// Replace the `~/.scwrc` location; `None` disables the legacy file
    pub fn with_legacy_path(mut self, path: Option<PathBuf>) -> Self {
        self.legacy_path = path;
        self
    }

    /// Resolve every field, highest priority source first
    pub fn resolve(&self, explicit: &ExplicitConfig) -> Config {
        let legacy: OnceCell<Option<LegacyConfigFile>> = OnceCell::new();
        let legacy_file = || legacy.get_or_init(|| self.read_legacy()).as_ref();
        let store = self.store;

        let access_key = resolved("access_key", "explicit", non_empty(explicit.access_key.as_deref()))
            .or_else(|| resolved("access_key", "environment", self.env_var(LEGACY_ACCESS_KEY_ENV)))
            .or_else(|| resolved("access_key", "store", store.access_key().map(str::to_owned)))
            .filter(|value| !value.is_empty());

        let secret_key = resolved("secret_key", "explicit", non_empty(explicit.secret_key.as_deref()))
            .or_else(|| resolved("secret_key", "explicit token", non_empty(explicit.token.as_deref())))
            .or_else(|| resolved("secret_key", "store", non_empty(store.secret_key())))
            .or_else(|| resolved("secret_key", "environment", self.env_var(LEGACY_TOKEN_ENV)))
            .or_else(|| resolved("secret_key", "environment", self.env_var(LEGACY_ACCESS_KEY_ENV)))
            .or_else(|| {
                let token = legacy_file().and_then(|file| non_empty(Some(file.token.as_str())));
                resolved("secret_key", "legacy file", token)
            })
            .or_else(|| resolved("secret_key", "access key", access_key.clone()));

        let default_organization_id = resolved(
            "organization_id",
            "explicit",
            non_empty(explicit.organization_id.as_deref()),
        )
        .or_else(|| {
            let alias = non_empty(explicit.organization.as_deref());
            resolved("organization_id", "explicit organization", alias)
        })
        .or_else(|| resolved("organization_id", "store", non_empty(store.default_organization_id())))
        .or_else(|| resolved("organization_id", "environment", self.env_var(LEGACY_ORGANIZATION_ENV)))
        .or_else(|| {
            let organization =
                legacy_file().and_then(|file| non_empty(Some(file.organization.as_str())));
            resolved("organization_id", "legacy file", organization)
        });

        let mut region_defaulted = false;
        let default_region = resolved("region", "explicit", non_empty(explicit.region.as_deref()))
            .or_else(|| resolved("region", "environment", self.env_var(LEGACY_REGION_ENV)))
            .or_else(|| match store.default_region() {
                // Explicitly empty in the store: leave the SDK default in place.
                Some(region) => resolved("region", "store", non_empty(Some(region))),
                None => {
                    region_defaulted = true;
                    resolved("region", "default", Some(DEFAULT_REGION.to_string()))
                }
            })
            .map(Region::from);

        let default_zone = resolved("zone", "explicit", non_empty(explicit.zone.as_deref()))
            .or_else(|| match store.default_zone() {
                Some(zone) => resolved("zone", "store", non_empty(Some(zone))),
                None if region_defaulted => {
                    resolved("zone", "default", Some(DEFAULT_ZONE.to_string()))
                }
                None => None,
            })
            .map(Zone::from);

        Config {
            access_key,
            secret_key,
            default_organization_id,
            default_region,
            default_zone,
        }
    }

    fn env_var(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|value| !value.is_empty())
    }

    fn read_legacy(&self) -> Option<LegacyConfigFile> {
        let path = self.legacy_path.as_ref()?;
        match read_legacy_config(path) {
            Ok(file) => {
                debug!(path = %path.display(), "legacy configuration file loaded");
                Some(file)
            }
            Err(err) if path.exists() => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable legacy configuration file");
                None
            }
            Err(_) => None,
        }
    }
}

fn resolved(field: &'static str, tier: &'static str, value: Option<String>) -> Option<String> {
    if value.is_some() {
        debug!(field, tier, "configuration value resolved");
    }
    value
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_owned)
}
