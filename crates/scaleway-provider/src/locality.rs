//! Regions and zones of the current API generation
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

static REGION_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}-[a-z]{3}$").expect("region pattern is valid"));
static ZONE_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}-[a-z]{3}-[1-9]$").expect("zone pattern is valid"));

/// Region identifier such as `fr-par`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(Cow<'static, str>);

impl Region {
    pub const FR_PAR: Region = Region(Cow::Borrowed("fr-par"));
    pub const NL_AMS: Region = Region(Cow::Borrowed("nl-ams"));

    pub fn new(region: impl Into<Cow<'static, str>>) -> Self {
        Self(region.into())
    }

    /// Regions served by the API
    pub fn known() -> [Region; 2] {
        [Self::FR_PAR, Self::NL_AMS]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier has the `xx-yyy` shape
    pub fn is_valid(&self) -> bool {
        REGION_FORMAT.is_match(&self.0)
    }
}

/// Zone identifier such as `fr-par-1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(Cow<'static, str>);

impl Zone {
    pub const FR_PAR_1: Zone = Zone(Cow::Borrowed("fr-par-1"));
    pub const NL_AMS_1: Zone = Zone(Cow::Borrowed("nl-ams-1"));

    pub fn new(zone: impl Into<Cow<'static, str>>) -> Self {
        Self(zone.into())
    }

    /// Zones served by the API
    pub fn known() -> [Zone; 2] {
        [Self::FR_PAR_1, Self::NL_AMS_1]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier has the `xx-yyy-N` shape
    pub fn is_valid(&self) -> bool {
        ZONE_FORMAT.is_match(&self.0)
    }

    /// Region containing this zone, if the zone is well formed
    pub fn region(&self) -> Option<Region> {
        if !self.is_valid() {
            return None;
        }
        self.0
            .rsplit_once('-')
            .map(|(region, _)| Region::new(region.to_string()))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(region: &str) -> Self {
        Self(Cow::Owned(region.to_string()))
    }
}

impl From<String> for Region {
    fn from(region: String) -> Self {
        Self(Cow::Owned(region))
    }
}

impl From<&str> for Zone {
    fn from(zone: &str) -> Self {
        Self(Cow::Owned(zone.to_string()))
    }
}

impl From<String> for Zone {
    fn from(zone: String) -> Self {
        Self(Cow::Owned(zone))
    }
}
