// ── Screen-wide flags ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which editing phase the appliance is in. Post-deployment constrains
/// which network changes are accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    #[default]
    Pre,
    Post,
}

/// Which Linux distribution family the bootstrap image targets. Only
/// Ubuntu carries custom repository configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    Ubuntu,
    Centos,
}

impl Flavor {
    /// Loose parse used for persisted values: anything mentioning ubuntu
    /// selects Ubuntu, everything else falls back to CentOS.
    pub fn from_setting(raw: &str) -> Self {
        if raw.to_lowercase().contains("ubuntu") {
            Self::Ubuntu
        } else {
            Self::Centos
        }
    }

    pub fn is_ubuntu(self) -> bool {
        self == Self::Ubuntu
    }
}
