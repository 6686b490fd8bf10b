//! Run configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) gives
//! the stock hashtag list and archive naming convention.
//!
//! ```toml
//! hashtags = ["#covid19", "#flu"]
//! archive_prefix = "geoTwitter20"
//! archive_suffix = ".zip"
//! progress_interval = 1000000
//! unknown_country = "__unknown__"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_HASHTAGS: [&str; 17] = [
    "#코로나바이러스",
    "#コロナウイルス",
    "#冠状病毒",
    "#covid2019",
    "#covid-2019",
    "#covid19",
    "#covid-19",
    "#coronavirus",
    "#corona",
    "#virus",
    "#flu",
    "#sick",
    "#cough",
    "#sneeze",
    "#hospital",
    "#nurse",
    "#doctor",
];

pub const UNKNOWN_COUNTRY: &str = "__unknown__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Substrings counted in post text, matched case-insensitively.
    pub hashtags: Vec<String>,

    /// Directory entries must start with this to be scanned as archives.
    pub archive_prefix: String,

    /// Directory entries must end with this to be scanned as archives.
    pub archive_suffix: String,

    /// Lines between progress log messages.
    pub progress_interval: u64,

    /// Country bucket for posts without location metadata.
    pub unknown_country: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hashtags: DEFAULT_HASHTAGS.iter().map(|&s| s.to_owned()).collect(),
            archive_prefix: "geoTwitter20".to_owned(),
            archive_suffix: ".zip".to_owned(),
            progress_interval: 1_000_000,
            unknown_country: UNKNOWN_COUNTRY.to_owned(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ParseConfig {
            path: path.to_owned(),
            source,
        })
    }

    /// Does a directory entry name follow the archive naming convention?
    pub fn is_archive_name(&self, name: &str) -> bool {
        name.starts_with(&self.archive_prefix) && name.ends_with(&self.archive_suffix)
    }
}
