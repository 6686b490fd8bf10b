use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bucket holding every record with a known language, matched or not.
pub const ALL_KEY: &str = "_all";

pub type Bucket = BTreeMap<String, u64>;

/// `key -> secondary key -> count`, where key is a hashtag or [`ALL_KEY`]
/// and the secondary key is a language or country code.
///
/// Ordered maps keep the serialized form stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountTable(BTreeMap<String, Bucket>);

impl CountTable {
    /// Read a `.lang` or `.country` file written by a counting run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::ReadCounts {
            path: path.to_owned(),
            source,
        })
    }

    pub fn increment(&mut self, key: &str, secondary: &str) {
        let bucket = self.0.entry(key.to_owned()).or_default();
        *bucket.entry(secondary.to_owned()).or_default() += 1;
    }

    pub fn get(&self, key: &str, secondary: &str) -> u64 {
        self.bucket(key)
            .and_then(|bucket| bucket.get(secondary))
            .copied()
            .unwrap_or_default()
    }

    pub fn bucket(&self, key: &str) -> Option<&Bucket> {
        self.0.get(key)
    }

    /// Sum over all secondary keys, zero when `key` is absent.
    pub fn total(&self, key: &str) -> u64 {
        self.bucket(key)
            .map(|bucket| bucket.values().sum())
            .unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-language and per-country tables produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashtagCounts {
    pub by_language: CountTable,
    pub by_country: CountTable,
}
