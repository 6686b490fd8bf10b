use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    counts::{HashtagCounts, ALL_KEY},
    error::Result,
    hashtags::HashtagSet,
    scanner::{ArchiveScanner, ScanSummary},
    tweet::Tweet,
};

/// Accumulates both count tables one record at a time.
#[derive(Debug, Clone)]
pub struct HashtagCounter {
    hashtags: HashtagSet,
    unknown_country: String,
    counts: HashtagCounts,
}

impl HashtagCounter {
    pub fn new(hashtags: HashtagSet, unknown_country: impl Into<String>) -> Self {
        Self {
            hashtags,
            unknown_country: unknown_country.into(),
            counts: HashtagCounts::default(),
        }
    }

    /// Count one raw archive line. Lines that aren't records are dropped.
    pub fn process_line(&mut self, line: &[u8]) {
        if let Some(tweet) = Tweet::from_line(line) {
            self.process_tweet(&tweet);
        }
    }

    pub fn process_tweet(&mut self, tweet: &Tweet) {
        let Some(lang) = tweet.language() else {
            return;
        };
        let country = tweet.country_code().unwrap_or(&self.unknown_country);
        let text = tweet.text().to_lowercase();

        let HashtagCounts {
            by_language,
            by_country,
        } = &mut self.counts;
        by_language.increment(ALL_KEY, lang);
        by_country.increment(ALL_KEY, country);
        for hashtag in self.hashtags.matches(&text) {
            by_language.increment(hashtag, lang);
            by_country.increment(hashtag, country);
        }
    }

    pub fn counts(&self) -> &HashtagCounts {
        &self.counts
    }

    pub fn into_counts(self) -> HashtagCounts {
        self.counts
    }
}

/// Result of one counting run.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub counts: HashtagCounts,
    pub summary: ScanSummary,
    pub archives: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct HashtagCompiler {
    scanner: ArchiveScanner,
    counter: HashtagCounter,
}

impl HashtagCompiler {
    pub fn from_input(input: impl AsRef<Path>, config: &Config) -> Result<Self> {
        Ok(Self {
            scanner: ArchiveScanner::from_input(input, config)?,
            counter: HashtagCounter::new(
                HashtagSet::new(&config.hashtags),
                config.unknown_country.as_str(),
            ),
        })
    }

    pub fn compile(self) -> Compilation {
        let Self {
            scanner,
            mut counter,
        } = self;
        let summary = scanner.scan(|line, _| counter.process_line(line));
        Compilation {
            counts: counter.into_counts(),
            summary,
            archives: scanner.archives().to_vec(),
        }
    }
}
