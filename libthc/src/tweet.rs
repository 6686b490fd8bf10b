use std::borrow::Cow;

use lazy_regex::{bytes_regex, regex::bytes::Captures};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tweet {
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub place: Option<Place>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Tweet {
    /// Parse one archive line. Anything that isn't a JSON object of the
    /// expected shape yields `None`.
    ///
    /// Unpaired surrogate escapes (`\ud83d` from text cut inside an emoji)
    /// are read as U+FFFD instead of failing the record. A `lang` or
    /// `country_code` that isn't a string still drops the whole record.
    pub fn from_line(line: &[u8]) -> Option<Self> {
        serde_json::from_slice(line).ok().or_else(|| match replace_lone_surrogates(line) {
            Cow::Owned(repaired) => serde_json::from_slice(&repaired).ok(),
            Cow::Borrowed(_) => None,
        })
    }

    /// Declared language, if present and non-empty.
    pub fn language(&self) -> Option<&str> {
        self.lang.as_deref().filter(|lang| !lang.is_empty())
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.place
            .as_ref()
            .and_then(|place| place.country_code.as_deref())
            .filter(|code| !code.is_empty())
    }
}

/// Rewrite `\uD800`-`\uDFFF` escapes that aren't part of a surrogate pair
/// as `\ufffd`. Escaped backslashes are consumed first so `\\ud83d` is left
/// alone.
fn replace_lone_surrogates(line: &[u8]) -> Cow<'_, [u8]> {
    bytes_regex!(
        r"\\(?:\\|u[dD][89abAB][0-9a-fA-F]{2}\\u[dD][c-fC-F][0-9a-fA-F]{2}|(?P<lone>u[dD][89a-fA-F][0-9a-fA-F]{2}))"
    )
    .replace_all(line, |caps: &Captures| {
        if caps.name("lone").is_some() {
            b"\\ufffd".to_vec()
        } else {
            caps[0].to_vec()
        }
    })
}
