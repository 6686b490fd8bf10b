/// Fixed set of hashtags matched by substring containment.
///
/// Both the hashtags and the text are lowercased with the locale-independent
/// Unicode mapping of [`str::to_lowercase`]. There is no Turkish tailoring:
/// `İ` lowers to `i̇`, so `#İSTANBUL` does not contain `#istanbul`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashtagSet {
    hashtags: Vec<String>,
}

impl HashtagSet {
    pub fn new<I, S>(hashtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for hashtag in hashtags {
            let hashtag = hashtag.as_ref().to_lowercase();
            if !hashtag.is_empty() && !normalized.contains(&hashtag) {
                normalized.push(hashtag);
            }
        }
        Self {
            hashtags: normalized,
        }
    }

    /// Hashtags contained in `lowercased_text`. The caller lowercases the
    /// text once per record.
    pub fn matches<'a>(&'a self, lowercased_text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.hashtags
            .iter()
            .map(String::as_str)
            .filter(move |hashtag| lowercased_text.contains(hashtag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hashtags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.hashtags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashtags.is_empty()
    }
}
