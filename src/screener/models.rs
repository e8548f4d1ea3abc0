// src/screener/models.rs
use std::fmt;

/// Site origin that relative profile-page links resolve against.
pub const SCREENER_ORIGIN: &str = "https://www.screener.in";

/// Browser-like identification; the site rejects unidentified clients.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Which flavour of a company's profile page to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilePage {
    /// `/company/{T}/` - carries the top-ratios list
    Standalone,
    /// `/company/{T}/consolidated/` - carries the concall entries
    Consolidated,
}

impl ProfilePage {
    /// Site-relative path of the page.
    pub fn path(&self, ticker: &str) -> String {
        let ticker = ticker.to_uppercase();
        match self {
            ProfilePage::Standalone => format!("/company/{}/", ticker),
            ProfilePage::Consolidated => format!("/company/{}/consolidated/", ticker),
        }
    }

    pub fn url(&self, ticker: &str) -> String {
        format!("{}{}", SCREENER_ORIGIN, self.path(ticker))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfilePage::Standalone => "profile",
            ProfilePage::Consolidated => "consolidated",
        }
    }
}

/// Named financial ratios in insertion order (name -> display value).
/// Re-inserting a name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatioSet {
    entries: Vec<(String, String)>,
}

impl RatioSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RatioSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = RatioSet::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Renders as a dictionary literal, e.g. `{"P/E": "23.5", "ROE": "18 %"}`.
impl fmt::Display for RatioSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: {:?}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Absolute URL of a downloadable concall transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLink(pub String);

impl TranscriptLink {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TranscriptLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
