//! Input documents handed over by the API layer.

use serde::{Deserialize, Serialize};

/// A news or summary snippet tied to a symbol. Every field may be missing.
///
/// Documents are transient: only the chunks derived from `title` and
/// `summary` are stored. `url` is accepted under the `link` alias used by
/// news feeds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

impl Document {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            summary: Some(summary.into()),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// `"{title}. {summary}"`, missing fields taken as empty.
    pub fn base_text(&self) -> String {
        format!(
            "{}. {}",
            self.title.as_deref().unwrap_or_default(),
            self.summary.as_deref().unwrap_or_default()
        )
    }
}
