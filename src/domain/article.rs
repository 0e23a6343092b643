use serde::{Deserialize, Serialize};

use crate::domain::{EncyclopediaEntry, EncyclopediaSection};

/// A pre-authored article from the local dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub extract: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub sections: Vec<EncyclopediaSection>,
}

impl Article {
    /// Lowercased, trimmed form used for title comparisons and fallback keys.
    pub fn normalize_key(text: &str) -> String {
        text.trim().to_lowercase()
    }

    /// The slug, or the normalized title when the dataset omits one.
    pub fn key(&self) -> String {
        if self.slug.trim().is_empty() {
            Self::normalize_key(&self.title)
        } else {
            self.slug.clone()
        }
    }

    /// Description if present and non-blank.
    pub fn display_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    /// Case-insensitive substring match against title, description and category.
    ///
    /// `needle` must already be normalized with [`Article::normalize_key`].
    pub fn matches(&self, needle: &str) -> bool {
        Self::normalize_key(&self.title).contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| Self::normalize_key(d).contains(needle))
            || Self::normalize_key(&self.category).contains(needle)
    }

    /// Map to the pipeline's output type.
    ///
    /// Local content is pre-normalized, so sections are copied verbatim. A lead
    /// section (id 0) is synthesized from the extract unless the dataset
    /// already starts with one.
    pub fn to_entry(&self, site_base_url: &str) -> EncyclopediaEntry {
        let mut sections = Vec::with_capacity(self.sections.len() + 1);
        if self.sections.first().map(|s| s.id) != Some(0) {
            sections.push(EncyclopediaSection::lead(&self.title, &self.extract));
        }
        sections.extend(self.sections.iter().cloned());

        EncyclopediaEntry {
            title: self.title.clone(),
            description: self.description.clone(),
            extract: self.extract.clone(),
            image_url: self.image_url.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            sections,
            url: Some(format!(
                "{}/article/{}",
                site_base_url.trim_end_matches('/'),
                self.key()
            )),
        }
    }
}
