use serde::{Deserialize, Serialize};

/// Id reserved for the synthesized lead section.
pub const LEAD_SECTION_ID: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncyclopediaSection {
    pub id: u32,
    pub title: String,
    pub content: String,
}

impl EncyclopediaSection {
    pub fn lead(title: &str, content: &str) -> Self {
        Self {
            id: LEAD_SECTION_ID,
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}

/// Normalized article, whatever source produced it.
///
/// `extract` and every section's `content` are plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncyclopediaEntry {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub extract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub sections: Vec<EncyclopediaSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EncyclopediaEntry {
    pub fn lead(&self) -> Option<&EncyclopediaSection> {
        self.sections.first().filter(|s| s.id == LEAD_SECTION_ID)
    }

    /// Sections after the lead.
    pub fn body_sections(&self) -> &[EncyclopediaSection] {
        match self.lead() {
            Some(_) => &self.sections[1..],
            None => &self.sections,
        }
    }
}
