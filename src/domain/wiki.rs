//! Response shapes of the Wikipedia REST endpoints, before normalization.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::WikiSearchItem;

/// `GET /page/summary/{title}`
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub extract_html: Option<String>,
    #[serde(default)]
    pub content_urls: Option<ContentUrls>,
    #[serde(default)]
    pub originalimage: Option<ImageRef>,
    #[serde(default)]
    pub thumbnail: Option<ImageRef>,
}

impl SummaryResponse {
    /// Desktop page URL, falling back to the mobile one.
    pub fn page_url(&self) -> Option<String> {
        let urls = self.content_urls.as_ref()?;
        urls.desktop
            .as_ref()
            .and_then(|u| u.page.clone())
            .or_else(|| urls.mobile.as_ref().and_then(|u| u.page.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRef {
    pub source: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentUrls {
    #[serde(default)]
    pub desktop: Option<PageUrls>,
    #[serde(default)]
    pub mobile: Option<PageUrls>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageUrls {
    #[serde(default)]
    pub page: Option<String>,
}

/// `GET /page/mobile-sections/{title}`
#[derive(Debug, Clone, Deserialize)]
pub struct MobileSectionsResponse {
    pub lead: MobileLead,
    #[serde(default)]
    pub remaining: Option<Remaining>,
}

impl MobileSectionsResponse {
    pub fn remaining_nodes(&self) -> &[SectionNode] {
        match &self.remaining {
            Some(Remaining::Nodes(nodes)) => nodes,
            Some(Remaining::Wrapped { sections }) => sections,
            None => &[],
        }
    }
}

/// The upstream has shipped `remaining` both as a bare node list and as
/// `{ "sections": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Remaining {
    Nodes(Vec<SectionNode>),
    Wrapped { sections: Vec<SectionNode> },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MobileLead {
    #[serde(default)]
    pub displaytitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<LeadImage>,
    #[serde(default)]
    pub sections: Vec<SectionNode>,
}

impl MobileLead {
    /// Lead text, either inline or carried by the first lead section.
    pub fn lead_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.sections
                    .first()
                    .and_then(|s| s.text.as_deref())
                    .filter(|t| !t.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadImage {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub urls: BTreeMap<String, String>,
}

impl LeadImage {
    /// URL of the widest rendition.
    pub fn best_url(&self) -> Option<&str> {
        self.urls
            .iter()
            .max_by_key(|(width, _)| width.parse::<u32>().unwrap_or(0))
            .map(|(_, url)| url.as_str())
    }
}

/// One node of the nested mobile-sections tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionNode {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub anchor: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "line")]
    pub heading: Option<String>,
    #[serde(default)]
    pub items: Vec<SectionNode>,
    #[serde(default)]
    pub sections: Vec<SectionNode>,
}

impl SectionNode {
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// `GET /search/page?q=&limit=`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub pages: Vec<WikiSearchItem>,
}
