use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::app::{EncyclopediaError, Result};
use crate::domain::Article;
use crate::store::ArticleStore;

const BUNDLED_DATASET: &str = include_str!("../../data/articles.json");

/// Immutable in-memory dataset, populated once at startup.
#[derive(Debug)]
pub struct MemoryStore {
    articles: Vec<Article>,
    by_slug: HashMap<String, usize>,
    by_title: HashMap<String, usize>,
    categories: Vec<String>,
}

impl MemoryStore {
    /// Load the dataset compiled into the binary.
    pub fn bundled(categories: &[String]) -> Result<Self> {
        Self::from_json(BUNDLED_DATASET, categories)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, categories: &[String]) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, categories)
    }

    pub fn from_json(json: &str, categories: &[String]) -> Result<Self> {
        let articles: Vec<Article> =
            serde_json::from_str(json).map_err(|e| EncyclopediaError::Dataset(e.to_string()))?;
        Self::from_articles(articles, categories)
    }

    /// Build the store, rejecting blank titles or extracts, duplicate slugs
    /// and categories outside `categories`. An empty `categories` list
    /// accepts any category.
    pub fn from_articles(articles: Vec<Article>, categories: &[String]) -> Result<Self> {
        let allowed: HashSet<String> = categories
            .iter()
            .map(|c| Article::normalize_key(c.as_str()))
            .collect();

        let mut by_slug = HashMap::new();
        let mut by_title = HashMap::new();

        for (index, article) in articles.iter().enumerate() {
            if article.title.trim().is_empty() {
                return Err(EncyclopediaError::Dataset(format!(
                    "Article #{} has no title",
                    index
                )));
            }
            if article.extract.trim().is_empty() {
                return Err(EncyclopediaError::Dataset(format!(
                    "Article \"{}\" has no extract",
                    article.title
                )));
            }
            if !allowed.is_empty() && !allowed.contains(&Article::normalize_key(&article.category)) {
                return Err(EncyclopediaError::Dataset(format!(
                    "Article \"{}\" has unknown category \"{}\"",
                    article.title, article.category
                )));
            }

            let slug = article.key();
            if by_slug.insert(slug.clone(), index).is_some() {
                return Err(EncyclopediaError::Dataset(format!(
                    "Duplicate slug \"{}\"",
                    slug
                )));
            }
            // First title wins; titles are not required to be unique.
            by_title
                .entry(Article::normalize_key(&article.title))
                .or_insert(index);
        }

        tracing::debug!("Loaded {} local articles", articles.len());

        Ok(Self {
            articles,
            by_slug,
            by_title,
            categories: categories.to_vec(),
        })
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }
}

impl ArticleStore for MemoryStore {
    fn find_by_slug(&self, slug: &str) -> Result<&Article> {
        self.by_slug
            .get(slug.trim())
            .map(|&i| &self.articles[i])
            .ok_or_else(|| EncyclopediaError::NotFound(slug.to_string()))
    }

    fn find_by_title(&self, title: &str) -> Result<&Article> {
        self.by_title
            .get(&Article::normalize_key(title))
            .map(|&i| &self.articles[i])
            .ok_or_else(|| EncyclopediaError::NotFound(title.to_string()))
    }

    fn search(&self, query: &str) -> Vec<&Article> {
        let needle = Article::normalize_key(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.articles.iter().filter(|a| a.matches(&needle)).collect()
    }

    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn in_category(&self, category: &str) -> Vec<&Article> {
        let wanted = Article::normalize_key(category);
        self.articles
            .iter()
            .filter(|a| Article::normalize_key(&a.category) == wanted)
            .collect()
    }

    fn len(&self) -> usize {
        self.articles.len()
    }
}
