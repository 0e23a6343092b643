pub mod memory;

use crate::app::Result;
use crate::domain::Article;

pub use memory::MemoryStore;

/// Read-only lookups over the local article dataset.
pub trait ArticleStore {
    /// Exact slug match.
    fn find_by_slug(&self, slug: &str) -> Result<&Article>;
    /// Case-insensitive, whitespace-trimmed title match.
    fn find_by_title(&self, title: &str) -> Result<&Article>;
    /// Substring match over title, description and category, in dataset order.
    fn search(&self, query: &str) -> Vec<&Article>;

    // Category browsing
    fn categories(&self) -> &[String];
    fn in_category(&self, category: &str) -> Vec<&Article>;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
