pub mod article;
pub mod entry;
pub mod search;
pub mod wiki;

pub use article::Article;
pub use entry::{EncyclopediaEntry, EncyclopediaSection, LEAD_SECTION_ID};
pub use search::{WikiSearchItem, WikiThumbnail};
