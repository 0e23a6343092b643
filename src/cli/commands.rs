use crate::app::{AppContext, Result};
use crate::domain::{EncyclopediaEntry, WikiSearchItem};
use crate::edge;
use crate::resolver::MIN_QUERY_CHARS;
use crate::store::ArticleStore;

pub async fn search(ctx: &AppContext, query: &str, limit: Option<usize>) -> Result<()> {
    if !is_searchable(query) {
        eprintln!(
            "Query must be at least {} characters: {:?}",
            MIN_QUERY_CHARS, query
        );
        return Ok(());
    }

    let limit = limit.unwrap_or(ctx.config.content.search_limit);
    let results = ctx.resolver.search(query, limit).await?;

    if results.is_empty() {
        println!("No results for \"{}\"", query.trim());
        return Ok(());
    }

    for item in &results {
        println!("{}", format_search_item(item));
    }

    Ok(())
}

pub async fn show(ctx: &AppContext, title: &str) -> Result<()> {
    let entry = ctx.resolver.resolve(title).await?;
    print!("{}", format_entry(&entry));
    Ok(())
}

pub async fn open_article(ctx: &AppContext, title: &str) -> Result<()> {
    let entry = ctx.resolver.resolve(title).await?;

    match entry.url {
        Some(url) => {
            println!("Opening {}", url);
            open::that(&url)?;
        }
        None => println!("No page URL for \"{}\"", entry.title),
    }

    Ok(())
}

pub fn list_categories(ctx: &AppContext) -> Result<()> {
    for category in ctx.store.categories() {
        let count = ctx.store.in_category(category).len();
        println!("{} ({} articles)", category, count);
    }
    Ok(())
}

pub fn browse(ctx: &AppContext, category: &str) -> Result<()> {
    let articles = ctx.store.in_category(category);

    if articles.is_empty() {
        println!("No articles in {}", category);
        return Ok(());
    }

    for article in articles {
        match article.display_description() {
            Some(description) => println!("{}\n  {}", article.title, description),
            None => println!("{}", article.title),
        }
    }

    Ok(())
}

pub async fn serve(ctx: &AppContext) -> Result<()> {
    edge::serve(&ctx.config.edge, ctx.fetcher.clone()).await
}

fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

fn format_search_item(item: &WikiSearchItem) -> String {
    if item.excerpt.is_empty() {
        format!("{:>3}. {}", item.id + 1, item.title)
    } else {
        format!("{:>3}. {}\n     {}", item.id + 1, item.title, item.excerpt)
    }
}

fn format_entry(entry: &EncyclopediaEntry) -> String {
    let mut out = format!("{}\n", entry.title);
    if let Some(description) = &entry.description {
        out.push_str(&format!("{}\n", description));
    }
    if let Some(url) = &entry.url {
        out.push_str(&format!("{}\n", url));
    }

    if let Some(lead) = entry.lead() {
        out.push_str(&format!("\n{}\n", lead.content));
    }
    for section in entry.body_sections() {
        out.push_str(&format!("\n== {} ==\n{}\n", section.title, section.content));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EncyclopediaSection;

    #[test]
    fn test_short_queries_are_refused() {
        assert!(!is_searchable(""));
        assert!(!is_searchable("  q  "));
        assert!(is_searchable(" qu "));
    }

    #[test]
    fn test_format_search_item_numbers_from_one() {
        let item = WikiSearchItem {
            id: 0,
            key: "quantum-mechanics".into(),
            title: "Quantum Mechanics".into(),
            excerpt: "The physics of the very small".into(),
            description: None,
            thumbnail: None,
        };
        assert_eq!(
            format_search_item(&item),
            "  1. Quantum Mechanics\n     The physics of the very small"
        );
    }

    #[test]
    fn test_format_entry_lists_sections_after_lead() {
        let entry = EncyclopediaEntry {
            title: "Black hole".into(),
            description: Some("Region of spacetime".into()),
            extract: "A black hole is...".into(),
            image_url: None,
            thumbnail_url: None,
            sections: vec![
                EncyclopediaSection::lead("Black hole", "A black hole is..."),
                EncyclopediaSection {
                    id: 1,
                    title: "History".into(),
                    content: "Early ideas.".into(),
                },
            ],
            url: None,
        };

        let out = format_entry(&entry);
        assert!(out.starts_with("Black hole\nRegion of spacetime\n"));
        assert!(out.contains("\nA black hole is...\n"));
        assert!(out.ends_with("\n== History ==\nEarly ideas.\n"));
        assert!(!out.contains("== Black hole =="));
    }
}
