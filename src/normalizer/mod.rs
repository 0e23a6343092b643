//! Plain-text normalization of upstream markup.

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::wiki::SectionNode;
use crate::domain::EncyclopediaSection;

/// Character budget for search excerpts built from an extract.
pub const EXCERPT_CHARS: usize = 150;

static BREAK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*br\s*/?\s*>").expect("valid break-tag pattern"));
static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid tag pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Convert markup to plain text.
///
/// `<br>` variants become newlines, every other tag is dropped, entities are
/// decoded and the result is trimmed. Only `<` followed by a letter or `/`
/// opens a tag, so comparisons like `0 < x` are kept as text. Decoding can expose new markup
/// (`&lt;b&gt;`), so the pass repeats until the text stops changing; each
/// changing pass strictly shortens the text, which bounds the loop and makes
/// the function idempotent.
pub fn strip_markup(raw: &str) -> String {
    let mut current = strip_pass(raw);
    loop {
        let next = strip_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_pass(text: &str) -> String {
    let text = BREAK_TAG.replace_all(text, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    decode_html_entities(&text).trim().to_string()
}

/// Single-line plain text for search excerpts.
pub fn clean_excerpt(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    collapse_whitespace(&strip_markup(&collapsed))
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

/// Cut `text` to `limit` characters, appending `...` when anything was cut.
pub fn truncate_excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// Flatten a mobile-sections tree depth-first in document order.
///
/// Nodes without text are skipped but their children are still visited.
/// Output ids are numbered from 1; id 0 belongs to the lead section.
pub fn flatten_sections(nodes: &[SectionNode]) -> Vec<EncyclopediaSection> {
    let mut out = Vec::new();
    for node in nodes {
        visit(node, &mut out);
    }
    out
}

fn visit(node: &SectionNode, out: &mut Vec<EncyclopediaSection>) {
    if let Some(text) = node.text.as_deref().filter(|_| node.has_text()) {
        let id = out.len() as u32 + 1;
        out.push(EncyclopediaSection {
            id,
            title: section_title(node, id),
            content: strip_markup(text),
        });
    }
    for child in node.sections.iter().chain(node.items.iter()) {
        visit(child, out);
    }
}

fn section_title(node: &SectionNode, id: u32) -> String {
    node.heading
        .as_deref()
        .map(strip_markup)
        .filter(|h| !h.is_empty())
        .or_else(|| {
            node.anchor
                .as_deref()
                .map(|a| a.replace('_', " ").trim().to_string())
                .filter(|a| !a.is_empty())
        })
        .unwrap_or_else(|| format!("Section {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   plain text   ",
        "<p>Hello <b>world</b></p>",
        "line one<br>line two<BR/>line three<br />end",
        "Tom &amp; Jerry &quot;quoted&quot; &apos;single&apos; &lt;tag&gt;",
        "&amp;lt;b&amp;gt;nested&amp;lt;/b&amp;gt;",
        "<span class=\"searchmatch\">Quantum</span> mechanics &#8212; theory",
        "a < b > c",
        "5 < 6 and 7 > 3",
        "For 0 &lt; x and y &gt; 1 the series converges.",
        "  \n\t<div>\n  spaced  </div>  ",
    ];

    #[test]
    fn test_break_tags_become_single_newlines() {
        for input in [
            "a<br>b",
            "a<br/>b",
            "a<br />b",
            "a<BR>b",
            "a< br / >b",
            "a<Br  />b",
        ] {
            assert_eq!(strip_markup(input), "a\nb", "input: {}", input);
        }
        assert_eq!(strip_markup("one<br>two<br/>three"), "one\ntwo\nthree");
    }

    #[test]
    fn test_plain_text_is_only_trimmed() {
        for input in ["hello", "  spaced out  ", "\ttabs and\nnewlines\n", "no markup here."] {
            assert_eq!(strip_markup(input), input.trim());
        }
    }

    #[test]
    fn test_tags_removed_and_entities_decoded() {
        assert_eq!(strip_markup("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(
            strip_markup("Tom &amp; Jerry &quot;quoted&quot; &apos;single&apos;"),
            "Tom & Jerry \"quoted\" 'single'"
        );
        assert_eq!(strip_markup("5 &gt; 3"), "5 > 3");
    }

    #[test]
    fn test_strip_markup_is_idempotent() {
        for input in SAMPLES {
            let once = strip_markup(input);
            assert_eq!(strip_markup(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_decoded_comparison_brackets_survive() {
        assert_eq!(
            strip_markup("For 0 &lt; x and y &gt; 1 the series converges."),
            "For 0 < x and y > 1 the series converges."
        );
        assert_eq!(strip_markup("5 < 6 and 7 > 3"), "5 < 6 and 7 > 3");
        assert_eq!(
            strip_markup("<p>If <i>a</i> &lt; <i>b</i> then</p>"),
            "If a < b then"
        );
    }

    #[test]
    fn test_double_escaped_markup_does_not_survive() {
        let out = strip_markup("&amp;lt;b&amp;gt;nested&amp;lt;/b&amp;gt;");
        assert_eq!(out, "nested");
    }

    #[test]
    fn test_clean_excerpt_is_single_line_without_markup() {
        for input in SAMPLES {
            let out = clean_excerpt(input);
            assert!(!out.contains('\n'), "newline in {:?}", out);
            assert!(!ANY_TAG.is_match(&out), "tag in {:?}", out);
            for entity in ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"] {
                assert!(!out.contains(entity), "{} in {:?}", entity, out);
            }
        }
        assert_eq!(
            clean_excerpt("The <span class=\"searchmatch\">quantum</span>\n\n  world"),
            "The quantum world"
        );
    }

    #[test]
    fn test_truncate_excerpt() {
        assert_eq!(truncate_excerpt("short", EXCERPT_CHARS), "short");
        let long = "x".repeat(200);
        let cut = truncate_excerpt(&long, EXCERPT_CHARS);
        assert_eq!(cut.len(), EXCERPT_CHARS + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate_excerpt(&"é".repeat(151), 150).chars().count(), 153);
    }

    fn node(id: u32, text: Option<&str>, heading: Option<&str>, sections: Vec<SectionNode>) -> SectionNode {
        SectionNode {
            id,
            anchor: None,
            text: text.map(String::from),
            heading: heading.map(String::from),
            items: Vec::new(),
            sections,
        }
    }

    #[test]
    fn test_flatten_three_levels_depth_first() {
        let tree = vec![
            node(
                1,
                Some("<p>History</p>"),
                Some("History"),
                vec![node(
                    2,
                    None,
                    Some("Early"),
                    vec![node(3, Some("Deep &amp; old"), Some("<i>Ancient</i>"), vec![])],
                )],
            ),
            node(4, Some("Physics text"), Some("Physics"), vec![]),
        ];

        let flat = flatten_sections(&tree);

        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0].title, "History");
        assert_eq!(flat[0].content, "History");
        assert_eq!(flat[1].title, "Ancient");
        assert_eq!(flat[1].content, "Deep & old");
        assert_eq!(flat[2].title, "Physics");
        assert_eq!(
            flat.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_flatten_visits_items_and_skips_blank_text() {
        let mut parent = node(1, Some("   "), Some("Blank"), vec![]);
        parent.items = vec![SectionNode {
            anchor: Some("See_also".into()),
            text: Some("Related".into()),
            ..Default::default()
        }];

        let flat = flatten_sections(&[parent]);

        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].title, "See also");
        assert_eq!(flat[0].id, 1);
    }
}
