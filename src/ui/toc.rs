use scraper::{Html, Selector};
use std::collections::HashSet;

pub const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";
pub const INDENT_STEP_PX: u32 = 16;
pub const ACTIVE_OFFSET_PX: f64 = 80.0;
pub const ARTICLE_BODY_ID: &str = "article-body";
pub const EMPTY_TOC_MESSAGE: &str = "No headings found";

// Ids the page shell renders around the article. Heading anchors live in the
// same document and must not shadow them.
const SHELL_IDS: &[&str] = &[
    "app",
    "content",
    ARTICLE_BODY_ID,
    "toc-heading",
    "author-name",
    "announcement-heading",
    "comments-heading",
    "categories-heading",
    "tags-heading",
];
const GENERATED_PREFIX: &str = "h-";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TocEntry {
    pub id: String,
    pub level: u8,
    pub text: String,
    pub anchor_id: String,
}

// Author ids win when first to claim a name; everything else gets an `h-`
// slug suffixed until unique in the page.
pub fn extract_entries(content_html: &str) -> Vec<TocEntry> {
    let Ok(selector) = Selector::parse(HEADING_SELECTOR) else {
        return Vec::new();
    };
    let fragment = Html::parse_fragment(content_html);
    let headings: Vec<_> = fragment
        .select(&selector)
        .map(|element| {
            let level = element
                .value()
                .name()
                .strip_prefix('h')
                .and_then(|digit| digit.parse::<u8>().ok())
                .unwrap_or(1);
            let text = normalize_text(&element.text().collect::<String>());
            let explicit_id = element
                .value()
                .attr("id")
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ToString::to_string);
            (level, text, explicit_id)
        })
        .collect();

    let mut taken: HashSet<String> = SHELL_IDS.iter().map(ToString::to_string).collect();

    // Explicit ids claim their names before any slug is generated.
    let claimed: Vec<bool> = headings
        .iter()
        .map(|(_, _, explicit_id)| {
            explicit_id
                .as_ref()
                .is_some_and(|id| taken.insert(id.clone()))
        })
        .collect();

    headings
        .into_iter()
        .zip(claimed)
        .enumerate()
        .map(|(index, ((level, text, explicit_id), claimed))| {
            let anchor_id = match explicit_id {
                Some(id) if claimed => id,
                Some(id) if SHELL_IDS.contains(&id.as_str()) => {
                    unique_anchor(&mut taken, format!("{GENERATED_PREFIX}{id}"))
                }
                Some(id) => unique_anchor(&mut taken, id),
                None => unique_anchor(&mut taken, slugify(&text, index)),
            };

            TocEntry {
                id: format!("toc-{index}"),
                level,
                text,
                anchor_id,
            }
        })
        .collect()
}

fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn slugify(text: &str, index: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        format!("heading-{index}")
    } else {
        format!("{GENERATED_PREFIX}{slug}")
    }
}

fn unique_anchor(taken: &mut HashSet<String>, base: String) -> String {
    let mut candidate = base.clone();
    let mut suffix = 2;
    while taken.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }

    taken.insert(candidate.clone());
    candidate
}

pub fn min_level(entries: &[TocEntry]) -> u8 {
    entries.iter().map(|entry| entry.level).min().unwrap_or(1)
}

pub fn indent_px(level: u8, min_level: u8) -> u32 {
    u32::from(level.saturating_sub(min_level)) * INDENT_STEP_PX
}

/// Picks the heading the reader is currently in: the last one whose top
/// edge has scrolled to or above `offset`, or the first heading otherwise.
pub fn active_anchor<'a>(positions: &'a [(String, f64)], offset: f64) -> Option<&'a str> {
    positions
        .iter()
        .take_while(|(_, top)| *top <= offset)
        .last()
        .or_else(|| positions.first())
        .map(|(anchor, _)| anchor.as_str())
}

pub struct TocRow<'a> {
    pub entry: &'a TocEntry,
    pub indent_px: u32,
    pub is_active: bool,
}

pub enum TocView<'a> {
    Empty,
    Entries(Vec<TocRow<'a>>),
}

pub fn toc_view<'a>(entries: &'a [TocEntry], active_id: Option<&str>) -> TocView<'a> {
    if entries.is_empty() {
        return TocView::Empty;
    }

    let shallowest = min_level(entries);
    TocView::Entries(
        entries
            .iter()
            .map(|entry| TocRow {
                entry,
                indent_px: indent_px(entry.level, shallowest),
                is_active: active_id == Some(entry.anchor_id.as_str()),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_headings_in_document_order() {
        let html = r#"
            <p>intro</p>
            <h2>Getting   started</h2>
            <p>body</p>
            <h3 id="install-step">Install</h3>
            <h2>Getting started</h2>
        "#;

        let entries = extract_entries(html);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].level, 2);
        assert_eq!(entries[0].text, "Getting started");
        assert_eq!(entries[0].anchor_id, "h-getting-started");
        assert_eq!(entries[0].id, "toc-0");

        assert_eq!(entries[1].anchor_id, "install-step");
        assert_eq!(entries[1].level, 3);

        assert_eq!(entries[2].anchor_id, "h-getting-started-2");
    }

    #[test]
    fn headings_without_slug_characters_get_positional_anchor() {
        let entries = extract_entries("<h1>!!!</h1><h4>Déjà vu</h4>");
        assert_eq!(entries[0].anchor_id, "heading-0");
        assert_eq!(entries[1].anchor_id, "h-déjà-vu");
    }

    #[test]
    fn content_without_headings_yields_empty_list() {
        assert!(extract_entries("<p>just text</p>").is_empty());
        assert!(extract_entries("").is_empty());
    }

    #[test]
    fn indentation_is_relative_to_shallowest_heading() {
        let entries = extract_entries("<h2>a</h2><h3>b</h3><h4>c</h4>");
        let min = min_level(&entries);
        assert_eq!(min, 2);
        let indents: Vec<u32> = entries.iter().map(|entry| indent_px(entry.level, min)).collect();
        assert_eq!(indents, [0, 16, 32]);
    }

    #[test]
    fn active_anchor_tracks_last_heading_above_offset() {
        let positions = vec![
            ("intro".to_string(), -400.0),
            ("usage".to_string(), 40.0),
            ("faq".to_string(), 600.0),
        ];

        assert_eq!(active_anchor(&positions, ACTIVE_OFFSET_PX), Some("usage"));
        assert_eq!(active_anchor(&positions[2..], ACTIVE_OFFSET_PX), Some("faq"));
        assert_eq!(active_anchor(&[], ACTIVE_OFFSET_PX), None);
    }

    fn anchors(html: &str) -> Vec<String> {
        extract_entries(html)
            .into_iter()
            .map(|entry| entry.anchor_id)
            .collect()
    }

    #[test]
    fn generated_suffix_never_reuses_an_explicit_id() {
        let ids = anchors(r#"<h2 id="h-intro-2">X</h2><h2>Intro</h2><h2>Intro</h2><h2 id="h-intro">Y</h2>"#);
        assert_eq!(ids, ["h-intro-2", "h-intro-3", "h-intro-4", "h-intro"]);

        let ids = anchors(r#"<h2 id="intro-2">X</h2><h2 id="intro">Intro</h2><h2 id="intro">Again</h2>"#);
        assert_eq!(ids, ["intro-2", "intro", "intro-3"]);
    }

    #[test]
    fn anchors_never_shadow_page_shell_ids() {
        assert_eq!(anchors("<h2>Content</h2><h2>Article body</h2>"), ["h-content", "h-article-body"]);
        assert_eq!(anchors(r#"<h2 id="content">Intro</h2><h3 id="app">Setup</h3>"#), ["h-content", "h-app"]);
    }

    #[test]
    fn empty_list_renders_no_headings_view() {
        assert!(matches!(toc_view(&[], None), TocView::Empty));
        assert_eq!(EMPTY_TOC_MESSAGE, "No headings found");
    }

    #[test]
    fn view_rows_carry_indent_and_active_flag() {
        let entries = extract_entries("<h2>One</h2><h3>Two</h3><h2>Three</h2>");
        let TocView::Entries(rows) = toc_view(&entries, Some("h-two")) else {
            panic!("expected entries");
        };

        let shape: Vec<(&str, u32, bool)> = rows
            .iter()
            .map(|row| (row.entry.text.as_str(), row.indent_px, row.is_active))
            .collect();
        assert_eq!(shape, [("One", 0, false), ("Two", 16, true), ("Three", 0, false)]);
    }
}
