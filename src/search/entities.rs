//! How each portal record type is searched and shown as a [`SearchResult`].

use pulldown_cmark::{Event as MdEvent, Options, Parser, TagEnd, TextMergeStream};

use super::strategy::{FieldRole, Signals};
use crate::models::event::Event;
use crate::models::gallery::GalleryImage;
use crate::models::member::Member;
use crate::models::news::NewsArticle;
use crate::models::project::Project;
use crate::models::search::{EntityKind, SearchResult};

/// A record the search pipeline can score, filter and map.
///
/// Missing optional text is exposed as the empty string, which never matches
/// a non-empty query or an active category filter.
pub trait Searchable {
    const KIND: EntityKind;

    /// Searchable text fields and their roles.
    fn fields(&self) -> Vec<(FieldRole, &str)>;

    fn category(&self) -> Option<&str>;

    fn status(&self) -> &str;

    /// Attributes used by additive scoring.
    fn signals(&self) -> Signals<'_> {
        Signals {
            category: self.category(),
            status: self.status(),
            ..Signals::default()
        }
    }

    fn to_result(&self, relevance_score: f64, preview_len: usize) -> SearchResult;
}

impl Searchable for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn fields(&self) -> Vec<(FieldRole, &str)> {
        vec![
            (FieldRole::Title, self.title.as_str()),
            (FieldRole::Body, self.description.as_str()),
            (FieldRole::Tag, self.category.as_deref().unwrap_or("")),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn signals(&self) -> Signals<'_> {
        Signals {
            priority: self.priority_score,
            impact: self.impact_level,
            created_at: Some(self.created_at),
            category: self.category(),
            status: self.status(),
        }
    }

    fn to_result(&self, relevance_score: f64, _preview_len: usize) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            kind: Self::KIND,
            category: self.category.clone(),
            status: Some(self.status.clone()),
            date: Some(self.created_at),
            image: self.image_url.clone(),
            location: None,
            relevance_score,
        }
    }
}

impl Searchable for NewsArticle {
    const KIND: EntityKind = EntityKind::News;

    fn fields(&self) -> Vec<(FieldRole, &str)> {
        vec![
            (FieldRole::Title, self.title.as_str()),
            (FieldRole::Body, self.content.as_str()),
            (FieldRole::Body, self.excerpt.as_deref().unwrap_or("")),
            (FieldRole::Tag, self.category.as_deref().unwrap_or("")),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn signals(&self) -> Signals<'_> {
        Signals {
            created_at: Some(self.published_at),
            category: self.category(),
            status: self.status(),
            ..Signals::default()
        }
    }

    fn to_result(&self, relevance_score: f64, preview_len: usize) -> SearchResult {
        let description = match self.excerpt.as_deref() {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt.to_string(),
            _ => content_preview(&self.content, preview_len),
        };

        SearchResult {
            id: self.id.clone(),
            title: self.title.clone(),
            description,
            kind: Self::KIND,
            category: self.category.clone(),
            status: Some(self.status.clone()),
            date: Some(self.published_at),
            image: self.image.clone(),
            location: None,
            relevance_score,
        }
    }
}

impl Searchable for Event {
    const KIND: EntityKind = EntityKind::Event;

    fn fields(&self) -> Vec<(FieldRole, &str)> {
        vec![
            (FieldRole::Title, self.title.as_str()),
            (FieldRole::Body, self.description.as_str()),
            (FieldRole::Tag, self.category.as_str()),
            (FieldRole::Tag, self.location.as_str()),
        ]
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn to_result(&self, relevance_score: f64, _preview_len: usize) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            kind: Self::KIND,
            category: Some(self.category.clone()),
            status: Some(self.status.clone()),
            date: Some(self.date),
            image: None,
            location: Some(self.location.clone()),
            relevance_score,
        }
    }
}

impl Searchable for GalleryImage {
    const KIND: EntityKind = EntityKind::Gallery;

    fn fields(&self) -> Vec<(FieldRole, &str)> {
        vec![
            (FieldRole::Title, self.title.as_str()),
            (FieldRole::Body, self.description.as_deref().unwrap_or("")),
            (FieldRole::Tag, self.category.as_deref().unwrap_or("")),
        ]
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn signals(&self) -> Signals<'_> {
        Signals {
            created_at: Some(self.created_at),
            category: self.category(),
            status: self.status(),
            ..Signals::default()
        }
    }

    fn to_result(&self, relevance_score: f64, _preview_len: usize) -> SearchResult {
        SearchResult {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            kind: Self::KIND,
            category: self.category.clone(),
            status: Some(self.status.clone()),
            date: Some(self.created_at),
            image: Some(self.image_url.clone()),
            location: None,
            relevance_score,
        }
    }
}

impl Searchable for Member {
    const KIND: EntityKind = EntityKind::Member;

    fn fields(&self) -> Vec<(FieldRole, &str)> {
        vec![
            (FieldRole::Title, self.name.as_str()),
            (FieldRole::Body, self.bio.as_str()),
            (FieldRole::Tag, self.position.as_str()),
        ]
    }

    fn category(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn signals(&self) -> Signals<'_> {
        Signals {
            created_at: Some(self.created_at),
            status: self.status(),
            ..Signals::default()
        }
    }

    fn to_result(&self, relevance_score: f64, _preview_len: usize) -> SearchResult {
        let description = if self.bio.trim().is_empty() {
            self.position.clone()
        } else {
            self.bio.clone()
        };

        SearchResult {
            id: self.id.clone(),
            title: self.name.clone(),
            description,
            kind: Self::KIND,
            category: None,
            status: Some(self.status.clone()),
            date: Some(self.created_at),
            image: self.profile_image_url.clone(),
            location: None,
            relevance_score,
        }
    }
}

/// Strip Markdown/HTML markup and cut the text to `max_chars` characters.
///
/// Text inside HTML blocks and inline tags is kept. Whitespace runs collapse
/// to one space. `...` is appended only when something was cut off.
pub fn content_preview(raw: &str, max_chars: usize) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut text = String::new();
    for event in TextMergeStream::new(Parser::new_ext(raw, options)) {
        match event {
            MdEvent::Text(t) | MdEvent::Code(t) => text.push_str(&t),
            MdEvent::Html(html) | MdEvent::InlineHtml(html) => push_html_text(&html, &mut text),
            MdEvent::SoftBreak | MdEvent::HardBreak | MdEvent::Rule => push_separator(&mut text),
            MdEvent::End(tag) if ends_block(&tag) => push_separator(&mut text),
            _ => {}
        }
        if text.chars().filter(|c| !c.is_whitespace()).count() > max_chars {
            break;
        }
    }

    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut preview: String = text.chars().take(max_chars).collect();
    preview.truncate(preview.trim_end().len());
    preview.push_str("...");
    preview
}

fn ends_block(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::Item
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock
            | TagEnd::TableCell
    )
}

fn push_separator(text: &mut String) {
    if !text.is_empty() && !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
}

const BLOCK_TAGS: &[&str] = &[
    "p", "br", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td", "th",
    "blockquote", "section", "article", "hr", "pre",
];

/// Append the text of an HTML fragment, dropping its tags. Block-level tags
/// become a space.
fn push_html_text(html: &str, text: &mut String) {
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        push_decoded(&rest[..open], text);
        let Some(len) = rest[open..].find('>') else {
            // Unterminated tag: nothing after it is text.
            return;
        };
        let name = rest[open + 1..open + len]
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        if BLOCK_TAGS.contains(&name.as_str()) {
            push_separator(text);
        }
        rest = &rest[open + len + 1..];
    }
    push_decoded(rest, text);
}

fn push_decoded(fragment: &str, text: &mut String) {
    if !fragment.contains('&') {
        text.push_str(fragment);
        return;
    }
    let decoded = fragment
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.push_str(&decoded);
}
