//! Page rendering.
//!
//! Rendering happens in two pure steps: [`page_view`] turns the current
//! state into a [`PageView`], and [`render_html`] turns that into markup.
//! Nothing is diffed; every request rebuilds the whole page.

use std::fmt::Write;

use crate::model::{BookRecord, FavoriteEntry, FavoriteId, ThemePreference};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add,
    Remove(FavoriteId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub label: String,
    pub record: BookRecord,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteItem {
    pub label: String,
    pub entry: FavoriteEntry,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub theme: ThemePreference,
    pub query: String,
    pub results: Vec<ResultItem>,
    pub favorites: Vec<FavoriteItem>,
}

pub fn search_results_view(records: &[BookRecord]) -> Vec<ResultItem> {
    records
        .iter()
        .map(|record| ResultItem {
            label: record.label(),
            record: record.clone(),
            action: Action::Add,
        })
        .collect()
}

pub fn favorites_view(entries: &[FavoriteEntry]) -> Vec<FavoriteItem> {
    entries
        .iter()
        .map(|entry| FavoriteItem {
            label: entry.record.label(),
            entry: entry.clone(),
            action: Action::Remove(entry.id.clone()),
        })
        .collect()
}

pub fn page_view(
    theme: ThemePreference,
    query: &str,
    results: &[BookRecord],
    favorites: &[FavoriteEntry],
) -> PageView {
    PageView {
        theme,
        query: query.to_string(),
        results: search_results_view(results),
        favorites: favorites_view(favorites),
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn hidden(out: &mut String, name: &str, value: &str) {
    let _ = write!(
        out,
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        escape(value)
    );
}

fn render_action(out: &mut String, action: &Action, record: &BookRecord, query: &str) {
    match action {
        Action::Add => {
            out.push_str(r#"<form class="add-form" method="post" action="/favorites">"#);
            hidden(out, "title", &record.title);
            hidden(out, "author", &record.author);
            if let Some(link) = &record.preview_link {
                hidden(out, "previewLink", link);
            }
            if let Some(url) = &record.image_url {
                hidden(out, "imageUrl", url);
            }
            hidden(out, "q", query);
            out.push_str(r#"<button type="submit">Add</button></form>"#);
        }
        Action::Remove(id) => {
            let _ = write!(
                out,
                r#"<form class="remove-form" method="post" action="/favorites/{}/remove">"#,
                escape(&urlencoding::encode(id.as_str()))
            );
            hidden(out, "q", query);
            out.push_str(r#"<button type="submit" class="remove-btn">Remove</button></form>"#);
        }
    }
}

fn render_record(out: &mut String, record: &BookRecord) {
    if let Some(url) = &record.image_url {
        let _ = write!(out, r#"<img src="{}" alt="" loading="lazy">"#, escape(url));
    }
    let _ = write!(
        out,
        "<strong>{}</strong> by {}",
        escape(&record.title),
        escape(&record.author)
    );
    if let Some(link) = &record.preview_link {
        let _ = write!(
            out,
            r#" <a href="{}" target="_blank" rel="noopener">Preview</a>"#,
            escape(link)
        );
    }
}

pub fn render_html(view: &PageView) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Bookshelf</title>\n<link rel=\"stylesheet\" href=\"/style.css\">\n</head>\n");

    if view.theme.is_dark() {
        out.push_str("<body class=\"dark\">\n");
    } else {
        out.push_str("<body>\n");
    }

    out.push_str(r#"<form id="toggle-theme-form" method="post" action="/theme">"#);
    hidden(&mut out, "q", &view.query);
    out.push_str("<button id=\"toggle-theme\" type=\"submit\">Toggle theme</button></form>\n");

    let _ = write!(
        out,
        r#"<form id="search-form" method="get" action="/"><input id="search-input" name="q" value="{}" placeholder="Search books"><button type="submit">Search</button></form>"#,
        escape(&view.query)
    );
    out.push('\n');

    out.push_str("<div id=\"search-results\">\n");
    for item in &view.results {
        out.push_str("<div class=\"book-item\">");
        render_record(&mut out, &item.record);
        render_action(&mut out, &item.action, &item.record, &view.query);
        out.push_str("</div>\n");
    }
    out.push_str("</div>\n");

    out.push_str("<h2>Favorites</h2>\n<ul id=\"book-list\">\n");
    for item in &view.favorites {
        out.push_str("<li>");
        out.push_str(&escape(&item.label));
        render_action(&mut out, &item.action, &item.entry.record, &view.query);
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n</body>\n</html>\n");
    out
}
