use html5ever::tendril::TendrilSink;
use html5ever::{Attribute, LocalName, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use reqwest::Url;
use std::cell::RefCell;

use crate::data_models::ExtractedPage;

/// Anchor text used when a link has no visible text of its own.
pub const EMPTY_LINK_TEXT: &str = "Link";

/// Turns raw HTML into readable text plus the page title.
///
/// Boilerplate elements (meta, nav, footer, script, noscript, style, button,
/// form and stylesheet links) are dropped with their whole subtree. Links keep their
/// target inline as `text (target)`. The output is one line per block, with
/// whitespace collapsed and no blank lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentExtractor;

impl ContentExtractor {
    pub fn get_dom(html: &str) -> RcDom {
        parse_document(RcDom::default(), Default::default()).one(html)
    }

    pub fn is_removed(local: &LocalName, attrs: &RefCell<Vec<Attribute>>) -> bool {
        match &**local {
            // noscript children arrive as one raw-markup text node
            "meta" | "footer" | "nav" | "script" | "noscript" | "style" | "button" | "form" => {
                true
            }
            "link" => attrs.borrow().iter().any(|attr| {
                &*attr.name.local == "rel"
                    && attr
                        .value
                        .split_ascii_whitespace()
                        .any(|rel| rel.eq_ignore_ascii_case("stylesheet"))
            }),
            _ => false,
        }
    }

    pub fn is_block_like(local: &LocalName) -> bool {
        matches!(
            &**local,
            "p" | "div"
                | "section"
                | "article"
                | "main"
                | "aside"
                | "header"
                | "li"
                | "ul"
                | "ol"
                | "dl"
                | "dt"
                | "dd"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "blockquote"
                | "pre"
                | "table"
                | "tr"
                | "td"
                | "th"
                | "br"
                | "hr"
                | "figure"
                | "figcaption"
                | "body"
                | "head"
        )
    }

    pub fn extract(&self, html: &str, base_url: Option<&Url>) -> ExtractedPage {
        let dom = Self::get_dom(html);
        let mut walker = Walker {
            base_url,
            title: None,
            out: TextBuffer::default(),
        };
        walker.walk(&dom.document);
        ExtractedPage {
            title: walker.title.unwrap_or_default(),
            content: walker.out.finish(),
        }
    }
}

struct Walker<'a> {
    base_url: Option<&'a Url>,
    title: Option<String>,
    out: TextBuffer,
}

impl Walker<'_> {
    fn walk(&mut self, handle: &Handle) {
        match &handle.data {
            NodeData::Text { contents } => {
                self.out.push_text(&contents.borrow());
            }
            NodeData::Element { name, attrs, .. } => {
                let local = &name.local;
                if ContentExtractor::is_removed(local, attrs) {
                    return;
                }

                if &**local == "title" {
                    let text = collapse_whitespace(&inner_text(handle));
                    if self.title.is_none() {
                        self.title = Some(text.clone());
                    }
                    self.out.break_line();
                    self.out.push_text(&text);
                    self.out.break_line();
                    return;
                }

                if &**local == "a" {
                    if let Some(href) = attr_value(attrs, "href") {
                        let text = collapse_whitespace(&inner_text(handle));
                        let text = if text.is_empty() {
                            EMPTY_LINK_TEXT.to_string()
                        } else {
                            text
                        };
                        let target = self.link_target(&href);
                        self.out.push_link(&format!("{text} ({target})"));
                        return;
                    }
                }

                let block = ContentExtractor::is_block_like(local);
                if block {
                    self.out.break_line();
                }
                for child in handle.children.borrow().iter() {
                    self.walk(child);
                }
                if block {
                    self.out.break_line();
                }
            }
            NodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.walk(child);
                }
            }
            // doctype, comments, processing instructions
            _ => {}
        }
    }

    fn link_target(&self, href: &str) -> String {
        let href = href.trim();
        let resolved = match self.base_url {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        };
        strip_scheme(&resolved).to_string()
    }
}

/// Text of every descendant that survives boilerplate removal.
fn inner_text(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, attrs, .. } => {
            if ContentExtractor::is_removed(&name.local, attrs) {
                return;
            }
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

fn attr_value(attrs: &RefCell<Vec<Attribute>>, name: &str) -> Option<String> {
    attrs
        .borrow()
        .iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.to_string())
}

pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("//"))
        .unwrap_or(url)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Accumulates inline text; `break_line` marks block boundaries.
#[derive(Default)]
struct TextBuffer {
    buf: String,
    after_link: bool,
}

impl TextBuffer {
    fn push_text(&mut self, text: &str) {
        if self.after_link && text.starts_with(|c: char| c.is_alphanumeric()) {
            self.buf.push(' ');
        }
        if !text.trim().is_empty() {
            self.after_link = false;
        }
        // newlines inside text nodes are source formatting, not structure
        self.buf
            .extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
    }

    /// Links never glue onto a neighbouring word or link; punctuation stays attached.
    fn push_link(&mut self, link: &str) {
        if self
            .buf
            .chars()
            .last()
            .is_some_and(|c| c.is_alphanumeric() || c == ')')
        {
            self.buf.push(' ');
        }
        self.buf.push_str(link);
        self.after_link = true;
    }

    fn break_line(&mut self) {
        self.after_link = false;
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    fn finish(self) -> String {
        self.buf
            .lines()
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty())
            .collect::<Vec<String>>()
            .join("\n")
    }
}
