//! [`DomNode`] over `scraper`'s parsed HTML tree.

use crate::domain::ports::{DomChild, DomNode};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode {
            element: self.html.root_element(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
}

fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Failed to compile selector '{}': {}", selector, e);
            None
        }
    }
}

/// Elements that start on their own line when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Approximates `innerText`: block boundaries and `<br>` become line breaks,
/// script and style content is skipped.
fn collect_rendered(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                match child.value().name() {
                    "br" => out.push('\n'),
                    "script" | "style" | "template" => {}
                    name if BLOCK_ELEMENTS.contains(&name) => {
                        out.push('\n');
                        collect_rendered(child, out);
                        out.push('\n');
                    }
                    _ => collect_rendered(child, out),
                }
            }
            _ => {}
        }
    }
}

impl<'a> DomNode for HtmlNode<'a> {
    fn locate(&self, selector: &str) -> Option<Self> {
        let selector = compile(selector)?;
        self.element
            .select(&selector)
            .next()
            .map(|element| HtmlNode { element })
    }

    fn locate_all(&self, selector: &str) -> Vec<Self> {
        match compile(selector) {
            Some(selector) => self
                .element
                .select(&selector)
                .map(|element| HtmlNode { element })
                .collect(),
            None => Vec::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.value().attr(name).map(str::to_string)
    }

    fn rendered_text(&self) -> String {
        let mut raw = String::new();
        collect_rendered(self.element, &mut raw);

        raw.lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn child_nodes(&self) -> Vec<DomChild<Self>> {
        self.element
            .children()
            .map(|child| match child.value() {
                Node::Text(text) => DomChild::Text((**text).to_string()),
                Node::Element(_) => ElementRef::wrap(child)
                    .map(|element| DomChild::Element(HtmlNode { element }))
                    .unwrap_or(DomChild::Other),
                _ => DomChild::Other,
            })
            .collect()
    }
}
