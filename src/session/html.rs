use crate::error::{Error, Result};
use crate::session::{By, Element, Session};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Elements whose text is never rendered
const HIDDEN_TAGS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// A session over HTML documents held in memory
///
/// Navigation only succeeds for URLs registered with [`HtmlSession::with_page`];
/// a failed navigation leaves the previous document loaded, the way a browser
/// keeps its last page.
#[derive(Debug, Clone, Default)]
pub struct HtmlSession {
    documents: HashMap<String, String>,
    current: Option<String>,
}

impl HtmlSession {
    /// Create a session with no documents and a blank page loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the HTML served for `url`
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.add_page(url, html);
        self
    }

    pub fn add_page(&mut self, url: &str, html: &str) {
        self.documents.insert(url.to_string(), html.to_string());
    }

    fn document(&self) -> Html {
        Html::parse_document(self.current.as_deref().unwrap_or_default())
    }

    fn select(&self, by: &By) -> Result<Vec<HtmlElement>> {
        let css = by
            .to_css()
            .ok_or_else(|| Error::UnsupportedSelector(by.to_string()))?;
        let selector = Selector::parse(&css).map_err(|_| Error::InvalidSelector(by.to_string()))?;

        let document = self.document();
        let elements = document
            .select(&selector)
            .map(HtmlElement::snapshot)
            .collect();
        Ok(elements)
    }
}

impl Session for HtmlSession {
    type Element = HtmlElement;

    async fn goto(&mut self, url: &str) -> Result<()> {
        let html = self
            .documents
            .get(url)
            .ok_or_else(|| Error::Navigation(url.to_string()))?;
        self.current = Some(html.clone());
        Ok(())
    }

    async fn title(&mut self) -> Result<String> {
        let selector = Selector::parse("title").map_err(|_| Error::InvalidSelector("title".into()))?;
        let document = self.document();
        let title = document
            .select(&selector)
            .next()
            .map(|title| collapse(title.text()))
            .unwrap_or_default();
        Ok(title)
    }

    async fn find(&mut self, by: &By) -> Result<HtmlElement> {
        self.select(by)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoSuchElement(by.to_string()))
    }

    async fn find_all(&mut self, by: &By) -> Result<Vec<HtmlElement>> {
        self.select(by)
    }
}

/// Attributes and rendered text of an element, captured when it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlElement {
    attributes: Vec<(String, String)>,
    text: String,
}

impl HtmlElement {
    fn snapshot(element: ElementRef<'_>) -> Self {
        let attributes = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self {
            attributes,
            text: rendered_text(element),
        }
    }
}

impl Element for HtmlElement {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value.clone()))
    }

    async fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Visible text of an element, whitespace collapsed to single spaces
fn rendered_text(element: ElementRef<'_>) -> String {
    let visible = element.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
        });
        (!hidden).then_some(&**text)
    });
    collapse(visible)
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
