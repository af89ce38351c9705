#![allow(async_fn_in_trait)]

pub mod html;
pub mod webdriver;

pub use html::HtmlSession;
pub use webdriver::WebDriverSession;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How elements are located in a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "lowercase")]
pub enum By {
    /// Tag name, e.g. `a`
    Tag(String),
    /// CSS selector, e.g. `a.post-link`
    Css(String),
    /// Element id
    Id(String),
    /// XPath expression
    XPath(String),
}

impl By {
    pub fn tag(name: &str) -> Self {
        By::Tag(name.to_string())
    }

    pub fn css(selector: &str) -> Self {
        By::Css(selector.to_string())
    }

    /// The equivalent CSS selector, if there is one
    pub fn to_css(&self) -> Option<String> {
        match self {
            By::Tag(name) => Some(name.clone()),
            By::Css(selector) => Some(selector.clone()),
            By::Id(id) => Some(format!("[id=\"{}\"]", id.replace('"', "\\\""))),
            By::XPath(_) => None,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            By::Tag(name) => write!(f, "tag name '{name}'"),
            By::Css(selector) => write!(f, "css selector '{selector}'"),
            By::Id(id) => write!(f, "id '{id}'"),
            By::XPath(path) => write!(f, "xpath '{path}'"),
        }
    }
}

/// A browser tab that can be navigated and queried
///
/// Sessions are driven from a single task, one page at a time, so every
/// operation takes `&mut self`.
pub trait Session {
    type Element: Element;

    /// Load `url` in the session
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Title of the loaded document
    async fn title(&mut self) -> Result<String>;

    /// First element matching `by`
    async fn find(&mut self, by: &By) -> Result<Self::Element>;

    /// Every element matching `by`, in document order
    async fn find_all(&mut self, by: &By) -> Result<Vec<Self::Element>>;
}

/// An element found in a session
pub trait Element {
    /// Value of an attribute, `None` when it is not set
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Rendered text of the element and its descendants
    async fn text(&self) -> Result<String>;
}
