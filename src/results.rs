use crate::reporter::Record;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Text extracted from a single page
///
/// Every field except `url` is optional: a field is absent when the DOM
/// query behind it failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// URL the page was requested with
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// `content` of `meta[name="description"]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `content` of `meta[name="keywords"]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Rendered text of every anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_texts: Option<BTreeSet<String>>,

    /// Alt text and rendered text of every image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_texts: Option<BTreeSet<String>>,

    /// Rendered text of the document body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ExtractedPage {
    /// Create an empty record for the given URL
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Self::default()
        }
    }
}

impl Record for ExtractedPage {
    fn fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("url".to_string(), self.url.clone())];

        let text_fields = [
            ("title", &self.title),
            ("description", &self.description),
            ("keywords", &self.keywords),
        ];
        for (key, value) in text_fields {
            if let Some(value) = value {
                fields.push((key.to_string(), value.clone()));
            }
        }

        let set_fields = [
            ("anchor_texts", &self.anchor_texts),
            ("image_texts", &self.image_texts),
        ];
        for (key, value) in set_fields {
            if let Some(value) = value {
                fields.push((key.to_string(), format!("{value:?}")));
            }
        }

        if let Some(body) = &self.body {
            fields.push(("body".to_string(), body.clone()));
        }

        fields
    }
}

/// A link and the text it is labelled with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub title: String,
}

/// Links keyed by URL, iterated in the order they were first seen
///
/// Inserting an existing URL replaces its title but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Link>", into = "Vec<Link>")]
pub struct LinkMap {
    entries: Vec<Link>,
    index: HashMap<String, usize>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a link, returning the title it replaced
    pub fn insert(&mut self, url: impl Into<String>, title: impl Into<String>) -> Option<String> {
        let url = url.into();
        let title = title.into();

        if let Some(&position) = self.index.get(&url) {
            return Some(std::mem::replace(&mut self.entries[position].title, title));
        }

        self.index.insert(url.clone(), self.entries.len());
        self.entries.push(Link { url, title });
        None
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.index
            .get(url)
            .map(|&position| self.entries[position].title.as_str())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.entries.iter()
    }

    /// Merge another map into this one; its titles win on URL collision
    pub fn merge(&mut self, other: LinkMap) {
        for link in other.entries {
            self.insert(link.url, link.title);
        }
    }
}

impl From<Vec<Link>> for LinkMap {
    fn from(links: Vec<Link>) -> Self {
        links.into_iter().map(|link| (link.url, link.title)).collect()
    }
}

impl From<LinkMap> for Vec<Link> {
    fn from(map: LinkMap) -> Self {
        map.entries
    }
}

impl<U: Into<String>, T: Into<String>> FromIterator<(U, T)> for LinkMap {
    fn from_iter<I: IntoIterator<Item = (U, T)>>(iter: I) -> Self {
        let mut map = LinkMap::new();
        for (url, title) in iter {
            map.insert(url, title);
        }
        map
    }
}

impl IntoIterator for LinkMap {
    type Item = Link;
    type IntoIter = std::vec::IntoIter<Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Links found on one page, ready to be reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    /// Page the links were enumerated from
    pub url: String,
    pub links: LinkMap,
}

impl LinkReport {
    pub fn new(url: &str, links: LinkMap) -> Self {
        Self {
            url: url.to_string(),
            links,
        }
    }
}

impl Record for LinkReport {
    fn fields(&self) -> Vec<(String, String)> {
        std::iter::once(("url".to_string(), self.url.clone()))
            .chain(
                self.links
                    .iter()
                    .map(|link| (link.url.clone(), link.title.clone())),
            )
            .collect()
    }
}
