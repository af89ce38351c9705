use crate::error::{Error, Result};
use crate::normalize::normalize_bytes;
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use url::Url;

/// A page listed in an input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Label for the page, informational only
    pub title: Option<String>,
    pub url: String,
    /// Overrides the same-domain link filter for this page when set
    pub same_domain: Option<bool>,
}

impl PageEntry {
    pub fn new(url: &str) -> Self {
        Self {
            title: None,
            url: url.to_string(),
            same_domain: None,
        }
    }
}

/// Reads a page list file
pub fn read_page_list<P: AsRef<Path>>(path: P) -> Result<Vec<PageEntry>> {
    let contents = std::fs::read(path.as_ref())?;
    let entries = parse_page_list(&contents)?;
    ::log::debug!(
        "Read {} pages from {}",
        entries.len(),
        path.as_ref().display()
    );
    Ok(entries)
}

/// Parses `title,url,sameDomain` records
///
/// A record holding a single field is a bare URL. Two fields are
/// `url,sameDomain` when the second is a flag and the first a URL, and
/// `title,url` otherwise. Unquoted extra commas belong to the title. Blank
/// lines, `#` comments and a `title,url,sameDomain` header are skipped.
/// Invalid UTF-8 in a field is dropped.
pub fn parse_page_list(contents: &[u8]) -> Result<Vec<PageEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_reader(contents);

    let mut entries = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        let line = record.position().map_or(0, |pos| pos.line());
        let fields: Vec<String> = record.iter().map(normalize_bytes).collect();
        if fields.iter().all(String::is_empty) || is_header(&fields) {
            continue;
        }

        let (title, url, same_domain) = match fields.as_slice() {
            [url] => (None, url.as_str(), None),
            [url, flag] if parse_flag(flag).is_some() && Url::parse(url).is_ok() => {
                (None, url.as_str(), parse_flag(flag))
            }
            [title, url] => (Some(title.clone()), url.as_str(), None),
            [title @ .., url, same_domain] => {
                let same_domain = parse_flag(same_domain).ok_or_else(|| {
                    Error::Config(format!(
                        "line {}: sameDomain must be true or false, got '{}'",
                        line, same_domain
                    ))
                })?;
                (Some(title.join(",")), url.as_str(), Some(same_domain))
            }
            [] => continue,
        };

        if url.is_empty() {
            return Err(Error::Config(format!("line {}: missing URL", line)));
        }
        if let Err(e) = Url::parse(url) {
            return Err(Error::Config(format!(
                "line {}: invalid URL '{}': {}",
                line, url, e
            )));
        }

        entries.push(PageEntry {
            title: title.filter(|t| !t.is_empty()),
            url: url.to_string(),
            same_domain,
        });
    }

    Ok(entries)
}

fn is_header(fields: &[String]) -> bool {
    fields.join(",").eq_ignore_ascii_case("title,url,samedomain")
}

fn parse_flag(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
