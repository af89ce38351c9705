use crate::error::Result;
use crate::results::LinkMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

/// How a fresh link set is compared against a recorded one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffMode {
    /// Assume new links come first (most-recent-first feeds) and stop at the
    /// first known link that follows a new one
    #[default]
    StopAtFirstKnown,
    /// Report every link that was not recorded
    Full,
}

impl From<bool> for DiffMode {
    fn from(stop_at_first_known: bool) -> Self {
        if stop_at_first_known {
            DiffMode::StopAtFirstKnown
        } else {
            DiffMode::Full
        }
    }
}

/// Links in `current` whose URL is absent from `previous`
///
/// With [`DiffMode::StopAtFirstKnown`] scanning halts at a known link only once
/// a new link has been seen; known links ahead of the first new one are
/// skipped and scanning goes on. This is a heuristic and can miss new links
/// that appear after a known one.
pub fn new_links(previous: &LinkMap, current: &LinkMap, mode: DiffMode) -> LinkMap {
    let mut fresh = LinkMap::new();
    let mut found_new = false;

    for link in current.iter() {
        if !previous.contains(&link.url) {
            found_new = true;
            fresh.insert(link.url.clone(), link.title.clone());
        } else if found_new && mode == DiffMode::StopAtFirstKnown {
            ::log::trace!("Stopping diff at known link: {}", link.url);
            break;
        }
    }

    fresh
}

/// Link sets recorded per page between runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkHistory {
    pages: BTreeMap<String, LinkMap>,
}

impl LinkHistory {
    /// Load recorded links; a missing file means nothing was recorded yet
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                ::log::info!(
                    "No recorded links at {}, every link is new",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Links recorded for `page_url`, empty if the page was never seen
    pub fn previous(&self, page_url: &str) -> LinkMap {
        self.pages.get(page_url).cloned().unwrap_or_default()
    }

    /// Replace the links recorded for `page_url`
    pub fn record(&mut self, page_url: &str, links: LinkMap) {
        self.pages.insert(page_url.to_string(), links);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(entries: &[(&str, &str)]) -> LinkMap {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_stops_at_first_known_after_new() {
        let previous = links(&[("u1", "t1")]);
        let current = links(&[("u2", "t2"), ("u3", "t3"), ("u1", "t1"), ("u4", "t4")]);

        let fresh = new_links(&previous, &current, DiffMode::StopAtFirstKnown);
        assert_eq!(fresh, links(&[("u2", "t2"), ("u3", "t3")]));

        let fresh = new_links(&previous, &current, DiffMode::Full);
        assert_eq!(fresh, links(&[("u2", "t2"), ("u3", "t3"), ("u4", "t4")]));
    }

    #[test]
    fn test_known_link_first_keeps_scanning() {
        let previous = links(&[("u1", "t1")]);
        let current = links(&[("u1", "t1"), ("u2", "t2")]);

        let fresh = new_links(&previous, &current, DiffMode::StopAtFirstKnown);
        assert_eq!(fresh, links(&[("u2", "t2")]));
    }

    #[test]
    fn test_nothing_new() {
        let previous = links(&[("u1", "t1"), ("u2", "t2")]);
        let current = links(&[("u2", "changed title"), ("u1", "t1")]);

        assert!(new_links(&previous, &current, DiffMode::StopAtFirstKnown).is_empty());
        assert!(new_links(&previous, &current, DiffMode::Full).is_empty());
    }

    #[test]
    fn test_empty_previous() {
        let current = links(&[("u1", "t1"), ("u2", "t2")]);
        let fresh = new_links(&LinkMap::new(), &current, DiffMode::StopAtFirstKnown);
        assert_eq!(fresh, current);
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(DiffMode::from(true), DiffMode::StopAtFirstKnown);
        assert_eq!(DiffMode::from(false), DiffMode::Full);
    }

    #[test]
    fn test_history_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");

        let history = LinkHistory::load(&path).unwrap();
        assert!(history.previous("https://example.com/").is_empty());

        let mut history = history;
        history.record("https://example.com/", links(&[("/b", "B"), ("/a", "A")]));
        history.save(&path).unwrap();

        let reloaded = LinkHistory::load(&path).unwrap();
        assert_eq!(reloaded, history);
        assert_eq!(
            reloaded.previous("https://example.com/"),
            links(&[("/b", "B"), ("/a", "A")])
        );
    }

    #[test]
    fn test_history_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(LinkHistory::load(&path).is_err());
    }
}
