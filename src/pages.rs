use crate::config::WebTextConfig;
use crate::diff::{LinkHistory, new_links};
use crate::error::Result;
use crate::extract::extract;
use crate::input::PageEntry;
use crate::links::get_links;
use crate::reporter::Reporter;
use crate::results::LinkReport;
use crate::session::Session;
use std::path::PathBuf;

/// What is produced for each page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Metadata, anchor/image texts and body text
    #[default]
    Text,
    /// Outbound links
    Links,
    /// Links absent from the set recorded in the given file, which is
    /// updated with the fresh links afterwards
    NewLinks(PathBuf),
}

/// Builder for a run over a list of pages
pub struct Pages {
    entries: Vec<PageEntry>,
    config: WebTextConfig,
    mode: Mode,
}

impl Pages {
    /// Create a new Pages builder for the given entries
    pub fn new(entries: Vec<PageEntry>) -> Self {
        Self {
            entries,
            config: WebTextConfig::default(),
            mode: Mode::default(),
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: WebTextConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose what is produced for each page
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visit every page in order and emit one record per page
    ///
    /// Pages that fail to load still produce a record. Only output errors
    /// end the run early.
    pub async fn run<S: Session>(
        &self,
        session: &mut S,
        reporter: &mut Reporter,
    ) -> Result<usize> {
        match &self.mode {
            Mode::Text => self.run_text(session, reporter).await,
            Mode::Links => self.run_links(session, reporter, None).await,
            Mode::NewLinks(path) => {
                let mut history = LinkHistory::load(path)?;
                let processed = self
                    .run_links(session, reporter, Some(&mut history))
                    .await?;
                history.save(path)?;
                ::log::debug!("Recorded links saved to {}", path.display());
                Ok(processed)
            }
        }
    }

    async fn run_text<S: Session>(
        &self,
        session: &mut S,
        reporter: &mut Reporter,
    ) -> Result<usize> {
        let mut processed = 0;
        for entry in &self.entries {
            if let Some(title) = &entry.title {
                ::log::debug!("Visiting {} ({})", entry.url, title);
            }
            let page = extract(session, &entry.url).await;
            reporter.emit(&page)?;
            processed += 1;
            ::log::info!("Processed page {}: {}", processed, entry.url);
        }
        Ok(processed)
    }

    async fn run_links<S: Session>(
        &self,
        session: &mut S,
        reporter: &mut Reporter,
        mut history: Option<&mut LinkHistory>,
    ) -> Result<usize> {
        let mut processed = 0;
        for entry in &self.entries {
            let mut filter = self.config.link_filter;
            if let Some(same_domain) = entry.same_domain {
                filter.same_domain = same_domain;
            }

            let links =
                get_links(session, &entry.url, &filter, &self.config.link_selectors).await;

            let reported = match history.as_deref_mut() {
                Some(history) => {
                    let previous = history.previous(&entry.url);
                    let fresh = new_links(&previous, &links, self.config.diff_mode);
                    ::log::info!("{} new links in {}", fresh.len(), entry.url);

                    // An empty result usually means the page failed to load
                    if links.is_empty() {
                        ::log::warn!("No links found in {}, keeping recorded links", entry.url);
                    } else {
                        history.record(&entry.url, links);
                    }
                    fresh
                }
                None => links,
            };

            reporter.emit(&LinkReport::new(&entry.url, reported))?;
            processed += 1;
        }
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffMode;
    use crate::reporter::OutputFormat;
    use crate::session::HtmlSession;

    const FEED_URL: &str = "https://feed.test/";

    fn feed(posts: &[(&str, &str)]) -> String {
        let anchors: String = posts
            .iter()
            .map(|(href, text)| format!(r#"<a class="post-link" href="{href}">{text}</a>"#))
            .collect();
        format!("<html><head><title>Feed</title></head><body>{anchors}</body></html>")
    }

    #[tokio::test]
    async fn test_text_mode_emits_one_record_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");

        let mut session = HtmlSession::new().with_page(FEED_URL, &feed(&[("/p1", "One")]));
        let pages = Pages::new(vec![
            PageEntry::new(FEED_URL),
            PageEntry::new("https://missing.test/"),
        ]);
        assert_eq!(pages.len(), 2);

        let mut reporter = Reporter::new(Some(&out), OutputFormat::Text).unwrap();
        let processed = pages.run(&mut session, &mut reporter).await.unwrap();
        reporter.close().unwrap();
        assert_eq!(processed, 2);

        let contents = std::fs::read_to_string(&out).unwrap();
        let records: Vec<&str> = contents.split_terminator("\n\n").collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].starts_with("url: https://feed.test/\ntitle: Feed\n"));
        assert!(records[0].contains("anchor_texts: {\"One\"}"));
        // The failed navigation reads the page left in the session
        assert!(records[1].starts_with("url: https://missing.test/\ntitle: Feed\n"));
    }

    #[tokio::test]
    async fn test_links_mode_honours_entry_filter() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.jsonl");

        let html = r#"<html><body>
            <a href="https://feed.test/p1">Own</a>
            <a href="https://other.test/">Other</a>
        </body></html>"#;
        let mut session = HtmlSession::new().with_page(FEED_URL, html);

        let mut entry = PageEntry::new(FEED_URL);
        entry.same_domain = Some(true);
        let pages = Pages::new(vec![entry]).with_mode(Mode::Links);

        let mut reporter = Reporter::new(Some(&out), OutputFormat::Json).unwrap();
        pages.run(&mut session, &mut reporter).await.unwrap();
        reporter.close().unwrap();

        let contents = std::fs::read_to_string(&out).unwrap();
        let report: LinkReport = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(report.url, FEED_URL);
        let urls: Vec<&str> = report.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://feed.test/p1"]);
    }

    #[tokio::test]
    async fn test_new_links_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.jsonl");
        let recorded = dir.path().join("links.json");

        let config = WebTextConfig {
            diff_mode: DiffMode::StopAtFirstKnown,
            ..WebTextConfig::default()
        };
        let pages = Pages::new(vec![PageEntry::new(FEED_URL)])
            .with_config(config)
            .with_mode(Mode::NewLinks(recorded.clone()));

        let first = feed(&[("/p2", "Two"), ("/p1", "One")]);
        let second = feed(&[
            ("/p4", "Four"),
            ("/p3", "Three"),
            ("/p2", "Two"),
            ("/p1", "One"),
        ]);

        let mut reporter = Reporter::new(Some(&out), OutputFormat::Json).unwrap();

        let mut session = HtmlSession::new().with_page(FEED_URL, &first);
        pages.run(&mut session, &mut reporter).await.unwrap();

        let mut session = HtmlSession::new().with_page(FEED_URL, &second);
        pages.run(&mut session, &mut reporter).await.unwrap();

        // A page that cannot be loaded keeps what was recorded
        let mut session = HtmlSession::new();
        pages.run(&mut session, &mut reporter).await.unwrap();
        reporter.close().unwrap();

        let contents = std::fs::read_to_string(&out).unwrap();
        let reports: Vec<LinkReport> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        let urls = |report: &LinkReport| -> Vec<String> {
            report.links.iter().map(|l| l.url.clone()).collect()
        };

        assert_eq!(reports.len(), 3);
        assert_eq!(urls(&reports[0]), vec!["/p2", "/p1"]);
        assert_eq!(urls(&reports[1]), vec!["/p4", "/p3"]);
        assert!(reports[2].links.is_empty());

        let history = LinkHistory::load(&recorded).unwrap();
        assert_eq!(history.previous(FEED_URL).len(), 4);
    }
}
