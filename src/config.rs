use crate::diff::DiffMode;
use crate::error::{Error, Result};
use crate::filter::LinkFilter;
use crate::reporter::OutputFormat;
use crate::session::By;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for the browser and the extraction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebTextConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Whether to run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Viewport width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Viewport height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// User agent to send; derived from the browser's default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Selectors whose `href`s are collected in link mode, later ones win
    #[serde(default = "default_link_selectors")]
    pub link_selectors: Vec<By>,

    /// Filters applied to enumerated links
    #[serde(default)]
    pub link_filter: LinkFilter,

    /// How fresh links are compared against recorded ones
    #[serde(default)]
    pub diff_mode: DiffMode,

    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

/// Anchors first, then blog-style post links
fn default_link_selectors() -> Vec<By> {
    vec![By::tag("a"), By::css("a.post-link")]
}

impl Default for WebTextConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            user_agent: None,
            link_selectors: default_link_selectors(),
            link_filter: LinkFilter::default(),
            diff_mode: DiffMode::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl WebTextConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the WebDriver URL with the WEBDRIVER_URL environment variable if provided
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    /// Reject settings the browser cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(Error::Config(format!(
                "window size {}x{} must be non-zero",
                self.window_width, self.window_height
            )));
        }
        if self.link_selectors.is_empty() {
            return Err(Error::Config(
                "at least one link selector is required".to_string(),
            ));
        }
        Ok(())
    }
}
