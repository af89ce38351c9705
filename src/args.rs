use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use webtext::diff::DiffMode;
use webtext::reporter::OutputFormat;
use webtext::{Mode, WebTextConfig};

#[derive(Parser, Debug)]
#[command(name = "webtext")]
#[command(about = "Extracts metadata, link texts and body text from web pages using a headless browser")]
#[command(version)]
pub struct Args {
    /// Web pages to visit
    #[arg(value_name = "PAGE", required_unless_present = "input")]
    pub pages: Vec<String>,

    /// File listing more pages, one `title,url,sameDomain` entry per line
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// List the links on each page instead of extracting text
    #[arg(short, long)]
    pub links: bool,

    /// Keep only links on the page's own domain and under its URL
    #[arg(short, long)]
    pub same_domain: bool,

    /// Keep only links with non-empty text
    #[arg(short = 't', long)]
    pub with_text: bool,

    /// List only links missing from the set recorded in this file, then record the current set
    #[arg(short, long, value_name = "PATH")]
    pub diff: Option<PathBuf>,

    /// Compare against every recorded link instead of stopping at the first known one
    #[arg(long)]
    pub full_diff: bool,

    /// Append records to this file instead of printing them
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// URL of the WebDriver server (defaults to WEBDRIVER_URL or http://localhost:4444)
    #[arg(long)]
    pub webdriver_url: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
}

/// Convert from CLI argument format to output format
pub fn convert_format(arg: FormatArg) -> OutputFormat {
    match arg {
        FormatArg::Text => OutputFormat::Text,
        FormatArg::Json => OutputFormat::Json,
    }
}

impl Args {
    /// Apply command line overrides on top of a loaded configuration
    pub fn apply(&self, config: &mut WebTextConfig) {
        if self.same_domain {
            config.link_filter.same_domain = true;
        }
        if self.with_text {
            config.link_filter.with_text_only = true;
        }
        if self.full_diff {
            config.diff_mode = DiffMode::Full;
        }
        if let Some(format) = self.format {
            config.output_format = convert_format(format);
        }
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
    }

    pub fn mode(&self) -> Mode {
        match &self.diff {
            Some(path) => Mode::NewLinks(path.clone()),
            None if self.links => Mode::Links,
            None => Mode::Text,
        }
    }
}
