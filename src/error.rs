use thiserror::Error;

/// Errors raised while driving a browser session or handling its output
#[derive(Error, Debug)]
pub enum Error {
    #[error("WebDriver command failed: {0}")]
    WebDriver(#[from] fantoccini::error::CmdError),

    #[error("Failed to start WebDriver session: {0}")]
    NewSession(#[from] fantoccini::error::NewSessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No element matches {0}")]
    NoSuchElement(String),

    #[error("Selector {0} is not supported by this session")]
    UnsupportedSelector(String),

    #[error("Invalid selector {0}")]
    InvalidSelector(String),

    #[error("Unable to navigate to {0}")]
    Navigation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
