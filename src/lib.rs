// Re-export modules
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod filter;
pub mod input;
pub mod links;
pub mod normalize;
pub mod pages;
pub mod reporter;
pub mod results;
pub mod session;

// Re-export commonly used types for convenience
pub use config::WebTextConfig;
pub use error::{Error, Result};
pub use pages::{Mode, Pages};
pub use results::{ExtractedPage, Link, LinkMap, LinkReport};
pub use session::{By, Session};
