use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A result that can be written as `key: value` lines
pub trait Record {
    /// Fields in output order; absent fields are left out
    fn fields(&self) -> Vec<(String, String)>;
}

/// How records are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `key: value` line per field, records separated by a blank line
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes records to stdout or appends them to a file
pub struct Reporter {
    out: Option<Box<dyn Write>>,
    format: OutputFormat,
}

impl Reporter {
    /// Create a reporter appending to `path`, or writing to stdout when `path` is `None`
    pub fn new(path: Option<&Path>, format: OutputFormat) -> Result<Self> {
        let out: Box<dyn Write> = match path {
            Some(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                ::log::debug!("Appending records to {}", path.display());
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        };

        Ok(Self {
            out: Some(out),
            format,
        })
    }

    /// Write one record
    pub fn emit<R: Record + Serialize>(&mut self, record: &R) -> Result<()> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| Error::Io(io::Error::other("reporter is already closed")))?;

        match self.format {
            OutputFormat::Text => {
                for (key, value) in record.fields() {
                    writeln!(out, "{key}: {value}")?;
                }
                writeln!(out)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, record)?;
                writeln!(out)?;
            }
        }

        Ok(())
    }

    /// Flush and release the output. Calling it again does nothing.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut out) = self.out.take() {
            out.flush()?;
        }
        Ok(())
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            ::log::warn!("Failed to flush output: {}", e);
        }
    }
}
