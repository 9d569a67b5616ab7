//! Locating and reading the expenses data file.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};

/// Raw, trimmed text of the expenses file. The content is never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDocument {
    text: String,
    source_path: PathBuf,
}

impl ExpenseDocument {
    pub fn new(text: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            source_path: source_path.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// File the text was read from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}

impl fmt::Display for ExpenseDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An ordered list of accepted file names inside one directory.
#[derive(Debug, Clone)]
pub struct DataSource {
    dir: PathBuf,
    candidates: Vec<String>,
}

impl DataSource {
    pub fn new<I, S>(dir: impl Into<PathBuf>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dir: dir.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.data_dir.clone(), config.data_files.iter().cloned())
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// First candidate that exists, in list order.
    pub fn locate(&self) -> Result<PathBuf> {
        self.candidates
            .iter()
            .map(|name| self.dir.join(name))
            .find(|path| path.exists())
            .ok_or_else(|| AgentError::MissingInput {
                candidates: self.candidates.clone(),
            })
    }

    /// Read the located file as UTF-8 and strip surrounding whitespace.
    pub fn load(&self) -> Result<ExpenseDocument> {
        let path = self.locate()?;
        let raw = std::fs::read_to_string(&path)?;
        debug!(path = %path.display(), bytes = raw.len(), "loaded expenses data");
        Ok(ExpenseDocument::new(raw.trim(), path))
    }
}
