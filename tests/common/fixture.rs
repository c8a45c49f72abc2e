//! Temporary project directories for end-to-end runs

use graphsmith::{Pipeline, PipelineError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// A project directory that lives as long as the fixture
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self, FixtureError> {
        Ok(Self { dir: TempDir::new()? })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root, creating directories
    pub fn file(&self, relative: &str, contents: &str) -> Result<PathBuf, FixtureError> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Load and validate a schema written into the project
    pub fn pipeline(&self, schema: &str) -> Result<Pipeline, FixtureError> {
        Ok(Pipeline::load(self.dir.path().join(schema))?)
    }

    pub fn read(&self, relative: &str) -> Result<String, FixtureError> {
        Ok(fs::read_to_string(self.dir.path().join(relative))?)
    }
}
