//! Test file discovery

use crate::error::{TestError, TestResult};
use crate::types::OpcodeTestFile;
use std::path::{Path, PathBuf};

/// Finds and parses test definition files
#[derive(Debug, Clone)]
pub struct SuiteLoader {
    dir: PathBuf,
    filter: Option<String>,
}

impl SuiteLoader {
    /// Create a loader over `dir`, optionally restricted to one file name
    pub fn new(dir: impl Into<PathBuf>, filter: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            filter,
        }
    }

    /// Test directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files to run, sorted by name
    ///
    /// With a filter the result is that one file, whether or not it exists;
    /// reading it later reports the problem.
    pub fn discover(&self) -> TestResult<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Err(TestError::NotFound(self.dir.clone()));
        }
        if let Some(file) = &self.filter {
            return Ok(vec![self.dir.join(file)]);
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Parse one test file
    pub fn load_file(path: &Path) -> TestResult<OpcodeTestFile> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
