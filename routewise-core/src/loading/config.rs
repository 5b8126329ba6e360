use std::path::PathBuf;

/// Location of a prepared road graph document
#[derive(Debug, Clone)]
pub struct GraphSource {
    /// Path to the JSON graph document
    pub path: PathBuf,
}

impl GraphSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
