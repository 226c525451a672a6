//! File discovery for finding images to categorize.

use crate::error::{PipelineError, PipelineResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discovers image files directly inside a directory.
pub struct FileDiscovery {
    supported_formats: Vec<String>,
}

/// Information about a discovered file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileDiscovery {
    /// Create a discovery instance accepting the given extensions.
    pub fn new(supported_formats: &[String]) -> Self {
        Self {
            supported_formats: supported_formats.iter().map(|f| f.to_lowercase()).collect(),
        }
    }

    /// Discover all supported image files at a path.
    ///
    /// If path is a file, returns it if supported.
    /// If path is a directory, lists its immediate children (no recursion),
    /// ordered by file name. A directory that cannot be listed is an error;
    /// an unreadable entry inside it is logged and skipped.
    pub fn discover(&self, path: &Path) -> PipelineResult<Vec<DiscoveredFile>> {
        if path.is_file() {
            if self.is_supported(path) {
                if let Ok(meta) = std::fs::metadata(path) {
                    return Ok(vec![DiscoveredFile {
                        path: path.to_path_buf(),
                        size: meta.len(),
                    }]);
                }
            }
            return Ok(vec![]);
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(PipelineError::Discovery {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {e}", path);
                    continue;
                }
            };
            let entry_path = entry.path();
            if entry_path.is_file() && self.is_supported(entry_path) {
                if let Ok(meta) = entry.metadata() {
                    files.push(DiscoveredFile {
                        path: entry_path.to_path_buf(),
                        size: meta.len(),
                    });
                }
            }
        }

        Ok(files)
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.supported_formats.iter().any(|fmt| *fmt == ext_lower)
            })
            .unwrap_or(false)
    }

    /// Get total size of all discovered files.
    pub fn total_size(files: &[DiscoveredFile]) -> u64 {
        files.iter().map(|f| f.size).sum()
    }
}
