use async_trait::async_trait;
use crate::{error::Result, types::{DirectoryListing, FileContent}};

/// Read-only access to the files of one remote directory tree
///
/// Paths are relative to the source's configured base path; an empty
/// path means the base directory itself.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the raw content of a single file
    ///
    /// Returns `ContentError::NotFound` if the file doesn't exist
    async fn fetch_file(&self, path: &str) -> Result<FileContent>;

    /// List the contents of a directory
    ///
    /// Returns `ContentError::NotFound` if the directory doesn't exist
    async fn list_directory(&self, path: &str) -> Result<DirectoryListing>;

    /// Get a human-readable identifier for this source (for logging/debugging)
    fn identifier(&self) -> String;
}
