use serde::{Deserialize, Serialize};

/// Represents a file's content and metadata
#[derive(Debug, Clone)]
pub struct FileContent {
    /// The raw bytes of the file
    pub content: bytes::Bytes,
    /// The URL this file was fetched from
    pub source_path: String,
    /// Optional ETag reported by the remote service
    pub etag: Option<String>,
}

impl FileContent {
    /// The content as text, or `None` if it is not valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Represents an entry in a directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Name of the file or folder
    pub name: String,
    /// Path relative to the source root
    pub path: String,
    /// Type of entry
    pub entry_type: EntryType,
}

/// Type of directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    /// Symlinks, submodules and anything else the remote reports
    #[serde(other)]
    Other,
}

/// Result of listing a directory
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    /// The path that was listed
    pub path: String,
    /// Entries in the order the remote returned them
    pub entries: Vec<DirectoryEntry>,
}

impl DirectoryListing {
    /// Names of plain files ending in `suffix`, in listing order
    pub fn files_with_suffix<'a>(&'a self, suffix: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .iter()
            .filter(move |e| e.entry_type == EntryType::File && e.name.ends_with(suffix))
            .map(|e| e.name.as_str())
    }
}

/// Body of `POST /search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub keyword: Option<String>,
}

/// Successful or not-found body of `POST /search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub message: String,
    #[serde(
        rename = "fileContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub file_content: Option<String>,
}

/// What a completed scan found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { file_name: String, content: String },
    NotFound,
}
