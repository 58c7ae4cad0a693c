pub mod config;
pub mod error;
pub mod github;
pub mod http;
pub mod search;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{ContentError, Result, SearchError};
pub use github::GitHubSource;
pub use search::KeywordSearch;
pub use source::ContentSource;
pub use types::{
    DirectoryEntry, DirectoryListing, EntryType, FileContent, SearchOutcome, SearchRequest,
    SearchResponse,
};
