use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    error::SearchError,
    source::ContentSource,
    types::SearchOutcome,
};

/// Only files with this suffix are fetched and searched
pub const CANDIDATE_SUFFIX: &str = ".json";

/// Scans the files of a content source for a keyword
///
/// The base directory is listed once per search, then candidate files
/// are fetched one at a time in listing order. The first file whose
/// text contains the keyword wins; nothing is cached between searches.
pub struct KeywordSearch {
    source: Arc<dyn ContentSource>,
}

impl KeywordSearch {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Search the base directory for `keyword`
    ///
    /// Matching is a literal, case-sensitive substring test. Files that
    /// fail to download or are not UTF-8 are skipped with a warning.
    ///
    /// # Errors
    ///
    /// - `MissingKeyword`: `keyword` is empty; no request is made
    /// - `Listing`: the directory listing request failed
    /// - `EmptyListing`: the listing held no candidate files
    pub async fn search(&self, keyword: &str) -> Result<SearchOutcome, SearchError> {
        if keyword.is_empty() {
            return Err(SearchError::MissingKeyword);
        }

        let listing = self
            .source
            .list_directory("")
            .await
            .map_err(SearchError::Listing)?;

        let candidates: Vec<&str> = listing.files_with_suffix(CANDIDATE_SUFFIX).collect();
        if candidates.is_empty() {
            return Err(SearchError::EmptyListing {
                identifier: self.source.identifier(),
            });
        }

        debug!(
            source = %self.source.identifier(),
            entries = listing.entries.len(),
            candidates = candidates.len(),
            "Scanning listing"
        );

        for file_name in candidates {
            let file = match self.source.fetch_file(file_name).await {
                Ok(file) => file,
                Err(e) => {
                    warn!(file = file_name, error = %e, "Skipping file that could not be fetched");
                    continue;
                }
            };

            let Some(text) = file.as_text() else {
                warn!(file = file_name, "Skipping file because content is not text");
                continue;
            };

            if text.contains(keyword) {
                info!(file = file_name, "Keyword found");
                return Ok(SearchOutcome::Found {
                    file_name: file_name.to_string(),
                    content: text.to_string(),
                });
            }
        }

        Ok(SearchOutcome::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ContentError, Result};
    use crate::types::{DirectoryEntry, DirectoryListing, EntryType, FileContent};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source that records every call it receives
    #[derive(Default)]
    struct MockSource {
        entries: Vec<DirectoryEntry>,
        files: HashMap<String, Bytes>,
        fail_listing: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MockSource {
        fn with_files(files: &[(&str, &str)]) -> Self {
            let mut source = Self::default();
            for (name, content) in files {
                source.add_entry(name, EntryType::File);
                source
                    .files
                    .insert(name.to_string(), Bytes::from(content.to_string()));
            }
            source
        }

        fn add_entry(&mut self, name: &str, entry_type: EntryType) {
            self.entries.push(DirectoryEntry {
                name: name.to_string(),
                path: name.to_string(),
                entry_type,
            });
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentSource for MockSource {
        async fn fetch_file(&self, path: &str) -> Result<FileContent> {
            self.calls.lock().unwrap().push(format!("fetch:{}", path));
            self.files
                .get(path)
                .map(|content| FileContent {
                    content: content.clone(),
                    source_path: path.to_string(),
                    etag: None,
                })
                .ok_or_else(|| ContentError::NotFound {
                    path: path.to_string(),
                })
        }

        async fn list_directory(&self, path: &str) -> Result<DirectoryListing> {
            self.calls.lock().unwrap().push("list".to_string());
            if self.fail_listing {
                return Err(ContentError::UnexpectedStatus {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(DirectoryListing {
                path: path.to_string(),
                entries: self.entries.clone(),
            })
        }

        fn identifier(&self) -> String {
            "mock".to_string()
        }
    }

    fn searcher(source: MockSource) -> (KeywordSearch, Arc<MockSource>) {
        let source = Arc::new(source);
        (KeywordSearch::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_empty_keyword_makes_no_calls() {
        let (search, source) = searcher(MockSource::with_files(&[("a.json", "x")]));

        assert!(matches!(
            search.search("").await,
            Err(SearchError::MissingKeyword)
        ));
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_first_match_in_listing_order() {
        let (search, source) = searcher(MockSource::with_files(&[
            ("a.json", "{\"node\": \"slack\"}"),
            ("b.json", "{\"node\": \"httpRequest\"}"),
            ("c.json", "{\"node\": \"httpRequest\"}"),
        ]));

        let outcome = search.search("httpRequest").await.unwrap();

        assert_eq!(
            outcome,
            SearchOutcome::Found {
                file_name: "b.json".to_string(),
                content: "{\"node\": \"httpRequest\"}".to_string(),
            }
        );
        assert_eq!(source.calls(), vec!["list", "fetch:a.json", "fetch:b.json"]);
    }

    #[tokio::test]
    async fn test_listing_order_is_not_sorted() {
        let (search, source) = searcher(MockSource::with_files(&[
            ("z.json", "needle"),
            ("a.json", "needle"),
        ]));

        let outcome = search.search("needle").await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Found { file_name, .. } if file_name == "z.json"));
        assert_eq!(source.calls(), vec!["list", "fetch:z.json"]);
    }

    #[tokio::test]
    async fn test_not_found_fetches_every_candidate_once() {
        let (search, source) = searcher(MockSource::with_files(&[
            ("a.json", "alpha"),
            ("b.json", "beta"),
        ]));

        assert_eq!(search.search("gamma").await.unwrap(), SearchOutcome::NotFound);
        assert_eq!(source.calls(), vec!["list", "fetch:a.json", "fetch:b.json"]);
    }

    #[tokio::test]
    async fn test_whitespace_keyword_is_searched() {
        let (search, source) = searcher(MockSource::with_files(&[
            ("a.json", "{}"),
            ("b.json", "{\"a\": 1}"),
        ]));

        let outcome = search.search(" ").await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Found { file_name, .. } if file_name == "b.json"));
        assert_eq!(source.calls(), vec!["list", "fetch:a.json", "fetch:b.json"]);
    }

    #[tokio::test]
    async fn test_match_is_case_sensitive() {
        let (search, _source) = searcher(MockSource::with_files(&[("a.json", "HttpRequest")]));

        assert_eq!(
            search.search("httprequest").await.unwrap(),
            SearchOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_is_skipped() {
        let mut source = MockSource::with_files(&[("b.json", "needle")]);
        // Listed but not downloadable
        source.entries.insert(
            0,
            DirectoryEntry {
                name: "a.json".to_string(),
                path: "a.json".to_string(),
                entry_type: EntryType::File,
            },
        );
        let (search, source) = searcher(source);

        let outcome = search.search("needle").await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Found { file_name, .. } if file_name == "b.json"));
        assert_eq!(source.calls(), vec!["list", "fetch:a.json", "fetch:b.json"]);
    }

    #[tokio::test]
    async fn test_non_text_content_is_skipped() {
        let mut source = MockSource::with_files(&[("b.json", "needle")]);
        source.add_entry("a.json", EntryType::File);
        source
            .files
            .insert("a.json".to_string(), Bytes::from_static(&[0xff, b'n', b'e']));
        source.entries.rotate_right(1);
        let (search, source) = searcher(source);

        let outcome = search.search("needle").await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Found { file_name, .. } if file_name == "b.json"));
        assert_eq!(source.calls(), vec!["list", "fetch:a.json", "fetch:b.json"]);
    }

    #[tokio::test]
    async fn test_only_json_files_are_fetched() {
        let mut source = MockSource::with_files(&[("a.json", "alpha")]);
        source.add_entry("README.md", EntryType::File);
        source.add_entry("more.json", EntryType::Dir);
        let (search, source) = searcher(source);

        assert_eq!(search.search("needle").await.unwrap(), SearchOutcome::NotFound);
        assert_eq!(source.calls(), vec!["list", "fetch:a.json"]);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let mut source = MockSource::default();
        source.add_entry("README.md", EntryType::File);
        let (search, source) = searcher(source);

        assert!(matches!(
            search.search("needle").await,
            Err(SearchError::EmptyListing { identifier }) if identifier == "mock"
        ));
        assert_eq!(source.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_listing_failure() {
        let mut source = MockSource::with_files(&[("a.json", "needle")]);
        source.fail_listing = true;
        let (search, source) = searcher(source);

        assert!(matches!(
            search.search("needle").await,
            Err(SearchError::Listing(ContentError::UnexpectedStatus { status: 500, .. }))
        ));
        assert_eq!(source.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_repeated_search_repeats_remote_calls() {
        let (search, source) = searcher(MockSource::with_files(&[
            ("a.json", "alpha"),
            ("b.json", "needle"),
        ]));

        let first = search.search("needle").await.unwrap();
        let second = search.search("needle").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            source.calls(),
            vec![
                "list",
                "fetch:a.json",
                "fetch:b.json",
                "list",
                "fetch:a.json",
                "fetch:b.json",
            ]
        );
    }
}
