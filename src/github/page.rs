//! Single-attempt page execution against the search endpoint.

use std::time::Duration;

use serde::Deserialize;

use crate::github::client::GitHubClient;
use crate::github::config::SearchConfig;
use crate::github::error::{SearchError, SearchResult};
use crate::github::types::{PageCursor, RepoRecord, SearchPage};

/// Executes one page query against the remote search endpoint.
///
/// This is the single-attempt unit: no retries happen here, and the
/// query string arrives fully assembled (sort and range clauses
/// already appended). Implementations decode the provider response
/// into the [`SearchPage`] shape.
pub trait PageFetcher: Send + Sync {
    /// Fetch one page of up to the configured page size.
    fn fetch_page(
        &self,
        query: &str,
        cursor: Option<PageCursor>,
    ) -> impl Future<Output = SearchResult<SearchPage>> + Send;
}

const SEARCH_DOCUMENT: &str = "\
query($query: String!, $first: Int!, $cursor: String) {
  search(query: $query, type: REPOSITORY, first: $first, after: $cursor) {
    nodes {
      ... on Repository {
        databaseId
        nameWithOwner
        stargazerCount
        forkCount
        diskUsage
        createdAt
        updatedAt
        pushedAt
        archivedAt
      }
    }
    pageInfo {
      hasNextPage
    }
  }
}";

#[derive(Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<SearchData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct SearchData {
    search: SearchConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchConnection {
    #[serde(default)]
    nodes: Vec<RepoRecord>,
    page_info: PageInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
}

/// Page fetcher backed by the GitHub GraphQL search endpoint.
pub struct GraphqlFetcher {
    client: GitHubClient,
    page_size: u8,
    request_timeout: Duration,
}

impl GraphqlFetcher {
    /// Wrap an authenticated client with the configured page size and
    /// per-request deadline.
    #[must_use]
    pub fn new(client: GitHubClient, config: &SearchConfig) -> Self {
        Self {
            client,
            page_size: config.page_size,
            request_timeout: config.request_timeout,
        }
    }
}

impl PageFetcher for GraphqlFetcher {
    async fn fetch_page(
        &self,
        query: &str,
        cursor: Option<PageCursor>,
    ) -> SearchResult<SearchPage> {
        let payload = serde_json::json!({
            "query": SEARCH_DOCUMENT,
            "variables": {
                "query": query,
                "first": self.page_size,
                "cursor": cursor.map(PageCursor::encode),
            },
        });

        let request = self.client.inner().graphql::<serde_json::Value>(&payload);
        let raw = tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| SearchError::Timeout(self.request_timeout))?
            .map_err(SearchError::from)?;

        let decoded: GraphqlResponse =
            serde_json::from_value(raw).map_err(|e| SearchError::Decode(e.to_string()))?;

        // GraphQL-level failures arrive as a 200 with an errors array;
        // the joined messages feed the transient classification.
        if !decoded.errors.is_empty() {
            let joined = decoded
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SearchError::Api(joined));
        }

        let data = decoded
            .data
            .ok_or_else(|| SearchError::Decode("response carried no data".into()))?;

        Ok(SearchPage {
            items: data.search.nodes,
            has_next_page: data.search.page_info.has_next_page,
        })
    }
}
