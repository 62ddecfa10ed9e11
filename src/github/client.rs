//! GitHub API client wrapper
//!
//! Provides the authenticated request-executing capability without
//! exposing Octocrab at the call sites.

use std::env;
use std::sync::Arc;

use jsonwebtoken::EncodingKey;
use octocrab::{Octocrab, models::AppId};

use crate::github::error::{SearchError, SearchResult};

/// GitHub API client wrapper that encapsulates Octocrab.
///
/// Cloning is cheap (Arc clone).
#[derive(Clone, Debug)]
pub struct GitHubClient {
    inner: Arc<Octocrab>,
}

impl GitHubClient {
    /// Create a new client builder
    #[must_use]
    pub fn builder() -> GitHubClientBuilder {
        GitHubClientBuilder::new()
    }

    /// Convenience: create client with personal access token
    pub fn with_token(token: impl Into<String>) -> SearchResult<Self> {
        Self::builder().personal_token(token).build()
    }

    /// Create a client from ambient credentials: `GITHUB_TOKEN`, or a
    /// GitHub App via `GITHUB_APP_ID` + `GITHUB_APP_PRIVATE_KEY`.
    pub fn from_env() -> SearchResult<Self> {
        if let Ok(token) = env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                return Self::with_token(token);
            }
        }
        if let (Ok(app_id), Ok(key)) = (
            env::var("GITHUB_APP_ID"),
            env::var("GITHUB_APP_PRIVATE_KEY"),
        ) {
            let app_id: u64 = app_id
                .parse()
                .map_err(|_| SearchError::ClientSetup("GITHUB_APP_ID is not numeric".into()))?;
            return Self::builder().app(AppId(app_id), key).build();
        }
        Err(SearchError::ClientSetup(
            "no credentials: set GITHUB_TOKEN or GITHUB_APP_ID/GITHUB_APP_PRIVATE_KEY".into(),
        ))
    }

    /// Get inner Octocrab client
    #[must_use]
    pub fn inner(&self) -> &Arc<Octocrab> {
        &self.inner
    }
}

/// Builder for [`GitHubClient`]
pub struct GitHubClientBuilder {
    token: Option<String>,
    app_auth: Option<(AppId, String)>,
    base_uri: Option<String>,
}

impl GitHubClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: None,
            app_auth: None,
            base_uri: None,
        }
    }

    /// Set personal access token for authentication
    pub fn personal_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set GitHub App authentication (app ID and private key)
    pub fn app(mut self, app_id: AppId, private_key: impl Into<String>) -> Self {
        self.app_auth = Some((app_id, private_key.into()));
        self
    }

    /// Set base URI (for GitHub Enterprise)
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    /// Build the `GitHubClient`
    pub fn build(self) -> SearchResult<GitHubClient> {
        let mut builder = Octocrab::builder();

        if let Some(token) = self.token {
            builder = builder.personal_token(token);
        } else if let Some((app_id, private_key)) = self.app_auth {
            let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
                .map_err(|e| SearchError::ClientSetup(format!("Invalid RSA key: {e}")))?;
            builder = builder.app(app_id, key);
        }

        if let Some(uri) = self.base_uri {
            builder = builder
                .base_uri(&uri)
                .map_err(|e| SearchError::ClientSetup(e.to_string()))?;
        }

        let octocrab = builder
            .build()
            .map_err(|e| SearchError::ClientSetup(e.to_string()))?;

        Ok(GitHubClient {
            inner: Arc::new(octocrab),
        })
    }
}

impl Default for GitHubClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
