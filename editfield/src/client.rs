//! HTTP commit client

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::CommitError;

/// The client that persists a chosen value to the remote endpoint.
///
/// A commit is `POST {action}/{value}` with an empty body. Any 2xx
/// response is success; everything else, transport failures included, is
/// failure. No response body is consumed beyond the status.
///
/// Cheap to clone (uses `Arc` internally) and safe to share across tasks.
///
/// # Example
///
/// ```ignore
/// use editfield::CommitClient;
///
/// let client = CommitClient::new("/api/field");
/// client.commit("b").await?;
/// ```
#[derive(Clone)]
pub struct CommitClient {
    inner: Arc<CommitClientInner>,
}

struct CommitClientInner {
    action: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl CommitClient {
    /// Creates a client committing against the given URL prefix.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(CommitClientInner {
                action: action.into(),
                http_client: Client::new(),
                timeout: None,
            }),
        }
    }

    /// Sets a per-request timeout.
    ///
    /// No timeout is applied by default; the request resolves or rejects
    /// whenever the transport decides.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(CommitClientInner {
                action: self.inner.action.clone(),
                http_client: self.inner.http_client.clone(),
                timeout: Some(timeout),
            }),
        }
    }

    /// Sets a custom HTTP client.
    pub fn with_http_client(self, client: Client) -> Self {
        Self {
            inner: Arc::new(CommitClientInner {
                action: self.inner.action.clone(),
                http_client: client,
                timeout: self.inner.timeout,
            }),
        }
    }

    /// Returns the URL prefix commits are posted under.
    pub fn action(&self) -> &str {
        &self.inner.action
    }

    /// Persist a value: `POST {action}/{value}` with an empty body.
    pub async fn commit(&self, value: &str) -> Result<(), CommitError> {
        let url = format!(
            "{}/{}",
            self.inner.action.trim_end_matches('/'),
            urlencoding::encode(value)
        );

        let mut request = self.inner.http_client.post(&url);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(CommitError::Http { status, message })
        }
    }
}

impl std::fmt::Debug for CommitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitClient")
            .field("action", &self.inner.action)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}
