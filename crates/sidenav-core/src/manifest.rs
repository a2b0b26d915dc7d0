//! Page manifest retrieval.
//!
//! The manifest is an externally produced JSON document listing every page of
//! the site:
//!
//! ```json
//! { "pages": ["index.html", "buttons.html", "new-widget.html"] }
//! ```
//!
//! It is fetched through the [`ManifestSource`] trait so discovery can run
//! against a local file, a remote URL, or an in-memory fixture. Every failure
//! is reported as a [`ManifestError`]; callers decide whether it is fatal
//! (discovery never treats it as such).

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use ureq::Agent;

/// Parsed manifest payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    /// Page identifiers in manifest order.
    pub pages: Vec<String>,
}

impl Manifest {
    /// Parse a JSON manifest payload.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Malformed`] if the payload is not a JSON
    /// object with a `pages` string array.
    pub fn parse(payload: &[u8]) -> Result<Self, ManifestError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// Error retrieving or parsing a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Resource does not exist.
    #[error("Manifest not found: {0}")]
    NotFound(String),
    /// Remote resource answered with a non-success status.
    #[error("Manifest request to {url} returned status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// I/O error reading a local manifest.
    #[error("I/O error reading manifest: {0}")]
    Io(#[from] std::io::Error),
    /// Transport-level HTTP failure.
    #[error("HTTP error fetching manifest: {0}")]
    Http(String),
    /// Payload is not a valid manifest.
    #[error("Malformed manifest: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of a page manifest.
pub trait ManifestSource: Send + Sync {
    /// Retrieve and parse the manifest.
    fn fetch(&self) -> impl Future<Output = Result<Manifest, ManifestError>> + Send;
}

/// Where a manifest lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLocator {
    /// Local JSON file.
    File(PathBuf),
    /// Remote JSON document fetched over HTTP(S).
    Http(String),
}

impl ManifestLocator {
    /// Interpret a configured locator.
    ///
    /// `http://` and `https://` locators are remote; anything else is a path,
    /// resolved against `base_dir` when relative.
    #[must_use]
    pub fn parse(locator: &str, base_dir: &Path) -> Self {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            Self::Http(locator.to_owned())
        } else {
            Self::File(base_dir.join(locator))
        }
    }
}

impl std::fmt::Display for ManifestLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => f.write_str(url),
        }
    }
}

impl ManifestSource for ManifestLocator {
    async fn fetch(&self) -> Result<Manifest, ManifestError> {
        match self {
            Self::File(path) => read_file(path).await,
            Self::Http(url) => {
                let url = url.clone();
                tokio::task::spawn_blocking(move || fetch_http(&url))
                    .await
                    .map_err(|e| ManifestError::Http(format!("Fetch task failed: {e}")))?
            }
        }
    }
}

async fn read_file(path: &Path) -> Result<Manifest, ManifestError> {
    let payload = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ManifestError::NotFound(path.display().to_string())
        } else {
            ManifestError::Io(e)
        }
    })?;
    Manifest::parse(&payload)
}

// No global timeout: the agent waits as long as the transport allows.
fn fetch_http(url: &str) -> Result<Manifest, ManifestError> {
    let agent: Agent = Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into();

    let response = agent
        .get(url)
        .call()
        .map_err(|e| ManifestError::Http(e.to_string()))?;

    let status = response.status().as_u16();
    if status == 404 {
        return Err(ManifestError::NotFound(url.to_owned()));
    }
    if status >= 400 {
        return Err(ManifestError::Status {
            url: url.to_owned(),
            status,
        });
    }

    let mut body = response.into_body();
    let payload = body
        .read_to_vec()
        .map_err(|e| ManifestError::Http(format!("Failed to read response: {e}")))?;
    Manifest::parse(&payload)
}
