// crates/respond-broker/src/publish.rs
// ============================================================================
// Module: Respond Report Publishers
// Description: Async publishers that upload a text report and return its URL.
// Purpose: Share the full response listing outside the chat channel.
// Dependencies: async-trait, reqwest, serde_json, time, url
// ============================================================================

//! ## Overview
//! [`TextPublisher`] uploads a report and returns the URL it can be read at.
//! [`HastePublisher`] speaks the hastebin document API, [`PastebinPublisher`]
//! the pastebin post API, and [`DisabledPublisher`] refuses every request.
//! Invariants:
//! - Empty text is rejected before any request is sent.
//! - Redirects are not followed and non-success statuses fail closed.
//! - Response bodies are capped at [`MAX_PUBLISH_RESPONSE_BYTES`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;
use url::Url;
use url::form_urlencoded;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted publisher response body size in bytes.
pub const MAX_PUBLISH_RESPONSE_BYTES: usize = 64 * 1024;
/// Pastebin post endpoint relative to the base URL.
const PASTEBIN_POST_PATH: &str = "api/api_post.php";
/// Pastebin privacy flag for unlisted pastes.
const PASTEBIN_UNLISTED: &str = "1";
/// Prefix pastebin uses for rejected requests (served with status 200).
const PASTEBIN_ERROR_PREFIX: &str = "Bad API request";
/// Prefix of every report title.
const REPORT_TITLE_PREFIX: &str = "Respond List - ";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Publisher failures.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Publishing is turned off in configuration.
    #[error("publishing disabled")]
    Disabled,
    /// The report had no content.
    #[error("nothing to publish")]
    EmptyText,
    /// The publisher was configured with an unusable value.
    #[error("invalid publisher config: {0}")]
    Config(String),
    /// Transport failure or non-success status.
    #[error("publish http error: {0}")]
    Http(String),
    /// The service answered with something other than a document location.
    #[error("publish response invalid: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// SECTION: Publisher Trait
// ============================================================================

/// Uploads report text and returns its public URL.
#[async_trait]
pub trait TextPublisher: Send + Sync {
    /// Publishes `text` under `title` and returns the document URL.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the text is empty or the upload fails.
    async fn publish(&self, title: &str, text: &str) -> Result<String, PublishError>;
}

/// Builds the report title for the given instant.
#[must_use]
pub fn report_title(at: OffsetDateTime) -> String {
    let stamp = at.format(&Rfc3339).unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("{REPORT_TITLE_PREFIX}{stamp}")
}

// ============================================================================
// SECTION: Hastebin
// ============================================================================

/// Hastebin document response.
#[derive(Debug, Deserialize)]
struct HasteDocument {
    /// Document key assigned by the service.
    key: String,
}

/// Publisher for hastebin-compatible services.
#[derive(Debug, Clone)]
pub struct HastePublisher {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client.
    client: Client,
}

impl HastePublisher {
    /// Creates a hastebin publisher.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the base URL or client is invalid.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PublishError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, client: build_client(timeout)? })
    }
}

#[async_trait]
impl TextPublisher for HastePublisher {
    async fn publish(&self, _title: &str, text: &str) -> Result<String, PublishError> {
        ensure_text(text)?;
        let endpoint = format!("{}/documents", self.base_url);
        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(text.to_string())
            .send()
            .await
            .map_err(|err| PublishError::Http(err.to_string()))?;
        let body = read_body(response).await?;
        let document: HasteDocument = serde_json::from_slice(&body)
            .map_err(|err| PublishError::InvalidResponse(err.to_string()))?;
        let key = document.key.trim();
        if key.is_empty() || key.contains('/') {
            return Err(PublishError::InvalidResponse("document key missing".to_string()));
        }
        let location = format!("{}/{key}", self.base_url);
        debug!(url = %location, "published report to hastebin");
        Ok(location)
    }
}

// ============================================================================
// SECTION: Pastebin
// ============================================================================

/// Publisher for the pastebin post API.
#[derive(Debug, Clone)]
pub struct PastebinPublisher {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Developer API key.
    api_key: String,
    /// HTTP client.
    client: Client,
}

impl PastebinPublisher {
    /// Creates a pastebin publisher.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the key is blank or the base URL or
    /// client is invalid.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, PublishError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(PublishError::Config("pastebin api key missing".to_string()));
        }
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            api_key: api_key.to_string(),
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl TextPublisher for PastebinPublisher {
    async fn publish(&self, title: &str, text: &str) -> Result<String, PublishError> {
        ensure_text(text)?;
        let endpoint = format!("{}/{PASTEBIN_POST_PATH}", self.base_url);
        let form = form_urlencoded::Serializer::new(String::new())
            .append_pair("api_dev_key", &self.api_key)
            .append_pair("api_option", "paste")
            .append_pair("api_paste_code", text)
            .append_pair("api_paste_name", title)
            .append_pair("api_paste_private", PASTEBIN_UNLISTED)
            .finish();
        let response = self
            .client
            .post(&endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|err| PublishError::Http(err.to_string()))?;
        let body = read_body(response).await?;
        let location = String::from_utf8(body)
            .map_err(|_| PublishError::InvalidResponse("body must be utf-8".to_string()))?;
        let location = location.trim();
        if location.starts_with(PASTEBIN_ERROR_PREFIX) {
            return Err(PublishError::InvalidResponse(location.to_string()));
        }
        Url::parse(location)
            .map_err(|err| PublishError::InvalidResponse(format!("not a url: {err}")))?;
        debug!(url = %location, "published report to pastebin");
        Ok(location.to_string())
    }
}

// ============================================================================
// SECTION: Disabled
// ============================================================================

/// Publisher used when publishing is turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPublisher;

#[async_trait]
impl TextPublisher for DisabledPublisher {
    async fn publish(&self, _title: &str, text: &str) -> Result<String, PublishError> {
        ensure_text(text)?;
        Err(PublishError::Disabled)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects blank report text.
fn ensure_text(text: &str) -> Result<(), PublishError> {
    if text.trim().is_empty() {
        return Err(PublishError::EmptyText);
    }
    Ok(())
}

/// Validates the base URL and strips any trailing slash.
fn normalize_base_url(base_url: &str) -> Result<String, PublishError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|err| PublishError::Config(format!("invalid base url: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PublishError::Config("base url must use http or https".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Builds an HTTP client with a request timeout and redirects disabled.
fn build_client(timeout: Duration) -> Result<Client, PublishError> {
    Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .redirect(Policy::none())
        .build()
        .map_err(|err| PublishError::Config(format!("http client build failed: {err}")))
}

/// Checks the status and reads a size-capped response body.
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, PublishError> {
    let status = response.status();
    if !status.is_success() {
        return Err(PublishError::Http(format!("http status {}", status.as_u16())));
    }
    if let Some(length) = response.content_length()
        && length > MAX_PUBLISH_RESPONSE_BYTES as u64
    {
        return Err(PublishError::InvalidResponse("response exceeds size limit".to_string()));
    }
    let bytes = response.bytes().await.map_err(|err| PublishError::Http(err.to_string()))?;
    if bytes.len() > MAX_PUBLISH_RESPONSE_BYTES {
        return Err(PublishError::InvalidResponse("response exceeds size limit".to_string()));
    }
    Ok(bytes.to_vec())
}
