//! Custom-resource callback transport.
//!
//! Implements the [`provisioning::CallbackTransport`] trait as a single HTTP
//! PUT to the pre-signed `ResponseURL` from the provisioning event.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP client configuration and header formatting live
//! here. The [`provisioning`] crate sees only [`provisioning::CallbackTransport`].
//!
//! ## Wire format
//!
//! The pre-signed URL is signed for an empty `content-type`, so the header is
//! sent with an empty value. `content-length` is the byte length of the body.

use std::time::Duration;

use async_trait::async_trait;
use provisioning::{CallbackError, CallbackRequest, CallbackTransport};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

/// Sends callback reports with a shared [`reqwest::Client`].
///
/// Construct once per process; the client pools connections across
/// invocations.
#[derive(Debug, Clone)]
pub struct HttpCallbackTransport {
    client: Client,
}

impl HttpCallbackTransport {
    /// Creates a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, CallbackError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CallbackError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Creates a transport over an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CallbackTransport for HttpCallbackTransport {
    async fn put(&self, request: &CallbackRequest) -> Result<u16, CallbackError> {
        let response = self
            .client
            .put(&request.url)
            .header(CONTENT_TYPE, "")
            .header(CONTENT_LENGTH, request.content_length())
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| CallbackError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        debug!(status = %status, "Callback endpoint responded");
        Ok(status.as_u16())
    }
}
