//! Port traits implemented by infrastructure crates.
//!
//! The domain defines *what* it needs from the outside world here; the
//! `codebuild` crate supplies a [`BuildService`], the `callback` crate a
//! [`CallbackTransport`], and the `handler` binary an [`ExecutionContext`].

use std::time::Duration;

use async_trait::async_trait;

use crate::{BuildId, BuildServiceError, BuildStatus, CallbackError, ProjectName};

/// The build-triggering service.
///
/// Implementations must be safe to share across invocations; one instance is
/// built at cold start and reused for the lifetime of the process.
#[async_trait]
pub trait BuildService: Send + Sync {
    /// Starts a build of `project` and returns its identifier.
    async fn start_build(&self, project: &ProjectName) -> Result<BuildId, BuildServiceError>;

    /// Returns the current status of `build`.
    async fn build_status(&self, build: &BuildId) -> Result<BuildStatus, BuildServiceError>;
}

/// A fully-formed callback request, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    /// Destination for the PUT.
    pub url: String,
    /// Serialised [`crate::CallbackReport`].
    pub body: String,
}

impl CallbackRequest {
    /// Byte length of the body, sent as `content-length`.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

/// Delivers a callback body to its URL with a single HTTP PUT.
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    /// Sends `request` and returns the HTTP status code of the response.
    ///
    /// A non-2xx status is still `Ok`; only transport failures are errors.
    async fn put(&self, request: &CallbackRequest) -> Result<u16, CallbackError>;
}

/// Host-provided view of the current invocation.
pub trait ExecutionContext: Send + Sync {
    /// Name of the log stream this invocation writes to.
    fn log_stream_name(&self) -> &str;

    /// Time left before the host forcibly terminates the invocation.
    fn remaining_time(&self) -> Duration;
}
