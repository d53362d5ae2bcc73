//! Error types for the build trigger domain.
//!
//! [`BuildServiceError`] and [`CallbackError`] are produced by the
//! infrastructure adapters behind the port traits in [`crate::ports`].
//! [`SupervisorError`] is what the supervisor's create path can fail with; it
//! never escapes the supervisor, which converts it into a FAILED callback.

use thiserror::Error;

use crate::{BuildId, ProjectName};

// ---------------------------------------------------------------------------
// Build service errors
// ---------------------------------------------------------------------------

/// Failures talking to the build-triggering service.
#[derive(Debug, Error)]
pub enum BuildServiceError {
    /// The start-build request was rejected or could not be sent.
    #[error("failed to start build for project '{project}': {message}")]
    StartFailed {
        /// Project the build was requested for.
        project: ProjectName,
        /// Service-provided description of the failure.
        message: String,
    },

    /// The service accepted the request but returned no build identifier.
    #[error("build service returned no build identifier for project '{project}'")]
    MissingBuildId {
        /// Project the build was requested for.
        project: ProjectName,
    },

    /// The status query could not be sent or was rejected.
    #[error("failed to query status of build {build_id}: {message}")]
    StatusQueryFailed {
        /// Build whose status was requested.
        build_id: BuildId,
        /// Service-provided description of the failure.
        message: String,
    },

    /// The status query succeeded but did not include the requested build.
    #[error("build {build_id} was not found")]
    BuildNotFound {
        /// Build whose status was requested.
        build_id: BuildId,
    },
}

// ---------------------------------------------------------------------------
// Callback errors
// ---------------------------------------------------------------------------

/// Failures delivering a callback report.
///
/// These are never propagated past [`crate::CallbackReporter`]; they are
/// logged and folded into [`crate::Delivery::Failed`].
#[derive(Debug, Error)]
pub enum CallbackError {
    /// The report could not be serialised.
    #[error("failed to serialise callback report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request could not be completed (DNS, connect, TLS, timeout).
    #[error("callback transport failed: {message}")]
    Transport {
        /// Transport-level description of the failure.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Supervisor errors
// ---------------------------------------------------------------------------

/// Failures on the supervisor's create path.
///
/// Each one is reported as a FAILED callback whose message is
/// `Error: <display of this error>`.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// No build project is configured, so there is nothing to start.
    #[error("no build project configured (set PROJECT_NAME)")]
    MissingProject,

    /// The build service failed while triggering or polling.
    #[error(transparent)]
    BuildService(#[from] BuildServiceError),
}
