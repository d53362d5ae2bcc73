//! Shared value types for the build trigger domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! the structure of the provisioning protocol: the incoming event, the build
//! status vocabulary, the callback report, and the invocation outcome.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::{LogicalResourceId, RequestId, StackId};

// ---------------------------------------------------------------------------
// Incoming event
// ---------------------------------------------------------------------------

/// The lifecycle action the orchestrator is requesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// The resource is being created; this is the only action that starts a build.
    Create,
    /// The resource's properties changed.
    Update,
    /// The resource is being removed.
    Delete,
    /// Any request type this handler does not recognise.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Other => "Other",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------

/// The provisioning request that triggered this invocation.
///
/// Only the fields the handler acts on are modelled. Everything else the
/// orchestrator sends (`ServiceToken`, `ResourceProperties`, ...) is ignored
/// during deserialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningEvent {
    /// Which lifecycle action is requested.
    pub request_type: RequestType,

    /// Pre-signed URL the final [`CallbackReport`] is PUT to.
    #[serde(rename = "ResponseURL")]
    pub response_url: String,

    /// Correlation identifier echoed in the callback.
    pub stack_id: StackId,

    /// Correlation identifier echoed in the callback.
    pub request_id: RequestId,

    /// Correlation identifier echoed in the callback.
    pub logical_resource_id: LogicalResourceId,

    /// Resource type declared in the template (e.g. `"Custom::MirrorImages"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Build status
// ---------------------------------------------------------------------------

/// Status of a triggered build as reported by the build service.
///
/// Polled on every iteration and never cached between iterations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    /// The build is queued or running.
    InProgress,
    /// The build finished successfully.
    Succeeded,
    /// The build finished with a failing phase.
    Failed,
    /// The build service itself faulted.
    Fault,
    /// The build was stopped by an operator.
    Stopped,
    /// The build exceeded its own timeout.
    TimedOut,
    /// A status value this handler does not know. Treated as non-terminal.
    Other(String),
}

impl BuildStatus {
    /// Parses the service's wire value (e.g. `"TIMED_OUT"`).
    pub fn from_wire(value: &str) -> Self {
        match value {
            "IN_PROGRESS" => Self::InProgress,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            "FAULT" => Self::Fault,
            "STOPPED" => Self::Stopped,
            "TIMED_OUT" => Self::TimedOut,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the service's wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Fault => "FAULT",
            Self::Stopped => "STOPPED",
            Self::TimedOut => "TIMED_OUT",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` if the build ended without succeeding.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Fault | Self::Stopped | Self::TimedOut)
    }

    /// Returns `true` if the build will not transition any further.
    pub fn is_terminal(&self) -> bool {
        *self == Self::Succeeded || self.is_failure()
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Callback report
// ---------------------------------------------------------------------------

/// The outcome communicated to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallbackStatus {
    /// Serialised as `"SUCCESS"`.
    Success,
    /// Serialised as `"FAILED"`.
    Failed,
}

// ---------------------------------------------------------------------------

/// The body PUT to the event's `ResponseURL`.
///
/// Field declaration order is the serialised order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackReport {
    /// Overall outcome.
    pub status: CallbackStatus,

    /// Human-readable explanation shown in the orchestrator's event log.
    pub reason: String,

    /// Identifier recorded for the provisioned resource.
    ///
    /// A plain string because the default (the log stream name) is supplied
    /// by the host and is not validated.
    pub physical_resource_id: String,

    /// Copied verbatim from [`ProvisioningEvent::stack_id`].
    pub stack_id: StackId,

    /// Copied verbatim from [`ProvisioningEvent::request_id`].
    pub request_id: RequestId,

    /// Copied verbatim from [`ProvisioningEvent::logical_resource_id`].
    pub logical_resource_id: LogicalResourceId,

    /// Asks the orchestrator to mask `Data` in its console output.
    pub no_echo: bool,

    /// Free-form payload, typically `{"message": "..."}`.
    pub data: Map<String, Value>,
}

/// Builds the conventional `{"message": <message>}` data payload.
pub fn message_payload(message: impl Into<String>) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("message".to_string(), Value::String(message.into()));
    data
}

// ---------------------------------------------------------------------------
// Invocation outcome
// ---------------------------------------------------------------------------

/// Terminal status returned from the handler to the host runtime.
///
/// Informational only: the orchestrator learns the result from the callback,
/// not from this value. Serialises as `{"status": <code>, "message": <text>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvocationOutcome {
    /// Build succeeded, or nothing needed doing.
    Success,
    /// The execution budget or the poll budget ran out with the build still running.
    Timeout,
    /// The build reached a failing terminal status.
    BuildFailed,
    /// Triggering or polling raised an error.
    Error,
}

impl InvocationOutcome {
    /// HTTP-style status code: `200` for success, `500` otherwise.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::Timeout | Self::BuildFailed | Self::Error => 500,
        }
    }

    /// Short machine-readable outcome label.
    pub fn message(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Timeout => "timeout",
            Self::BuildFailed => "build_failed",
            Self::Error => "error",
        }
    }
}

impl Serialize for InvocationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InvocationOutcome", 2)?;
        state.serialize_field("status", &self.status_code())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

impl std::fmt::Display for InvocationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status_code(), self.message())
    }
}
