//! Newtype domain identifiers.
//!
//! Every identifier that crosses the handler boundary is a distinct newtype
//! wrapping a `String`. This prevents accidentally interchanging, for example,
//! a [`StackId`] with a [`RequestId`] when copying correlation fields from the
//! incoming event into the callback report.
//!
//! The wire representation is the bare string: serde treats single-field tuple
//! structs transparently, so `{"StackId": "arn:..."}` round-trips unchanged.
//! Deserialisation goes through the same non-empty check as `new()`, so an
//! event carrying `"StackId": ""` is rejected at the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An identifier was given an empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} must not be empty")]
pub struct EmptyIdentifier {
    /// Name of the identifier type that rejected the value.
    pub kind: &'static str,
}

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and a
// TryFrom<String> that serde uses so deserialised values are never empty.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = EmptyIdentifier;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(EmptyIdentifier {
                    kind: stringify!($name),
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Correlation identifiers — assigned by the orchestrator, echoed verbatim
// ---------------------------------------------------------------------------

string_id! {
    /// The ARN of the stack that owns the custom resource.
    StackId
}

string_id! {
    /// Unique identifier of one provisioning request.
    RequestId
}

string_id! {
    /// The template-level name of the custom resource.
    LogicalResourceId
}

string_id! {
    /// The identifier the orchestrator records for the provisioned resource.
    ///
    /// Defaults to the execution context's log stream name when the caller
    /// does not supply one.
    PhysicalResourceId
}

// ---------------------------------------------------------------------------
// Build-service identifiers
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies the build project the triggering service should start.
    ///
    /// Sourced from the `PROJECT_NAME` environment variable.
    ProjectName
}

string_id! {
    /// Opaque identifier of a triggered build (e.g. `"my-project:1b2c..."`).
    ///
    /// Assigned once by the build service; used for every status query of
    /// the same invocation.
    BuildId
}
