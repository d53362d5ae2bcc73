//! Build trigger domain for the provisioning custom-resource handler.
//!
//! On a `Create` provisioning event the [`BuildSupervisor`] starts a build,
//! polls it until it reaches a terminal state or the execution budget runs
//! low, and reports the outcome to the orchestrator's callback URL exactly
//! once through the [`CallbackReporter`]. Every other event is acknowledged
//! with an immediate success report.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate performs no I/O of its
//! own. It defines *what* is needed in [`ports`]; the `codebuild` and
//! `callback` crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`StackId`, `BuildId`, `ProjectName`, etc.) |
//! | [`types`] | Event, build status, callback report, and invocation outcome types |
//! | [`errors`] | Build service, callback, and supervisor error types |
//! | [`ports`] | `BuildService`, `CallbackTransport`, and `ExecutionContext` traits |
//! | [`reporter`] | `CallbackReporter`: best-effort report delivery |
//! | [`schedule`] | `PollSchedule`: interval, budget, and safety margin |
//! | [`supervisor`] | `BuildSupervisor`: the trigger-and-poll state machine |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod reporter;
pub mod schedule;
pub mod supervisor;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{BuildServiceError, CallbackError, SupervisorError};
pub use identifiers::{
    BuildId, EmptyIdentifier, LogicalResourceId, PhysicalResourceId, ProjectName, RequestId,
    StackId,
};
pub use ports::{BuildService, CallbackRequest, CallbackTransport, ExecutionContext};
pub use reporter::{CallbackReporter, Delivery, ReportOptions};
pub use schedule::PollSchedule;
pub use supervisor::BuildSupervisor;
pub use types::{
    message_payload, BuildStatus, CallbackReport, CallbackStatus, InvocationOutcome,
    ProvisioningEvent, RequestType,
};
