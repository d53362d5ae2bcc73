//! The build supervisor state machine.
//!
//! ```text
//!                 ┌──────────────┐
//!   non-create ──►│ report OK    │──► success
//!                 └──────────────┘
//!                 ┌──────────────┐   error   ┌───────────────┐
//!   create ──────►│ trigger      │──────────►│ report FAILED │──► error
//!                 └──────┬───────┘           └───────────────┘
//!                        ▼
//!                 ┌──────────────┐  remaining < margin
//!            ┌───►│ check time   │─────────────────────────────► timeout
//!            │    └──────┬───────┘
//!            │           ▼
//!            │    ┌──────────────┐  SUCCEEDED ─────────────────► success
//!            │    │ query status │  FAILED/FAULT/STOPPED/
//!            │    └──────┬───────┘  TIMED_OUT ─────────────────► build_failed
//!            │           ▼
//!            └─── sleep until next poll (while under max wait) ► timeout
//! ```
//!
//! Every path produces one [`Verdict`], and the verdict is reported exactly
//! once at the end of [`BuildSupervisor::handle`].

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::ports::{BuildService, ExecutionContext};
use crate::{
    message_payload, BuildId, BuildStatus, CallbackReporter, CallbackStatus, InvocationOutcome,
    PollSchedule, ProjectName, ProvisioningEvent, ReportOptions, RequestType, SupervisorError,
};

/// The single report an invocation ends with.
#[derive(Debug, Clone, PartialEq)]
struct Verdict {
    outcome: InvocationOutcome,
    status: CallbackStatus,
    data: Map<String, Value>,
}

impl Verdict {
    fn new(outcome: InvocationOutcome, status: CallbackStatus, message: String) -> Self {
        Self {
            outcome,
            status,
            data: message_payload(message),
        }
    }

    fn no_action() -> Self {
        Self::new(
            InvocationOutcome::Success,
            CallbackStatus::Success,
            "No action required".to_string(),
        )
    }

    fn succeeded(build: &BuildId) -> Self {
        Self::new(
            InvocationOutcome::Success,
            CallbackStatus::Success,
            format!("CodeBuild project completed successfully. Build ID: {build}"),
        )
    }

    fn build_failed(status: &BuildStatus, build: &BuildId) -> Self {
        Self::new(
            InvocationOutcome::BuildFailed,
            CallbackStatus::Failed,
            format!("CodeBuild {status}. Build ID: {build}. Check CloudWatch logs."),
        )
    }

    fn timeout_imminent(build: &BuildId) -> Self {
        Self::new(
            InvocationOutcome::Timeout,
            CallbackStatus::Failed,
            format!(
                "Lambda timeout approaching. Build {build} still running. Please check CodeBuild console."
            ),
        )
    }

    fn budget_exhausted(schedule: &PollSchedule, build: &BuildId) -> Self {
        Self::new(
            InvocationOutcome::Timeout,
            CallbackStatus::Failed,
            format!(
                "CodeBuild did not complete within {}s. Build ID: {build}",
                schedule.max_wait().as_secs()
            ),
        )
    }

    fn error(err: &SupervisorError) -> Self {
        Self::new(
            InvocationOutcome::Error,
            CallbackStatus::Failed,
            format!("Error: {err}"),
        )
    }
}

/// Triggers one build per create event and supervises it to a terminal state.
///
/// Built once at cold start; [`handle`](Self::handle) is called per invocation.
pub struct BuildSupervisor {
    builds: Arc<dyn BuildService>,
    reporter: CallbackReporter,
    project: Option<ProjectName>,
    schedule: PollSchedule,
}

impl BuildSupervisor {
    /// Creates a supervisor.
    ///
    /// `project` may be `None`; create events then fail with
    /// [`SupervisorError::MissingProject`] while other events still succeed.
    pub fn new(
        builds: Arc<dyn BuildService>,
        reporter: CallbackReporter,
        project: Option<ProjectName>,
        schedule: PollSchedule,
    ) -> Self {
        Self {
            builds,
            reporter,
            project,
            schedule,
        }
    }

    /// Handles one provisioning event and reports its outcome exactly once.
    #[tracing::instrument(
        name = "provisioning_request",
        skip_all,
        fields(
            request_type = %event.request_type,
            request_id = %event.request_id,
            stack_id = %event.stack_id,
            logical_resource_id = %event.logical_resource_id,
            resource_type = event.resource_type.as_deref().unwrap_or_default(),
        )
    )]
    pub async fn handle(
        &self,
        event: &ProvisioningEvent,
        context: &dyn ExecutionContext,
    ) -> InvocationOutcome {
        let verdict = match event.request_type {
            RequestType::Create => match self.supervise_build(context).await {
                Ok(verdict) => verdict,
                Err(e) => {
                    error!(error = %e, "Build supervision failed");
                    Verdict::error(&e)
                }
            },
            _ => {
                info!("Nothing to do for this request type");
                Verdict::no_action()
            }
        };

        let delivery = self
            .reporter
            .report(
                event,
                context,
                verdict.status,
                verdict.data,
                ReportOptions::default(),
            )
            .await;
        if !delivery.is_delivered() {
            warn!("Orchestrator was not notified; the outcome is only in these logs");
        }

        info!(outcome = %verdict.outcome, "Invocation finished");
        verdict.outcome
    }

    async fn supervise_build(
        &self,
        context: &dyn ExecutionContext,
    ) -> Result<Verdict, SupervisorError> {
        let project = self.project.as_ref().ok_or(SupervisorError::MissingProject)?;

        info!(project = %project, "Starting build");
        let build = self.builds.start_build(project).await?;
        info!(build_id = %build, "Build started; waiting for it to complete");

        let started = Instant::now();
        let give_up_at = started + self.schedule.max_wait();
        let mut next_poll = started;

        while Instant::now() < give_up_at {
            let remaining = context.remaining_time();
            if remaining < self.schedule.safety_margin() {
                warn!(
                    build_id = %build,
                    remaining_ms = remaining.as_millis() as u64,
                    "Execution deadline approaching with build still running"
                );
                return Ok(Verdict::timeout_imminent(&build));
            }

            let status = self.builds.build_status(&build).await?;
            let terminal = status.is_terminal();
            info!(
                build_id = %build,
                status = %status,
                terminal,
                elapsed_secs = started.elapsed().as_secs(),
                "Polled build status"
            );

            if terminal {
                if status == BuildStatus::Succeeded {
                    info!(build_id = %build, "Build completed successfully");
                    return Ok(Verdict::succeeded(&build));
                }
                warn!(build_id = %build, status = %status, "Build failed");
                return Ok(Verdict::build_failed(&status, &build));
            }

            next_poll += self.schedule.interval();
            tokio::time::sleep_until(next_poll).await;
        }

        warn!(build_id = %build, "Poll budget exhausted without a terminal build status");
        Ok(Verdict::budget_exhausted(&self.schedule, &build))
    }
}
