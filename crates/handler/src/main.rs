//! Build trigger Lambda entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Wire observability** — install a JSON `tracing-subscriber`. All spans
//!    and events from every crate in the workspace flow through it.
//! 2. **Parse configuration** — read `PROJECT_NAME` and the poll-schedule
//!    overrides from the environment.
//! 3. **Construct infrastructure** — build the `CodeBuildService` and the
//!    `HttpCallbackTransport` once per process so connection pools survive
//!    across warm invocations, and inject them into a `BuildSupervisor`.
//! 4. **Run the Lambda loop** — deserialise each provisioning event, wrap the
//!    invocation context, and return the supervisor's outcome.

mod config;
mod context;
mod telemetry;

use std::sync::Arc;

use callback::HttpCallbackTransport;
use codebuild::CodeBuildService;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use provisioning::{BuildSupervisor, CallbackReporter, InvocationOutcome, ProvisioningEvent};
use tracing::{info, warn};

use crate::config::HandlerConfig;
use crate::context::LambdaExecutionContext;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();

    let config = HandlerConfig::from_env()?;
    match &config.project {
        Some(project) => info!(project = %project, "Configured build project"),
        None => warn!("PROJECT_NAME is not set; create requests will be reported as failed"),
    }

    let transport = HttpCallbackTransport::new(config.callback_timeout)?;
    let builds = CodeBuildService::from_env().await;
    let supervisor = Arc::new(BuildSupervisor::new(
        Arc::new(builds),
        CallbackReporter::new(Arc::new(transport)),
        config.project,
        config.schedule,
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ProvisioningEvent>| {
        let supervisor = Arc::clone(&supervisor);
        async move { handle(&supervisor, event).await }
    }))
    .await
}

async fn handle(
    supervisor: &BuildSupervisor,
    event: LambdaEvent<ProvisioningEvent>,
) -> Result<InvocationOutcome, Error> {
    let (event, context) = event.into_parts();
    let execution = LambdaExecutionContext::new(&context);
    Ok(supervisor.handle(&event, &execution).await)
}
