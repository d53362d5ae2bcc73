//! AWS CodeBuild adapter.
//!
//! Implements the [`provisioning::BuildService`] trait with
//! [`aws_sdk_codebuild`]: `StartBuild` to trigger and `BatchGetBuilds` to poll.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Credentials, region resolution, SDK retries, and the
//! mapping of SDK shapes onto domain types all live here. The
//! [`provisioning`] crate never sees an SDK type.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_codebuild::error::DisplayErrorContext;
use aws_sdk_codebuild::operation::batch_get_builds::BatchGetBuildsOutput;
use aws_sdk_codebuild::operation::start_build::StartBuildOutput;
use aws_sdk_codebuild::types::{Build, StatusType};
use aws_sdk_codebuild::Client;
use provisioning::{BuildId, BuildService, BuildServiceError, BuildStatus, ProjectName};
use tracing::debug;

/// [`BuildService`] backed by AWS CodeBuild.
#[derive(Debug, Clone)]
pub struct CodeBuildService {
    client: Client,
}

impl CodeBuildService {
    /// Creates a service from the ambient AWS configuration (environment,
    /// execution role, region).
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&config))
    }

    /// Creates a service over an existing SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BuildService for CodeBuildService {
    async fn start_build(&self, project: &ProjectName) -> Result<BuildId, BuildServiceError> {
        let output = self
            .client
            .start_build()
            .project_name(project.as_str())
            .send()
            .await
            .map_err(|e| BuildServiceError::StartFailed {
                project: project.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        started_build_id(project, &output)
    }

    async fn build_status(&self, build: &BuildId) -> Result<BuildStatus, BuildServiceError> {
        let output = self
            .client
            .batch_get_builds()
            .ids(build.as_str())
            .send()
            .await
            .map_err(|e| BuildServiceError::StatusQueryFailed {
                build_id: build.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        status_in(build, &output)
    }
}

/// Extracts the identifier from a `StartBuild` response.
fn started_build_id(
    project: &ProjectName,
    output: &StartBuildOutput,
) -> Result<BuildId, BuildServiceError> {
    output
        .build_value()
        .and_then(Build::id)
        .and_then(BuildId::new)
        .ok_or_else(|| BuildServiceError::MissingBuildId {
            project: project.clone(),
        })
}

/// Picks `build` out of a `BatchGetBuilds` response and maps its status.
fn status_in(
    build: &BuildId,
    output: &BatchGetBuildsOutput,
) -> Result<BuildStatus, BuildServiceError> {
    let found = output
        .builds()
        .iter()
        .find(|b| b.id() == Some(build.as_str()))
        .ok_or_else(|| BuildServiceError::BuildNotFound {
            build_id: build.clone(),
        })?;

    if let Some(phase) = found.current_phase() {
        debug!(build_id = %build, phase, "Current build phase");
    }
    Ok(status_of(found.build_status()))
}

/// Maps the SDK status onto the domain vocabulary.
///
/// CodeBuild omits the status while a build is still being provisioned, so a
/// missing value counts as in progress.
fn status_of(status: Option<&StatusType>) -> BuildStatus {
    status
        .map(|s| BuildStatus::from_wire(s.as_str()))
        .unwrap_or(BuildStatus::InProgress)
}
