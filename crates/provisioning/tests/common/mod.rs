//! In-memory fakes for the port traits.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use provisioning::{
    BuildId, BuildService, BuildServiceError, BuildStatus, BuildSupervisor, CallbackError,
    CallbackReport, CallbackReporter, CallbackRequest, CallbackTransport, ExecutionContext,
    LogicalResourceId, PollSchedule, ProjectName, ProvisioningEvent, RequestId, RequestType,
    StackId,
};

pub const BUILD_ID: &str = "mirror-images:5f0c2d7e-1a2b-4c3d-9e8f-0123456789ab";
pub const LOG_STREAM: &str = "2026/10/19/[$LATEST]0123456789abcdef";

// ---------------------------------------------------------------------------
// Build service
// ---------------------------------------------------------------------------

/// Build service that returns scripted statuses and counts calls.
///
/// Once the script is exhausted every further query reports `IN_PROGRESS`.
pub struct ScriptedBuilds {
    start_error: Option<String>,
    statuses: Mutex<VecDeque<Result<BuildStatus, String>>>,
    pub started: Mutex<Vec<ProjectName>>,
    pub queries: Mutex<Vec<(BuildId, Instant)>>,
}

impl ScriptedBuilds {
    pub fn with_statuses(statuses: impl IntoIterator<Item = BuildStatus>) -> Arc<Self> {
        Self::with_results(statuses.into_iter().map(Ok))
    }

    pub fn with_results(results: impl IntoIterator<Item = Result<BuildStatus, String>>) -> Arc<Self> {
        Arc::new(Self {
            start_error: None,
            statuses: Mutex::new(results.into_iter().collect()),
            started: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn always_running() -> Arc<Self> {
        Self::with_results(Vec::new())
    }

    pub fn failing_to_start(message: &str) -> Arc<Self> {
        Arc::new(Self {
            start_error: Some(message.to_string()),
            statuses: Mutex::new(VecDeque::new()),
            started: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn start_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl BuildService for ScriptedBuilds {
    async fn start_build(&self, project: &ProjectName) -> Result<BuildId, BuildServiceError> {
        self.started.lock().unwrap().push(project.clone());
        match &self.start_error {
            Some(message) => Err(BuildServiceError::StartFailed {
                project: project.clone(),
                message: message.clone(),
            }),
            None => Ok(BuildId::new(BUILD_ID).unwrap()),
        }
    }

    async fn build_status(&self, build: &BuildId) -> Result<BuildStatus, BuildServiceError> {
        self.queries
            .lock()
            .unwrap()
            .push((build.clone(), Instant::now()));
        match self.statuses.lock().unwrap().pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(BuildServiceError::StatusQueryFailed {
                build_id: build.clone(),
                message,
            }),
            None => Ok(BuildStatus::InProgress),
        }
    }
}

// ---------------------------------------------------------------------------
// Callback transport
// ---------------------------------------------------------------------------

/// Records every callback; optionally fails each one at the transport level.
#[derive(Default)]
pub struct RecordingTransport {
    fail: bool,
    pub sent: Mutex<Vec<CallbackRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn reports(&self) -> Vec<CallbackReport> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|r| serde_json::from_str(&r.body).unwrap())
            .collect()
    }

    /// Returns the only report sent, failing the test if there is not exactly one.
    pub fn single_report(&self) -> CallbackReport {
        let mut reports = self.reports();
        assert_eq!(reports.len(), 1, "expected exactly one callback");
        reports.remove(0)
    }
}

#[async_trait]
impl CallbackTransport for RecordingTransport {
    async fn put(&self, request: &CallbackRequest) -> Result<u16, CallbackError> {
        self.sent.lock().unwrap().push(request.clone());
        if self.fail {
            Err(CallbackError::Transport {
                message: "connection refused".to_string(),
            })
        } else {
            Ok(200)
        }
    }
}

// ---------------------------------------------------------------------------
// Execution context
// ---------------------------------------------------------------------------

/// Context whose remaining time counts down on the (paused) tokio clock.
pub struct DeadlineContext {
    deadline: Instant,
}

impl DeadlineContext {
    pub fn with_remaining(remaining: Duration) -> Self {
        Self {
            deadline: Instant::now() + remaining,
        }
    }
}

impl ExecutionContext for DeadlineContext {
    fn log_stream_name(&self) -> &str {
        LOG_STREAM
    }

    fn remaining_time(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn event(request_type: RequestType) -> ProvisioningEvent {
    ProvisioningEvent {
        request_type,
        response_url: "https://cloudformation-custom-resource-response.example/put?sig=1".into(),
        stack_id: StackId::new("arn:aws:cloudformation:eu-west-1:123456789012:stack/app/1").unwrap(),
        request_id: RequestId::new("d1f4c3a2-0000-4000-8000-000000000001").unwrap(),
        logical_resource_id: LogicalResourceId::new("MirrorImages").unwrap(),
        resource_type: Some("Custom::MirrorImages".into()),
    }
}

pub fn supervisor(
    builds: Arc<ScriptedBuilds>,
    transport: Arc<RecordingTransport>,
    schedule: PollSchedule,
) -> BuildSupervisor {
    BuildSupervisor::new(
        builds,
        CallbackReporter::new(transport),
        ProjectName::new("mirror-images"),
        schedule,
    )
}

/// Fifteen minutes, the host's maximum execution time.
pub fn full_budget() -> DeadlineContext {
    DeadlineContext::with_remaining(Duration::from_secs(900))
}

pub fn message(report: &CallbackReport) -> &str {
    report.data["message"].as_str().unwrap()
}
