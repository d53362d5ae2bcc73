//! [`ExecutionContext`] over the Lambda invocation context.

use std::time::{Duration, SystemTime};

use lambda_runtime::Context;
use provisioning::ExecutionContext;

/// Log stream and deadline of the current invocation.
#[derive(Debug, Clone)]
pub struct LambdaExecutionContext {
    log_stream: String,
    deadline: SystemTime,
}

impl LambdaExecutionContext {
    pub fn new(context: &Context) -> Self {
        Self::from_parts(context.env_config.log_stream.clone(), context.deadline())
    }

    pub fn from_parts(log_stream: impl Into<String>, deadline: SystemTime) -> Self {
        Self {
            log_stream: log_stream.into(),
            deadline,
        }
    }
}

impl ExecutionContext for LambdaExecutionContext {
    fn log_stream_name(&self) -> &str {
        &self.log_stream
    }

    fn remaining_time(&self) -> Duration {
        // A deadline already in the past means no time is left.
        self.deadline
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO)
    }
}
