//! Callback reporter: formats the fixed-shape report and delivers it once.
//!
//! Delivery is best-effort and never fails the caller: the result is a
//! [`Delivery`] value, not a `Result`.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{error, info};

use crate::ports::{CallbackRequest, CallbackTransport, ExecutionContext};
use crate::{CallbackError, CallbackReport, CallbackStatus, PhysicalResourceId, ProvisioningEvent};

/// Optional overrides for a single report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Replaces the default reason that points at the log stream.
    pub reason: Option<String>,
    /// Replaces the default physical resource id (the log stream name).
    pub physical_resource_id: Option<PhysicalResourceId>,
    /// Sets the report's `NoEcho` flag.
    pub no_echo: bool,
}

/// What happened to a callback delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The endpoint answered. The status code may still be non-2xx.
    Delivered {
        /// HTTP status code of the response.
        status_code: u16,
    },
    /// The request never completed; the failure has already been logged.
    Failed {
        /// Description of the failure.
        reason: String,
    },
}

impl Delivery {
    /// Returns `true` if the endpoint answered.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Sends [`CallbackReport`]s through a [`CallbackTransport`].
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct CallbackReporter {
    transport: Arc<dyn CallbackTransport>,
}

impl CallbackReporter {
    /// Creates a reporter over `transport`.
    pub fn new(transport: Arc<dyn CallbackTransport>) -> Self {
        Self { transport }
    }

    /// Builds the report for `event` without sending it.
    pub fn build_report(
        event: &ProvisioningEvent,
        context: &dyn ExecutionContext,
        status: CallbackStatus,
        data: Map<String, Value>,
        options: ReportOptions,
    ) -> CallbackReport {
        let reason = options.reason.unwrap_or_else(|| {
            format!(
                "See the details in CloudWatch Log Stream: {}",
                context.log_stream_name()
            )
        });
        let physical_resource_id = options
            .physical_resource_id
            .map(|id| id.as_str().to_string())
            .unwrap_or_else(|| context.log_stream_name().to_string());

        CallbackReport {
            status,
            reason,
            physical_resource_id,
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            no_echo: options.no_echo,
            data,
        }
    }

    /// Builds the report and PUTs it to `event.response_url`.
    ///
    /// Never fails: transport and serialisation errors are logged and
    /// returned as [`Delivery::Failed`].
    pub async fn report(
        &self,
        event: &ProvisioningEvent,
        context: &dyn ExecutionContext,
        status: CallbackStatus,
        data: Map<String, Value>,
        options: ReportOptions,
    ) -> Delivery {
        let report = Self::build_report(event, context, status, data, options);

        match self.send(&event.response_url, &report).await {
            Ok(status_code) => {
                info!(status_code, "Callback delivered");
                Delivery::Delivered { status_code }
            }
            Err(e) => {
                error!(error = %e, "Callback delivery failed");
                Delivery::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn send(&self, url: &str, report: &CallbackReport) -> Result<u16, CallbackError> {
        let request = CallbackRequest {
            url: url.to_string(),
            body: serde_json::to_string(report)?,
        };
        info!(
            body = %request.body,
            content_length = request.content_length(),
            "Sending callback"
        );
        self.transport.put(&request).await
    }
}
