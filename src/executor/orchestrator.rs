//! # Retry/Timeout Orchestrator
//!
//! Wraps an arbitrary unit of asynchronous work with readiness gating, a
//! per-attempt deadline, bounded retries with exponential backoff, and the
//! ledger/registry side effects of each outcome.
//!
//! Each attempt runs as its own spawned task and races a timer. When the timer
//! wins, the task is detached rather than aborted: it may still finish, but its
//! output goes nowhere. Only this module writes to the ledger and the registry,
//! and only after a race is decided, so a late finisher cannot record anything.

use super::types::{ExecutionOptions, ExecutionResult, ResolvedOptions};
use super::ApiExecutor;
use crate::constants::{CallStatus, IntegrationStatus};
use crate::error::{CallError, ExecutionError};
use crate::ledger::CallLogEntry;
use crate::logging::log_api_call;
use crate::registry::check_readiness;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::task::JoinError;
use tracing::debug;

/// Method label used by [`ApiExecutor::execute_api`]
const CUSTOM_METHOD: &str = "CUSTOM";

impl ApiExecutor {
    /// Run `operation` against `integration_id` with gating, timeout and retries.
    ///
    /// `operation` is invoked once per attempt. Every exit path produces an
    /// [`ExecutionResult`]; failures of the unit of work, panics and timeouts
    /// are all folded into its error.
    pub async fn execute<T, E, F, Fut>(
        &self,
        integration_id: &str,
        endpoint: &str,
        method: &str,
        mut operation: F,
        options: ExecutionOptions,
    ) -> ExecutionResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Into<CallError> + Send + 'static,
    {
        let call_started = Instant::now();
        let options = options.resolve(&self.defaults);
        let call = CallContext {
            integration_id,
            endpoint,
            method,
            options: &options,
        };

        if !options.skip_status_check {
            let readiness = check_readiness(self.registry.as_ref(), integration_id);
            if !readiness.is_ready() {
                let message = readiness.message();
                self.record(call.entry(CallStatus::Error).with_error(message.clone()));
                return ExecutionResult::failure(
                    integration_id,
                    ExecutionError::not_ready(integration_id, message),
                    Duration::ZERO,
                    0,
                );
            }
        }

        let mut retry_count: u32 = 0;
        let last_error = loop {
            let attempt_started = Instant::now();
            debug!(
                integration_id = %integration_id,
                endpoint = %endpoint,
                retry_count = retry_count,
                timeout_ms = options.timeout.as_millis() as u64,
                "Starting attempt"
            );

            let error = match race_deadline(operation(), options.timeout).await {
                Ok(data) => {
                    self.record(
                        call.entry(CallStatus::Success)
                            .with_duration(attempt_started.elapsed())
                            .with_retry_count(retry_count),
                    );
                    self.registry
                        .update_status(integration_id, IntegrationStatus::Connected, None);
                    return ExecutionResult::success(
                        integration_id,
                        data,
                        call_started.elapsed(),
                        retry_count,
                    );
                }
                Err(error) => error,
            };

            if retry_count >= options.max_retries {
                break error;
            }

            self.record(
                call.entry(CallStatus::Retry)
                    .with_duration(attempt_started.elapsed())
                    .with_status_code(error.status_code())
                    .with_error(error.to_string())
                    .with_retry_count(retry_count),
            );
            tokio::time::sleep(options.backoff(retry_count)).await;
            retry_count += 1;
        };

        let status = if last_error.is_timeout() {
            CallStatus::Timeout
        } else {
            CallStatus::Error
        };
        let message = last_error.to_string();
        let duration = call_started.elapsed();

        self.record(
            call.entry(status)
                .with_duration(duration)
                .with_status_code(last_error.status_code())
                .with_error(message.clone())
                .with_retry_count(retry_count),
        );
        self.registry
            .update_status(integration_id, IntegrationStatus::Error, Some(&message));

        ExecutionResult::failure(
            integration_id,
            ExecutionError::exhausted(integration_id, last_error),
            duration,
            retry_count,
        )
    }

    /// General form for non-HTTP units of work, labelled by a free-form description
    pub async fn execute_api<T, E, F, Fut>(
        &self,
        integration_id: &str,
        description: &str,
        operation: F,
        options: ExecutionOptions,
    ) -> ExecutionResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Into<CallError> + Send + 'static,
    {
        self.execute(integration_id, description, CUSTOM_METHOD, operation, options)
            .await
    }

    fn record(&self, entry: CallLogEntry) {
        log_api_call(
            &entry.integration_id,
            &entry.endpoint,
            &entry.method,
            entry.status,
            entry.duration,
            entry.retry_count,
            entry.error.as_deref(),
        );
        self.ledger.append(entry);
    }
}

/// Fields shared by every ledger entry of one call
struct CallContext<'a> {
    integration_id: &'a str,
    endpoint: &'a str,
    method: &'a str,
    options: &'a ResolvedOptions,
}

impl CallContext<'_> {
    fn entry(&self, status: CallStatus) -> CallLogEntry {
        CallLogEntry::new(self.integration_id, self.endpoint, self.method, status)
            .with_user_id(self.options.user_id.clone())
            .with_metadata(self.options.metadata.clone())
    }
}

/// Race one attempt against `timeout`; first to settle wins
async fn race_deadline<T, E, Fut>(attempt: Fut, timeout: Duration) -> Result<T, CallError>
where
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<CallError> + Send + 'static,
{
    let handle = tokio::spawn(attempt);

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(Ok(data))) => Ok(data),
        Ok(Ok(Err(error))) => Err(error.into()),
        Ok(Err(join_error)) => Err(CallError::Panicked(join_failure(join_error))),
        // dropping the handle detaches the task
        Err(_) => Err(CallError::Timeout { after: timeout }),
    }
}

fn join_failure(error: JoinError) -> String {
    if error.is_cancelled() {
        return "attempt was cancelled".to_string();
    }

    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
