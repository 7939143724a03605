//! # Gated Functions
//!
//! A readiness-checked pass-through: the wrapped function never runs against
//! an integration that is not ready. No retries, no deadline race. Meant for
//! call sites that manage their own retry semantics or call something cheap
//! and idempotent.
//!
//! ```rust
//! use integration_core::executor::{ApiExecutor, GatedOutcome};
//! use integration_core::registry::{InMemoryIntegrationRegistry, IntegrationRecord};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(InMemoryIntegrationRegistry::new());
//! registry.upsert(IntegrationRecord::connected("google_cloud_storage").with_enabled(false));
//! let executor = ApiExecutor::new(registry).unwrap();
//!
//! let upload = executor.create_gated_function(
//!     "google_cloud_storage",
//!     |name: &'static str| async move { Ok::<_, String>(format!("gs://media/{name}")) },
//!     Some("Uploads are paused"),
//! );
//! assert_eq!(
//!     upload.call("banner.png").await,
//!     GatedOutcome::Failure("Uploads are paused".to_string())
//! );
//! # });
//! ```

use super::ApiExecutor;
use crate::constants::IntegrationStatus;
use crate::registry::{check_readiness, IntegrationRegistry};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

/// Result of a gated call: exactly one of payload or message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatedOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> GatedOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, GatedOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            GatedOutcome::Success(value) => Ok(value),
            GatedOutcome::Failure(message) => Err(message),
        }
    }
}

/// A function bound to an integration that checks readiness before every call
pub struct GatedFunction<F> {
    integration_id: String,
    registry: Arc<dyn IntegrationRegistry>,
    func: F,
    fallback_message: Option<String>,
}

impl<F> fmt::Debug for GatedFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatedFunction")
            .field("integration_id", &self.integration_id)
            .field("fallback_message", &self.fallback_message)
            .finish()
    }
}

impl<F> GatedFunction<F> {
    pub fn new(
        integration_id: impl Into<String>,
        registry: Arc<dyn IntegrationRegistry>,
        func: F,
        fallback_message: Option<String>,
    ) -> Self {
        Self {
            integration_id: integration_id.into(),
            registry,
            func,
            fallback_message,
        }
    }

    pub fn integration_id(&self) -> &str {
        &self.integration_id
    }

    /// Invoke the wrapped function if the integration is ready.
    ///
    /// When it is not, returns the fallback message (or the gate's message) without
    /// calling it. A failure of the function marks the integration `error`.
    pub async fn call<A, T, E, Fut>(&self, args: A) -> GatedOutcome<T>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let readiness = check_readiness(self.registry.as_ref(), &self.integration_id);
        if !readiness.is_ready() {
            return GatedOutcome::Failure(
                self.fallback_message
                    .clone()
                    .unwrap_or_else(|| readiness.message()),
            );
        }

        match (self.func)(args).await {
            Ok(value) => GatedOutcome::Success(value),
            Err(error) => {
                let message = error.to_string();
                warn!(
                    integration_id = %self.integration_id,
                    error = %message,
                    "🔴 Gated function failed"
                );
                self.registry.update_status(
                    &self.integration_id,
                    IntegrationStatus::Error,
                    Some(&message),
                );
                GatedOutcome::Failure(message)
            }
        }
    }
}

impl ApiExecutor {
    /// Wrap `func` so it only runs while `integration_id` is ready
    pub fn create_gated_function<F>(
        &self,
        integration_id: &str,
        func: F,
        fallback_message: Option<&str>,
    ) -> GatedFunction<F> {
        GatedFunction::new(
            integration_id,
            Arc::clone(&self.registry),
            func,
            fallback_message.map(str::to_string),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::messages;
    use crate::registry::{InMemoryIntegrationRegistry, IntegrationRecord};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn setup() -> (ApiExecutor, Arc<InMemoryIntegrationRegistry>) {
        let registry = Arc::new(InMemoryIntegrationRegistry::new());
        registry.upsert(IntegrationRecord::connected("google_cloud_storage"));
        registry.upsert(IntegrationRecord::connected("facial_recognition").with_configured(false));
        (ApiExecutor::new(registry.clone()).unwrap(), registry)
    }

    #[tokio::test]
    async fn test_ready_integration_passes_through() {
        let (executor, _registry) = setup();
        let upload = executor.create_gated_function(
            "google_cloud_storage",
            |name: &'static str| async move { Ok::<_, String>(format!("gs://bucket/{name}")) },
            None,
        );

        let outcome = upload.call("avatar.png").await;
        assert_eq!(outcome, GatedOutcome::Success("gs://bucket/avatar.png".to_string()));
        // gated calls are not ledgered
        assert!(executor.api_call_logs(None).is_empty());
    }

    #[tokio::test]
    async fn test_unready_integration_never_calls_function() {
        let (executor, _registry) = setup();
        let calls = Arc::new(AtomicU32::new(0));

        let counter = calls.clone();
        let verify = executor.create_gated_function(
            "facial_recognition",
            move |_: ()| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(true) }
            },
            None,
        );
        assert_eq!(
            verify.call(()).await,
            GatedOutcome::Failure(messages::NOT_CONFIGURED.to_string())
        );

        let with_fallback = executor.create_gated_function(
            "facial_recognition",
            |_: ()| async { Ok::<_, String>(true) },
            Some("Face verification is temporarily unavailable"),
        );
        assert_eq!(
            with_fallback.call(()).await.into_result(),
            Err("Face verification is temporarily unavailable".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_marks_integration_error() {
        let (executor, registry) = setup();
        let upload = executor.create_gated_function(
            "google_cloud_storage",
            |_: ()| async { Err::<(), _>("bucket quota exceeded") },
            None,
        );

        let outcome = upload.call(()).await;
        assert_eq!(outcome, GatedOutcome::Failure("bucket quota exceeded".to_string()));

        let record = registry.get_integration("google_cloud_storage").unwrap();
        assert_eq!(record.status, IntegrationStatus::Error);
        assert_eq!(record.last_error.as_deref(), Some("bucket quota exceeded"));
        assert!(!upload.call(()).await.is_success());
    }
}
