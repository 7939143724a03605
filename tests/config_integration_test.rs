//! Configuration files driving a working executor

use integration_core::{
    integrations, messages, ApiExecutor, CallError, ConfigManager, ExecutionOptions,
    InMemoryIntegrationRegistry, IntegrationRegistry, IntegrationStatus,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

const GATEWAY_YAML: &str = r#"
execution:
  timeout_ms: 2000
  max_retries: 1
  retry_delay_ms: 10
ledger:
  capacity: 3
integrations:
  - id: paystack
    enabled: true
    configured: true
    status: connected
  - id: facial_recognition
    enabled: true
    configured: false
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test(start_paused = true)]
async fn test_executor_uses_file_defaults() {
    let file = write_config(GATEWAY_YAML);
    let manager = ConfigManager::load_from_file(file.path()).unwrap();
    assert_eq!(manager.source(), Some(file.path()));

    let registry = Arc::new(InMemoryIntegrationRegistry::from_config(manager.config()));
    let executor = ApiExecutor::from_config(&manager, registry.clone()).unwrap();
    assert_eq!(executor.defaults().timeout(), Duration::from_secs(2));
    assert_eq!(executor.ledger().capacity(), 3);

    // max_retries: 1 from the file means two attempts
    let result = executor
        .execute_api(
            integrations::PAYSTACK,
            "list banks",
            || async { Err::<(), _>(CallError::message("bad gateway")) },
            ExecutionOptions::new(),
        )
        .await;
    assert_eq!(result.retry_count, 1);
    assert_eq!(
        registry.get_integration(integrations::PAYSTACK).unwrap().status,
        IntegrationStatus::Error
    );

    let rejected = executor
        .execute_api(
            integrations::FACIAL_RECOGNITION,
            "enroll",
            || async { Ok::<_, CallError>(()) },
            ExecutionOptions::new(),
        )
        .await;
    assert_eq!(rejected.error().unwrap().message, messages::NOT_CONFIGURED);

    // retry + terminal error for paystack, then the rejection
    assert_eq!(executor.api_call_logs(None).len(), 3);
}

#[test]
fn test_invalid_file_is_rejected() {
    let file = write_config("execution:\n  timeout_ms: 0\n");
    let err = ConfigManager::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("timeout_ms"));

    let missing = ConfigManager::load_from_file("/nonexistent/gateway.yaml").unwrap_err();
    assert!(missing.to_string().contains("/nonexistent/gateway.yaml"));
}

#[test]
fn test_shipped_sample_config_is_valid() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/gateway.yaml");
    let manager = ConfigManager::load_from_file(path).unwrap();
    let registry = InMemoryIntegrationRegistry::from_config(manager.config());

    assert_eq!(registry.len(), 8);
    assert!(integration_core::registry::is_integration_ready(
        &registry,
        integrations::PAYSTACK
    ));
    assert!(!integration_core::registry::is_integration_ready(
        &registry,
        integrations::TERMII
    ));
}
