//! Tests for layered service configuration.

use chorus_server::{ChorusConfig, ServerSettings, WorkerPool};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;

#[test]
fn test_empty_toml_yields_defaults() {
    let config = ChorusConfig::from_toml_str("").expect("empty config is valid");

    assert_eq!(config, ChorusConfig::default());
    assert_eq!(config.server.bind_address(), "0.0.0.0:8000");
    assert_eq!(config.server.max_concurrent, 4);
    assert_eq!(config.server.queue_depth, 32);
    assert_eq!(config.server.request_timeout(), Duration::from_secs(300));
    assert_eq!(*config.generation.max_length(), 100);
    assert_eq!(*config.registry.seed(), 42);
    assert_eq!(config.registry.models(), &vec!["gpt2", "distilgpt2"]);
    assert!(*config.huggingface.verify_on_load());
}

#[test]
fn test_sections_override_defaults() {
    let config = ChorusConfig::from_toml_str(
        r#"
        [server]
        host = "127.0.0.1"
        port = 9000
        max_concurrent = 2

        [generation]
        max_length = 50
        temperature = 0.7

        [registry]
        seed = 7
        models = ["gpt2"]

        [huggingface]
        base_url = "http://localhost:8080/models"
        verify_on_load = false
        "#,
    )
    .expect("config parses");

    assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
    assert_eq!(config.server.max_concurrent, 2);
    assert_eq!(config.server.queue_depth, 32);
    assert_eq!(*config.generation.max_length(), 50);
    assert!((*config.generation.temperature() - 0.7).abs() < 1e-6);
    assert_eq!(*config.generation.top_k(), 50);
    assert_eq!(*config.registry.seed(), 7);
    assert_eq!(config.registry.models(), &vec!["gpt2"]);
    assert_eq!(
        config.huggingface.base_url(),
        "http://localhost:8080/models"
    );
    assert!(!*config.huggingface.verify_on_load());
}

#[test]
fn test_zero_workers_rejected() {
    let err = ChorusConfig::from_toml_str("[server]\nmax_concurrent = 0\n").unwrap_err();

    assert!(err.message.contains("max_concurrent"));
}

#[test]
fn test_oversized_pool_rejected() {
    let err = ChorusConfig::from_toml_str("[server]\nqueue_depth = 4000000000000000000\n")
        .unwrap_err();
    assert!(err.message.contains("queue_depth"));

    let toml = format!(
        "[server]\nmax_concurrent = {}\nqueue_depth = {}\n",
        Semaphore::MAX_PERMITS,
        1
    );
    assert!(ChorusConfig::from_toml_str(&toml).is_err());
}

#[test]
fn test_largest_pool_accepted_and_buildable() {
    let toml = format!(
        "[server]\nmax_concurrent = 2\nqueue_depth = {}\n",
        Semaphore::MAX_PERMITS - 2
    );
    let config = ChorusConfig::from_toml_str(&toml).expect("pool fits the permit limit");

    let pool = WorkerPool::new(
        config.server.max_concurrent,
        config.server.queue_depth,
        config.server.request_timeout(),
    );
    assert_eq!(pool.available_workers(), 2);
}

#[test]
fn test_zero_generation_defaults_rejected() {
    let err = ChorusConfig::from_toml_str("[generation]\nmax_length = 0\n").unwrap_err();
    assert!(err.message.contains("generation.max_length"));

    let err =
        ChorusConfig::from_toml_str("[generation]\nnum_return_sequences = 0\n").unwrap_err();
    assert!(err.message.contains("generation.num_return_sequences"));
}

#[test]
fn test_zero_timeout_rejected() {
    let err = ChorusConfig::from_toml_str("[server]\nrequest_timeout_secs = 0\n").unwrap_err();

    assert!(err.message.contains("request_timeout_secs"));
}

#[test]
fn test_blank_model_id_rejected() {
    let err =
        ChorusConfig::from_toml_str("[registry]\nmodels = [\"gpt2\", \"  \"]\n").unwrap_err();

    assert!(err.message.contains("registry.models"));
}

#[test]
fn test_malformed_toml_rejected() {
    assert!(ChorusConfig::from_toml_str("[server\nport = ").is_err());
    assert!(ChorusConfig::from_toml_str("[server]\nport = \"not a port\"\n").is_err());
}

#[test]
fn test_load_from_explicit_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(file, "[server]\nport = 8123\n\n[registry]\nmodels = [\"tiny\"]").unwrap();

    let config = ChorusConfig::load(Some(file.path())).expect("config loads");

    assert_eq!(config.server.port, 8123);
    assert_eq!(config.registry.models(), &vec!["tiny"]);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let result = ChorusConfig::load(Some(Path::new("/nonexistent/chorus-config.toml")));

    assert!(result.is_err());
}

#[test]
fn test_server_settings_helpers() {
    let settings = ServerSettings {
        host: "localhost".to_string(),
        port: 1234,
        request_timeout_secs: 9,
        ..ServerSettings::default()
    };

    assert_eq!(settings.bind_address(), "localhost:1234");
    assert_eq!(settings.request_timeout(), Duration::from_secs(9));
}
