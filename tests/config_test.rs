use order_links::*;
use std::io::Write;

#[test]
fn test_defaults() {
    let config = PipelineConfig::default();

    assert_eq!(config.query, DEFAULT_QUERY);
    assert_eq!(config.policy, FailurePolicy::SkipAndContinue);
    assert_eq!(config.marker, GreetingMarker::new("div", "greeting"));
    assert_eq!(config.workers, 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml() {
    let config = PipelineConfig::from_toml_str(
        r#"
        query = "from:orders@shop.example newer_than:30d"
        policy = "abort-on-first-failure"
        workers = 4

        [marker]
        class = "salutation"
        "#,
    )
    .unwrap();

    assert_eq!(config.query, "from:orders@shop.example newer_than:30d");
    assert_eq!(config.policy, FailurePolicy::AbortOnFirstFailure);
    assert_eq!(config.workers, 4);
    assert_eq!(config.marker, GreetingMarker::new("div", "salutation"));
}

#[test]
fn test_empty_toml_is_default() {
    assert_eq!(
        PipelineConfig::from_toml_str("").unwrap(),
        PipelineConfig::default()
    );
}

#[test]
fn test_invalid_values_rejected() {
    assert!(matches!(
        PipelineConfig::from_toml_str("workers = 0"),
        Err(ExtractError::Config(_))
    ));
    assert!(PipelineConfig::from_toml_str("policy = \"retry\"").is_err());
    assert!(PipelineConfig::from_toml_str("[marker]\nclass = \"a b\"").is_err());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "policy = \"skip-and-continue\"").unwrap();

    let config = PipelineConfig::load(file.path()).unwrap();

    assert_eq!(config.policy, FailurePolicy::SkipAndContinue);
    assert!(PipelineConfig::load("/nonexistent/order-links.toml").is_err());
}

#[test]
fn test_pipeline_uses_configured_marker() {
    let pipeline = Pipeline::new(PipelineConfig {
        marker: GreetingMarker::new("p", "hello"),
        ..PipelineConfig::default()
    })
    .unwrap();
    assert_eq!(pipeline.config().marker.class, "hello");

    assert!(
        Pipeline::new(PipelineConfig {
            workers: 0,
            ..PipelineConfig::default()
        })
        .is_err()
    );
}
