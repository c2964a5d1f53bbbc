//! Tests for configuration parsing.

#[cfg(test)]
mod tests {
    use crate::config::MigrationControlConfig;
    use std::time::Duration;

    #[test]
    fn test_config_default() {
        let config = MigrationControlConfig::default();
        assert_eq!(config.targets, vec!["python", "php"]);
        assert_eq!(config.gateway_url, "http://localhost:8082");
        assert_eq!(config.arbiter_url, "http://localhost:5000");
        assert_eq!(config.upstream_timeout(), Duration::from_secs(3));
        assert_eq!(config.traffic_interval(), Duration::from_secs(1));
        assert!(config.push_weights_to_gateway);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_applies_defaults() {
        let yaml = r#"
gateway_url: "http://gateway:8082"
targets: ["python", "php", "java"]
"#;
        let config: MigrationControlConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.gateway_url, "http://gateway:8082");
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.arbiter_url, "http://localhost:5000"); // default
        assert_eq!(config.traffic_interval_ms, 1_000); // default
    }

    #[test]
    fn test_config_reject_unknown_fields() {
        let yaml = r#"
gateway_url: "http://gateway:8082"
redis_host: "redis"
"#;
        let result: Result<MigrationControlConfig, _> = serde_saphyr::from_str(yaml);
        assert!(
            result.is_err(),
            "Config should reject unknown fields due to deny_unknown_fields"
        );
    }

    #[test]
    fn test_validate_rejects_empty_targets() {
        let config = MigrationControlConfig {
            targets: vec![],
            ..MigrationControlConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_targets() {
        let config = MigrationControlConfig {
            targets: vec!["php".to_owned(), "php".to_owned()],
            ..MigrationControlConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("twice"));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = MigrationControlConfig {
            arbiter_url: "not a url".to_owned(),
            ..MigrationControlConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("arbiter_url"));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = MigrationControlConfig {
            traffic_interval_ms: 0,
            ..MigrationControlConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
