use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_bad_url() {
    let mut config = Config::default();
    config.provider.base_url = "not a url".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "provider.base_url"));
}

#[test]
fn test_validate_non_http_scheme() {
    let mut config = Config::default();
    config.provider.base_url = "ftp://example.com/v1".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
}

#[test]
fn test_validate_plain_http_warns() {
    let mut config = Config::default();
    config.provider.base_url = "http://localhost:8080/v1/chat/completions".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "provider.base_url"));
}

#[test]
fn test_validate_zero_max_tokens() {
    let mut config = Config::default();
    config.provider.max_tokens = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "provider.max_tokens"));
}

#[test]
fn test_validate_temperature_range() {
    let mut config = Config::default();
    config.provider.qa_temperature = 2.5;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "provider.qa_temperature"));
}

#[test]
fn test_validate_high_temperature_warning() {
    let mut config = Config::default();
    config.provider.temperature = 1.5;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "provider.temperature"));
}

#[test]
fn test_validate_negative_offset() {
    let mut config = Config::default();
    config.selection.anchor_offset = -1.0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
}

#[test]
fn test_validate_empty_model() {
    let mut config = Config::default();
    config.provider.model = "  ".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "provider.model"));
}
