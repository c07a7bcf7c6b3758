//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();
        Self::validate_provider(config, &mut result);
        Self::validate_selection(config, &mut result);
        Self::validate_credentials(config, &mut result);
        result
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        let provider = &config.provider;

        match url::Url::parse(&provider.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                if url.scheme() == "http" {
                    result.add_warning(ValidationWarning::new(
                        "provider.base_url",
                        "base_url is not using https, the API key will be sent in clear text",
                    ));
                }
            }
            Ok(_) => result.add_error(ValidationError::new(
                "provider.base_url",
                "base_url must start with http:// or https://",
            )),
            Err(e) => result.add_error(ValidationError::new(
                "provider.base_url",
                format!("Invalid URL: {}", e),
            )),
        }

        if provider.model.trim().is_empty() {
            result.add_error(ValidationError::new("provider.model", "Model cannot be empty"));
        }

        if provider.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "provider.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        for (path, value) in [
            ("provider.temperature", provider.temperature),
            ("provider.qa_temperature", provider.qa_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                result.add_error(ValidationError::new(path, "must be between 0 and 2"));
            }
        }

        if provider.temperature > 1.0 {
            result.add_warning(ValidationWarning::new(
                "provider.temperature",
                "high temperature makes rewrites less faithful to the source text",
            ));
        }

        if provider.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "provider.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_selection(config: &Config, result: &mut ValidationResult) {
        let selection = &config.selection;
        if selection.min_length == 0 {
            result.add_warning(ValidationWarning::new(
                "selection.min_length",
                "min_length is 0, every non-empty selection will open the menu",
            ));
        }
        if selection.anchor_offset < 0.0 || selection.viewport_margin < 0.0 {
            result.add_error(ValidationError::new(
                "selection",
                "anchor_offset and viewport_margin cannot be negative",
            ));
        }
    }

    fn validate_credentials(config: &Config, result: &mut ValidationResult) {
        if config.credentials.env_var.trim().is_empty() {
            result.add_warning(ValidationWarning::new(
                "credentials.env_var",
                "no environment fallback for the API key",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
