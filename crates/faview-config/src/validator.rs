//! Configuration validation.

use url::Url;

use crate::error::ConfigError;
use crate::schema::{Config, TransportKind};

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

    /// First error as a [`ConfigError`], if any.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next().map(|e| ConfigError::InvalidValue {
            field: e.path,
            message: e.message,
        })
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
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_poll(config, &mut result);
        Self::validate_catalog(config, &mut result);
        Self::validate_annotation(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        Self::check_http_url("browser.endpoint", &config.browser.endpoint, result);
        Self::check_http_url("browser.target_url_prefix", &config.browser.target_url_prefix, result);

        if config.browser.call_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.call_timeout_secs",
                "call_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_poll(config: &Config, result: &mut ValidationResult) {
        if config.poll.interval_ms == 0 {
            result.add_error(ValidationError::new(
                "poll.interval_ms",
                "interval_ms must be greater than 0",
            ));
        } else if config.poll.interval_ms < 250 {
            result.add_warning(ValidationWarning::new(
                "poll.interval_ms",
                "interval_ms is very low (<250), every tick evaluates scripts in the page",
            ));
        }
    }

    fn validate_catalog(config: &Config, result: &mut ValidationResult) {
        if config.catalog.transport != TransportKind::Http {
            return;
        }

        Self::check_http_url("catalog.base_url", &config.catalog.base_url, result);

        match config.catalog.timeout_secs {
            Some(0) => result.add_error(ValidationError::new(
                "catalog.timeout_secs",
                "timeout_secs must be greater than 0 when set",
            )),
            None => result.add_warning(ValidationWarning::new(
                "catalog.timeout_secs",
                "No request timeout: a hung catalog request stalls annotation until the next navigation",
            )),
            Some(_) => {}
        }
    }

    fn validate_annotation(config: &Config, result: &mut ValidationResult) {
        let annotation = &config.annotation;

        if !(1..=6).contains(&annotation.heading_level) {
            result.add_error(ValidationError::new(
                "annotation.heading_level",
                format!("heading_level must be between 1 and 6, got {}", annotation.heading_level),
            ));
        }

        if annotation.section_depth == 0 {
            result.add_error(ValidationError::new(
                "annotation.section_depth",
                "section_depth must be greater than 0",
            ));
        }

        if annotation.link_color.trim().is_empty() {
            result.add_error(ValidationError::new(
                "annotation.link_color",
                "link_color cannot be empty",
            ));
        }

        Self::check_http_url("annotation.artwork_base_url", &annotation.artwork_base_url, result);
    }

    fn check_http_url(path: &str, value: &str, result: &mut ValidationResult) {
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => result.add_error(ValidationError::new(
                path,
                format!("unsupported scheme '{}', expected http or https", url.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(path, format!("invalid URL '{}': {}", value, e))),
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
