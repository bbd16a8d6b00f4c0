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
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_cors(config, &mut result);
        Self::validate_executor(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_cors(config: &Config, result: &mut ValidationResult) {
        let cors = &config.cors;

        if cors.allowed_origins.is_empty() {
            result.add_error(ValidationError::new(
                "cors.allowed_origins",
                "At least one origin is required (use \"*\" to allow any)",
            ));
            return;
        }

        if cors.allows_any_origin() {
            if cors.allowed_origins.len() > 1 {
                result.add_error(ValidationError::new(
                    "cors.allowed_origins",
                    "\"*\" cannot be combined with explicit origins",
                ));
            }
            if cors.allow_credentials {
                result.add_error(ValidationError::new(
                    "cors.allow_credentials",
                    "Credentials cannot be allowed together with the \"*\" origin",
                ));
            }
            result.add_warning(ValidationWarning::new(
                "cors.allowed_origins",
                "Any origin is allowed; list explicit origins for production deployments",
            ));
            return;
        }

        for (i, origin) in cors.allowed_origins.iter().enumerate() {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                result.add_error(ValidationError::new(
                    format!("cors.allowed_origins[{}]", i),
                    format!("Origin must start with http:// or https://: {}", origin),
                ));
            } else if origin.ends_with('/') {
                result.add_error(ValidationError::new(
                    format!("cors.allowed_origins[{}]", i),
                    format!("Origin must not end with a slash: {}", origin),
                ));
            }
        }
    }

    fn validate_executor(config: &Config, result: &mut ValidationResult) {
        if config.executor.max_workers == 0 {
            result.add_error(ValidationError::new(
                "executor.max_workers",
                "max_workers must be greater than 0",
            ));
        }

        if config.executor.max_workers > 256 {
            result.add_warning(ValidationWarning::new(
                "executor.max_workers",
                "max_workers is very high (>256)",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        if config.logging.level.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.level",
                "Log level cannot be empty",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
