//! Error types and handling for `WeatherNow`

use thiserror::Error;

/// Main error type for the `WeatherNow` application
#[derive(Error, Debug)]
pub enum WeatherNowError {
    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// No data found for the request (unknown city, no forecast coverage)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// An upstream provider failed or returned a non-success status
    #[error("Upstream error: {message}")]
    Upstream { message: String },
}

impl WeatherNowError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherNowError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherNowError::NotFound { message } => message.clone(),
            WeatherNowError::Upstream { .. } => {
                "Unable to reach the weather services. Please try again later.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let validation_err = WeatherNowError::validation("city is required");
        assert!(matches!(validation_err, WeatherNowError::Validation { .. }));

        let not_found_err = WeatherNowError::not_found("no locations found");
        assert!(matches!(not_found_err, WeatherNowError::NotFound { .. }));

        let upstream_err = WeatherNowError::upstream("connection failed");
        assert!(matches!(upstream_err, WeatherNowError::Upstream { .. }));
    }

    #[test]
    fn test_user_messages() {
        let validation_err = WeatherNowError::validation("city is required");
        assert!(validation_err.user_message().contains("city is required"));

        let not_found_err = WeatherNowError::not_found("No locations found for 'Zzzzznotreal'");
        assert!(not_found_err.user_message().contains("Zzzzznotreal"));

        let upstream_err = WeatherNowError::upstream("timeout");
        assert!(upstream_err.user_message().contains("Unable to reach"));
    }
}
