// ABOUTME: Unified error handling for the weekly planning pipeline
// ABOUTME: Error codes, AppError with convenience constructors, and AppResult alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Remy Nutrition Intelligence

//! # Unified Error Handling
//!
//! Central error types for the planner. Two tiers of failure exist at
//! runtime: fatal validation errors (missing required fields, malformed
//! schedule) which halt the run, and degraded conditions which are recorded
//! in the run log and never surface as an `AppError` at all. Everything that
//! crosses a `Result` boundary in this crate is an [`AppError`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Input value failed validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A required document field is absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField,
    /// Value present but outside its valid domain
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange,
    /// Configuration constants failed their own validation
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// An external collaborator (recipe source, resolver, delivery) failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// Filesystem read/write failure
    #[serde(rename = "IO_ERROR")]
    IoError,
    /// JSON/CSV encoding or decoding failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Unclassified internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ExternalServiceError => "EXTERNAL_SERVICE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        };
        f.write_str(name)
    }
}

/// Application error carrying a code and a human-readable message
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Machine-readable error classification
    pub code: ErrorCode,
    /// Human-readable message naming the offending field/path where relevant
    pub message: String,
}

impl AppError {
    /// Create a new error with a specific code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invalid input value
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing from an input document; `path` names the field
    pub fn missing_field(document: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!(
                "{} missing required field '{}'",
                document.into(),
                path.into()
            ),
        )
    }

    /// Value outside its documented domain
    pub fn value_out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Configuration validation failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External collaborator failure, tagged with the service name
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Unclassified internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        Self::new(ErrorCode::SerializationError, err.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        Self::new(ErrorCode::InvalidInput, format!("invalid date: {err}"))
    }
}

/// Convenience result type used across the crate
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_document_and_path() {
        let err = AppError::missing_field("user_profile.json", "weight_kg");
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        assert!(err.message.contains("user_profile.json"));
        assert!(err.message.contains("weight_kg"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert_eq!(err.code, ErrorCode::IoError);
    }
}
