// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::request_response::WarningInfo;
use escala::CoreError;
use escala_domain::DomainError;
use escala_persistence::PersistenceError;
use thiserror::Error;

/// Message returned when generation is rejected for unfillable slots.
pub const INCOMPLETE_AVAILABILITY_MESSAGE: &str = "Existem celebracoes sem disponibilidade registrada. Solicite aos membros que atualizem ou utilize a geracao forcada.";

/// Message returned when the reference data cannot be read.
pub const LOAD_FAILED_MESSAGE: &str = "Erro ao carregar dados necessarios";

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A schedule run already exists for the period.
    ///
    /// Retrying does not help; the existing run must be deleted first.
    DuplicateSchedule {
        /// The requested month (1-12).
        month: u8,
        /// The requested year.
        year: i32,
    },
    /// Generation left slots unfilled and incomplete rosters were not allowed.
    IncompleteAvailability {
        /// A human-readable description of the rejection.
        message: String,
        /// Every unfilled slot, in emission order.
        warnings: Vec<WarningInfo>,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Reference data could not be loaded.
    LoadFailed {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSchedule { month, year } => {
                write!(f, "A schedule already exists for {month:02}/{year}")
            }
            Self::IncompleteAvailability { message, warnings } => {
                write!(f, "{message} ({} unfilled slots)", warnings.len())
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::LoadFailed { message } => write!(f, "{LOAD_FAILED_MESSAGE}: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Errors raised while parsing a `YYYY-MM` period parameter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodParseError {
    /// The parameter was absent.
    #[error("Parametro month invalido: missing")]
    Missing,

    /// The parameter did not have the `YYYY-MM` shape.
    #[error("Parametro month invalido: '{value}' (expected YYYY-MM)")]
    Malformed { value: String },

    /// The month or year was out of range.
    #[error("Parametro month invalido: {reason}")]
    OutOfRange { reason: String },
}

impl From<PeriodParseError> for ApiError {
    fn from(err: PeriodParseError) -> Self {
        Self::InvalidInput {
            field: String::from("month"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidMonth { month } => ApiError::InvalidInput {
            field: String::from("month"),
            message: format!("Invalid month: {month}. Must be between 1 and 12"),
        },
        DomainError::InvalidYear { year } => ApiError::InvalidInput {
            field: String::from("year"),
            message: format!("Invalid year: {year}. Must be between 1 and 9999"),
        },
        DomainError::InvalidPeriodFormat(value) => ApiError::InvalidInput {
            field: String::from("month"),
            message: format!("Invalid period '{value}'. Expected format YYYY-MM"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
        err @ (DomainError::InvalidTimestamp { .. } | DomainError::InvalidRunStatus(_)) => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
        DomainError::ScheduleAlreadyPublished { schedule_run_id } => {
            ApiError::DomainRuleViolation {
                rule: String::from("schedule_already_published"),
                message: format!("Schedule run {schedule_run_id} is already published"),
            }
        }
        DomainError::PublishedScheduleImmutable { schedule_run_id } => {
            ApiError::DomainRuleViolation {
                rule: String::from("published_schedule_immutable"),
                message: format!(
                    "Schedule run {schedule_run_id} is published and cannot be regenerated"
                ),
            }
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// `resource_type` names what a `NotFound` refers to.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::DuplicatePeriod { month, year } => {
            ApiError::DuplicateSchedule { month, year }
        }
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message,
        },
        PersistenceError::ConstraintViolation(message) => ApiError::InvalidInput {
            field: resource_type.to_lowercase(),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

/// Wraps a persistence failure during the reference-data load.
#[must_use]
pub fn load_failed(err: &PersistenceError) -> ApiError {
    ApiError::LoadFailed {
        message: err.to_string(),
    }
}
