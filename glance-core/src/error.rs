//! Error types for Glance aggregation
//!
//! Exactly one typed failure escapes the aggregator for upstream trouble:
//! [`AggregateError::DependencyUnavailable`], raised only when the critical
//! dependency fails with no stale fallback. Every other upstream failure is
//! absorbed into the degraded-response path and reported through
//! `DashboardMetadata`, not through an error.

use crate::Dependency;
use std::error::Error;
use thiserror::Error;

/// Opaque failure from an upstream gateway.
///
/// Gateways signal failure, not typed degradation; the degrade-or-fail
/// policy lives entirely in the aggregator. "Profile not found" is a
/// business state, not a `GatewayError` - the profile gateway returns
/// `Ok(None)` for it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl GatewayError {
    /// Create a gateway error from a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a gateway error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result alias for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures the aggregation service raises to its caller.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Caller identity missing or empty after trimming. Never retried.
    #[error("user id is required")]
    MissingUserId,

    /// A required collaborator was never supplied. A deployment defect,
    /// not a runtime condition.
    #[error("required component not configured: {component}")]
    NotConfigured { component: &'static str },

    /// The critical dependency failed and no stale fallback existed.
    #[error("dependency {dependency} unavailable")]
    DependencyUnavailable {
        dependency: Dependency,
        #[source]
        source: GatewayError,
    },
}

impl AggregateError {
    /// True for caller-input failures (map to a bad-request response).
    pub fn is_input_error(&self) -> bool {
        matches!(self, AggregateError::MissingUserId)
    }

    /// True for upstream-unavailability failures (map to a
    /// temporarily-unavailable response).
    pub fn is_dependency_unavailable(&self) -> bool {
        matches!(self, AggregateError::DependencyUnavailable { .. })
    }

    /// The dependency that caused this error, if any.
    pub fn dependency(&self) -> Option<Dependency> {
        match self {
            AggregateError::DependencyUnavailable { dependency, .. } => Some(*dependency),
            _ => None,
        }
    }
}

/// Result alias for aggregation operations.
pub type AggregateResult<T> = Result<T, AggregateError>;
