//! Domain error to transport code mapping.

use axum::http::StatusCode;

use dispatch_core::error::DomainError;

/// RPC status-code name for the error kind.
pub fn transport_code(error: &DomainError) -> &'static str {
    match error {
        DomainError::NotFound(_) => "not-found",
        DomainError::VersionConflict(_) => "aborted",
        DomainError::IllegalTransition(_)
        | DomainError::EconomicGuardrail(_)
        | DomainError::PricingRejected(_) => "failed-precondition",
        DomainError::InvalidArgument(_) => "invalid-argument",
        DomainError::ConfigUnavailable
        | DomainError::DeadlineExceeded(_)
        | DomainError::Unavailable(_) => "unavailable",
    }
}

pub fn http_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::VersionConflict(_) => StatusCode::CONFLICT,
        DomainError::IllegalTransition(_)
        | DomainError::EconomicGuardrail(_)
        | DomainError::PricingRejected(_) => StatusCode::PRECONDITION_FAILED,
        DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        DomainError::ConfigUnavailable
        | DomainError::DeadlineExceeded(_)
        | DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
