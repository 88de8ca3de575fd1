//! Domain error taxonomy shared by every service and the orchestrator.
//!
//! Errors split into *permanent* failures (invariant violations, conflicts)
//! and *transient* ones (timeouts, unavailability). The orchestrator inspects
//! [`DomainError::is_transient`] to decide between retrying a step and
//! entering compensation; permanent failures are never retried.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    VersionConflict(String),
    #[error("{0}")]
    IllegalTransition(String),
    #[error("{0}")]
    EconomicGuardrail(String),
    #[error("{0}")]
    PricingRejected(String),
    #[error("no valid pricing configuration has been loaded")]
    ConfigUnavailable,
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    DeadlineExceeded(String),
    #[error("{0}")]
    Unavailable(String),
}

impl DomainError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        DomainError::NotFound(format!("{entity} {id} not found"))
    }

    pub fn version_conflict(id: &str, expected: u64, found: u64) -> Self {
        DomainError::VersionConflict(format!(
            "version conflict on {id}: expected {expected}, found {found}"
        ))
    }

    pub fn illegal_transition(id: &str, from: &str, to: &str) -> Self {
        DomainError::IllegalTransition(format!("illegal transition for {id}: {from} -> {to}"))
    }

    /// Transient errors may succeed on retry; everything else is permanent
    /// and short-circuits to compensation.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DomainError::Unavailable(_)
                | DomainError::DeadlineExceeded(_)
                | DomainError::ConfigUnavailable
        )
    }

    /// Stable wire code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::VersionConflict(_) => "VERSION_CONFLICT",
            DomainError::IllegalTransition(_) => "ILLEGAL_TRANSITION",
            DomainError::EconomicGuardrail(_) => "ECONOMIC_GUARDRAIL",
            DomainError::PricingRejected(_) => "PRICING_REJECTED",
            DomainError::ConfigUnavailable => "CONFIG_UNAVAILABLE",
            DomainError::InvalidArgument(_) => "INVALID_ARGUMENT",
            DomainError::DeadlineExceeded(_) => "DEADLINE_EXCEEDED",
            DomainError::Unavailable(_) => "UNAVAILABLE",
        }
    }

    /// Rebuild an error from its wire code and message (the client side of
    /// [`DomainError::code`]). Unknown codes degrade to `Unavailable`.
    pub fn from_code(code: &str, message: String) -> Self {
        match code {
            "NOT_FOUND" => DomainError::NotFound(message),
            "VERSION_CONFLICT" => DomainError::VersionConflict(message),
            "ILLEGAL_TRANSITION" => DomainError::IllegalTransition(message),
            "ECONOMIC_GUARDRAIL" => DomainError::EconomicGuardrail(message),
            "PRICING_REJECTED" => DomainError::PricingRejected(message),
            "CONFIG_UNAVAILABLE" => DomainError::ConfigUnavailable,
            "INVALID_ARGUMENT" => DomainError::InvalidArgument(message),
            "DEADLINE_EXCEEDED" => DomainError::DeadlineExceeded(message),
            _ => DomainError::Unavailable(message),
        }
    }
}
