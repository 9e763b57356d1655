//! Cover domain errors
//!
//! Every failed operation surfaces one of these synchronously and leaves the
//! engine exactly as it was before the call.

use thiserror::Error;

use core_kernel::{
    ClaimId, CoreError, CoverId, CurrencyCode, HolderId, LegacyTokenId, MoneyError, PortError,
    TemporalError, TokenId,
};

use crate::token::TokenStatus;

/// Coarse error classes callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller is not the token owner or not the admin
    Unauthorized,
    /// The token's status does not permit the operation
    InvalidStateTransition,
    /// Currency symbol missing from the registry
    UnknownCurrency,
    /// Migration has not been switched on
    SwapNotActive,
    /// One element of a batch failed
    BatchAborted,
    /// Referenced token, cover or legacy token does not exist
    NotFound,
    /// Request is malformed or conflicts with existing records
    Invalid,
    /// An external collaborator failed
    Collaborator,
}

/// Errors that can occur in the cover domain
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Unauthorized: {caller} may not {action}")]
    Unauthorized {
        caller: HolderId,
        action: &'static str,
    },

    #[error("Claim already pending for token {0}")]
    AlreadyPending(TokenId),

    #[error("Token {0} already redeemed")]
    AlreadyRedeemed(TokenId),

    #[error("Claim for token {token_id} not accepted (status {status})")]
    NotAccepted {
        token_id: TokenId,
        status: TokenStatus,
    },

    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: TokenStatus,
        to: TokenStatus,
    },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(CurrencyCode),

    #[error("Currency already registered: {0}")]
    CurrencyAlreadyRegistered(CurrencyCode),

    #[error("Invalid currency configuration: {0}")]
    InvalidCurrency(String),

    #[error("Token swap is not active")]
    SwapNotActive,

    #[error("Batch aborted at item {index} (legacy token {legacy_token_id}): {source}")]
    BatchAborted {
        index: usize,
        legacy_token_id: LegacyTokenId,
        #[source]
        source: Box<CoverError>,
    },

    #[error("Batch contains no tokens")]
    EmptyBatch,

    #[error("Legacy token {0} appears more than once in the batch")]
    DuplicateLegacyToken(LegacyTokenId),

    #[error("Legacy token {0} is already locked")]
    LegacyTokenLocked(LegacyTokenId),

    #[error("Legacy token {0} carries a status without a claim reference")]
    InconsistentLegacyToken(LegacyTokenId),

    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),

    #[error("Cover not found: {0}")]
    CoverNotFound(CoverId),

    #[error("Cover {0} is already backed by a token")]
    CoverAlreadyIssued(CoverId),

    #[error("Cover {0} exists with different terms")]
    CoverTermsMismatch(CoverId),

    #[error("Payment mismatch: expected {expected}, got {actual}")]
    PaymentMismatch {
        expected: String,
        actual: String,
    },

    #[error("Assessment returned claim {claim_id} which was already used by token {token_id}")]
    StaleClaimId {
        token_id: TokenId,
        claim_id: ClaimId,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Collaborator error: {0}")]
    Port(#[from] PortError),
}

impl CoverError {
    /// Creates an Unauthorized error
    pub fn unauthorized(caller: HolderId, action: &'static str) -> Self {
        CoverError::Unauthorized { caller, action }
    }

    /// Classifies this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoverError::Unauthorized { .. } => ErrorKind::Unauthorized,
            CoverError::AlreadyPending(_)
            | CoverError::AlreadyRedeemed(_)
            | CoverError::NotAccepted { .. }
            | CoverError::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            CoverError::UnknownCurrency(_) => ErrorKind::UnknownCurrency,
            CoverError::SwapNotActive => ErrorKind::SwapNotActive,
            CoverError::BatchAborted { .. } => ErrorKind::BatchAborted,
            CoverError::TokenNotFound(_) | CoverError::CoverNotFound(_) => ErrorKind::NotFound,
            CoverError::Port(e) if e.is_not_found() => ErrorKind::NotFound,
            CoverError::Port(_) | CoverError::StaleClaimId { .. } => ErrorKind::Collaborator,
            CoverError::CurrencyAlreadyRegistered(_)
            | CoverError::InvalidCurrency(_)
            | CoverError::EmptyBatch
            | CoverError::DuplicateLegacyToken(_)
            | CoverError::LegacyTokenLocked(_)
            | CoverError::InconsistentLegacyToken(_)
            | CoverError::CoverAlreadyIssued(_)
            | CoverError::CoverTermsMismatch(_)
            | CoverError::PaymentMismatch { .. }
            | CoverError::Configuration(_)
            | CoverError::Core(_) => ErrorKind::Invalid,
        }
    }

    /// Returns true if the token's status did not permit the operation
    pub fn is_invalid_transition(&self) -> bool {
        self.kind() == ErrorKind::InvalidStateTransition
    }

    /// Returns the failing item's error for a batch abort, or self otherwise
    pub fn root_cause(&self) -> &CoverError {
        match self {
            CoverError::BatchAborted { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<MoneyError> for CoverError {
    fn from(e: MoneyError) -> Self {
        CoverError::Core(CoreError::Money(e))
    }
}

impl From<TemporalError> for CoverError {
    fn from(e: TemporalError) -> Self {
        CoverError::Core(CoreError::Temporal(e))
    }
}

impl From<config::ConfigError> for CoverError {
    fn from(e: config::ConfigError) -> Self {
        CoverError::Configuration(e.to_string())
    }
}
