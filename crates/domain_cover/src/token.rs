//! Cover token and its claim state machine
//!
//! ```text
//! Active --submit--> ClaimSubmitted --accept--> Accepted --redeem--> Redeemed
//!                          |    ^
//!                        deny   | resubmit (new claim id)
//!                          v    |
//!                          Denied
//! ```
//!
//! Status and claim reference are only changed through the crate-private
//! transition methods below; nothing outside the domain can set them.

use std::fmt;

use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, CoverId, CurrencyCode, TokenId};

use crate::error::CoverError;

/// Claim lifecycle status of a cover token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenStatus {
    /// Cover bought, no claim outstanding
    Active,
    /// Claim opened with the assessment collaborator, verdict pending
    ClaimSubmitted,
    /// Claim accepted, payout not yet taken
    Accepted,
    /// Claim denied, may be resubmitted
    Denied,
    /// Payout taken; terminal
    Redeemed,
}

impl TokenStatus {
    /// Returns true if a claim may be submitted from this status
    pub fn accepts_submission(&self) -> bool {
        matches!(self, TokenStatus::Active | TokenStatus::Denied)
    }

    /// Returns true if the status references a claim
    pub fn requires_claim(&self) -> bool {
        !matches!(self, TokenStatus::Active)
    }

    /// Returns true for the terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, TokenStatus::Redeemed)
    }

    fn can_transition_to(&self, target: TokenStatus) -> bool {
        use TokenStatus::*;
        matches!(
            (*self, target),
            (Active, ClaimSubmitted)
                | (Denied, ClaimSubmitted)
                | (ClaimSubmitted, Accepted)
                | (ClaimSubmitted, Denied)
                | (Accepted, Redeemed)
        )
    }
}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenStatus::Active => "Active",
            TokenStatus::ClaimSubmitted => "ClaimSubmitted",
            TokenStatus::Accepted => "Accepted",
            TokenStatus::Denied => "Denied",
            TokenStatus::Redeemed => "Redeemed",
        };
        f.write_str(name)
    }
}

/// A cover position held as a non-fungible token
///
/// Ownership is tracked by the ledger, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverToken {
    id: TokenId,
    cover_id: CoverId,
    currency: CurrencyCode,
    status: TokenStatus,
    claim_id: Option<ClaimId>,
}

impl CoverToken {
    /// A freshly issued token with no claim history
    pub(crate) fn issued(id: TokenId, cover_id: CoverId, currency: CurrencyCode) -> Self {
        Self {
            id,
            cover_id,
            currency,
            status: TokenStatus::Active,
            claim_id: None,
        }
    }

    /// A token carrying over claim state from elsewhere (migration)
    pub(crate) fn restored(id: TokenId, seed: TokenSeed) -> Self {
        Self {
            id,
            cover_id: seed.cover_id,
            currency: seed.currency,
            status: seed.status,
            claim_id: seed.claim_id,
        }
    }

    pub fn id(&self) -> TokenId {
        self.id
    }

    pub fn cover_id(&self) -> CoverId {
        self.cover_id
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn status(&self) -> TokenStatus {
        self.status
    }

    pub fn claim_id(&self) -> Option<ClaimId> {
        self.claim_id
    }

    /// Checks the token may have a claim submitted against it
    pub(crate) fn ensure_claimable(&self) -> Result<(), CoverError> {
        match self.status {
            TokenStatus::ClaimSubmitted => Err(CoverError::AlreadyPending(self.id)),
            TokenStatus::Redeemed => Err(CoverError::AlreadyRedeemed(self.id)),
            status if status.accepts_submission() => Ok(()),
            status => Err(CoverError::InvalidStateTransition {
                from: status,
                to: TokenStatus::ClaimSubmitted,
            }),
        }
    }

    /// Checks the token may be redeemed
    pub(crate) fn ensure_redeemable(&self) -> Result<(), CoverError> {
        match self.status {
            TokenStatus::Accepted => Ok(()),
            TokenStatus::Redeemed => Err(CoverError::AlreadyRedeemed(self.id)),
            status => Err(CoverError::NotAccepted {
                token_id: self.id,
                status,
            }),
        }
    }

    /// Records a newly opened claim
    pub(crate) fn begin_claim(&mut self, claim_id: ClaimId) -> Result<(), CoverError> {
        self.ensure_claimable()?;
        if self.claim_id == Some(claim_id) {
            return Err(CoverError::StaleClaimId {
                token_id: self.id,
                claim_id,
            });
        }
        self.transition(TokenStatus::ClaimSubmitted)?;
        self.claim_id = Some(claim_id);
        Ok(())
    }

    /// Applies the assessment verdict of the pending claim
    pub(crate) fn settle_verdict(&mut self, accepted: bool) -> Result<(), CoverError> {
        let target = if accepted {
            TokenStatus::Accepted
        } else {
            TokenStatus::Denied
        };
        self.transition(target)
    }

    /// Marks the payout as taken
    pub(crate) fn mark_redeemed(&mut self) -> Result<(), CoverError> {
        self.ensure_redeemable()?;
        self.transition(TokenStatus::Redeemed)
    }

    /// Undoes `mark_redeemed` when the payout of the same call failed
    pub(crate) fn abort_redemption(&mut self) {
        if self.status == TokenStatus::Redeemed {
            self.status = TokenStatus::Accepted;
        }
    }

    fn transition(&mut self, target: TokenStatus) -> Result<(), CoverError> {
        if !self.status.can_transition_to(target) {
            return Err(CoverError::InvalidStateTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    /// Read-only snapshot
    pub fn view(&self) -> TokenView {
        TokenView {
            token_id: self.id,
            cover_id: self.cover_id,
            currency: self.currency,
            status: self.status,
            claim_id: self.claim_id,
        }
    }
}

/// Initial state for a token that does not start out `Active`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenSeed {
    pub cover_id: CoverId,
    pub currency: CurrencyCode,
    pub status: TokenStatus,
    pub claim_id: Option<ClaimId>,
}

/// Public view of a token returned by queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub token_id: TokenId,
    pub cover_id: CoverId,
    pub currency: CurrencyCode,
    pub status: TokenStatus,
    pub claim_id: Option<ClaimId>,
}
