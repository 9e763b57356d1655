//! Claim submission and verdict resolution
//!
//! The coordinator owns the per-token claim state machine. It never decides a
//! claim itself; it opens claims with the assessment collaborator and applies
//! whatever verdict that collaborator reports.

use std::sync::Arc;

use tracing::{debug, info, warn};

use core_kernel::{ClaimId, HolderId, TokenId};

use crate::error::CoverError;
use crate::ledger::CoverLedger;
use crate::ports::{AssessmentPort, Verdict};
use crate::token::TokenStatus;

/// A newly opened claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedClaim {
    pub token_id: TokenId,
    pub claim_id: ClaimId,
    pub previous_claim_id: Option<ClaimId>,
}

/// Result of polling a claim's verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub token_id: TokenId,
    pub claim_id: Option<ClaimId>,
    /// Status after the poll
    pub status: TokenStatus,
    /// True if the poll moved the token out of `ClaimSubmitted`
    pub changed: bool,
}

impl Resolution {
    fn unchanged(token_id: TokenId, claim_id: Option<ClaimId>, status: TokenStatus) -> Self {
        Self {
            token_id,
            claim_id,
            status,
            changed: false,
        }
    }
}

/// Drives tokens through submission and verdict
pub struct ClaimCoordinator {
    assessment: Arc<dyn AssessmentPort>,
}

impl ClaimCoordinator {
    pub fn new(assessment: Arc<dyn AssessmentPort>) -> Self {
        Self { assessment }
    }

    /// Opens a claim against a token held by `caller`
    ///
    /// Valid from `Active` or `Denied`. The token is only touched after the
    /// assessment collaborator has issued a claim id different from the one
    /// the token already carries.
    pub async fn submit_claim(
        &self,
        ledger: &mut CoverLedger,
        token_id: TokenId,
        caller: HolderId,
    ) -> Result<SubmittedClaim, CoverError> {
        let token = ledger.owned_by(token_id, caller, "submit claim")?;
        token.ensure_claimable()?;
        let cover_id = token.cover_id();
        let previous_claim_id = token.claim_id();

        let claim_id = self.assessment.open_claim(token_id, cover_id).await?;

        if let Err(e) = ledger.get_mut(token_id)?.begin_claim(claim_id) {
            warn!(%token_id, %claim_id, error = %e, "Claim id rejected");
            return Err(e);
        }

        info!(%token_id, %cover_id, %claim_id, "Claim submitted");
        Ok(SubmittedClaim {
            token_id,
            claim_id,
            previous_claim_id,
        })
    }

    /// Polls the verdict of the token's pending claim
    ///
    /// Anyone may call this. Outside `ClaimSubmitted`, and while the verdict
    /// is still `Pending`, the token is left untouched.
    pub async fn resolve_verdict(
        &self,
        ledger: &mut CoverLedger,
        token_id: TokenId,
    ) -> Result<Resolution, CoverError> {
        let token = ledger.get(token_id)?;
        let status = token.status();
        let claim_id = token.claim_id();

        let pending_claim = match (status, claim_id) {
            (TokenStatus::ClaimSubmitted, Some(claim_id)) => claim_id,
            _ => {
                debug!(%token_id, %status, "No pending claim to resolve");
                return Ok(Resolution::unchanged(token_id, claim_id, status));
            }
        };

        let accepted = match self.assessment.get_verdict(pending_claim).await? {
            Verdict::Pending => {
                debug!(%token_id, claim_id = %pending_claim, "Verdict still pending");
                return Ok(Resolution::unchanged(token_id, claim_id, status));
            }
            Verdict::Accepted => true,
            Verdict::Denied => false,
        };

        let token = ledger.get_mut(token_id)?;
        token.settle_verdict(accepted)?;
        let status = token.status();

        info!(%token_id, claim_id = %pending_claim, %status, "Claim resolved");
        Ok(Resolution {
            token_id,
            claim_id,
            status,
            changed: true,
        })
    }
}
