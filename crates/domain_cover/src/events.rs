//! Domain events for the cover engine
//!
//! Every committed operation appends exactly one event per affected token (or
//! one for an administrative change). Failed operations append nothing, so
//! the journal is an audit trail of committed state only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, CoverId, CurrencyCode, HolderId, LegacyTokenId, Money, PayoutId, TokenId};

use crate::currency::AssetHandle;
use crate::token::TokenStatus;

/// Domain events emitted by the cover engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverEvent {
    /// A purchased cover has been tokenized
    CoverIssued {
        token_id: TokenId,
        cover_id: CoverId,
        owner: HolderId,
        premium: Money,
        timestamp: DateTime<Utc>,
    },

    /// A token changed hands
    TokenTransferred {
        token_id: TokenId,
        from: HolderId,
        to: HolderId,
        timestamp: DateTime<Utc>,
    },

    /// A claim has been opened against a token
    ClaimSubmitted {
        token_id: TokenId,
        claim_id: ClaimId,
        previous_claim_id: Option<ClaimId>,
        timestamp: DateTime<Utc>,
    },

    /// The assessment verdict of a claim has been applied
    ClaimResolved {
        token_id: TokenId,
        claim_id: ClaimId,
        status: TokenStatus,
        timestamp: DateTime<Utc>,
    },

    /// The payout of an accepted claim has been transferred
    ClaimRedeemed {
        token_id: TokenId,
        payout_id: PayoutId,
        recipient: HolderId,
        amount: Money,
        timestamp: DateTime<Utc>,
    },

    /// A legacy token has been exchanged for a new token
    TokenSwapped {
        legacy_token_id: LegacyTokenId,
        token_id: TokenId,
        cover_id: CoverId,
        status: TokenStatus,
        owner: HolderId,
        timestamp: DateTime<Utc>,
    },

    /// A settlement currency has been registered
    CurrencyAdded {
        symbol: CurrencyCode,
        asset: AssetHandle,
        timestamp: DateTime<Utc>,
    },

    /// Legacy token migration has been switched on
    SwapActivated {
        by: HolderId,
        timestamp: DateTime<Utc>,
    },

    /// The admin role has been handed over
    AdminTransferred {
        from: HolderId,
        to: HolderId,
        timestamp: DateTime<Utc>,
    },
}

impl CoverEvent {
    /// Returns the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CoverEvent::CoverIssued { timestamp, .. }
            | CoverEvent::TokenTransferred { timestamp, .. }
            | CoverEvent::ClaimSubmitted { timestamp, .. }
            | CoverEvent::ClaimResolved { timestamp, .. }
            | CoverEvent::ClaimRedeemed { timestamp, .. }
            | CoverEvent::TokenSwapped { timestamp, .. }
            | CoverEvent::CurrencyAdded { timestamp, .. }
            | CoverEvent::SwapActivated { timestamp, .. }
            | CoverEvent::AdminTransferred { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the token the event concerns, if any
    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            CoverEvent::CoverIssued { token_id, .. }
            | CoverEvent::TokenTransferred { token_id, .. }
            | CoverEvent::ClaimSubmitted { token_id, .. }
            | CoverEvent::ClaimResolved { token_id, .. }
            | CoverEvent::ClaimRedeemed { token_id, .. }
            | CoverEvent::TokenSwapped { token_id, .. } => Some(*token_id),
            CoverEvent::CurrencyAdded { .. }
            | CoverEvent::SwapActivated { .. }
            | CoverEvent::AdminTransferred { .. } => None,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            CoverEvent::CoverIssued { .. } => "CoverIssued",
            CoverEvent::TokenTransferred { .. } => "TokenTransferred",
            CoverEvent::ClaimSubmitted { .. } => "ClaimSubmitted",
            CoverEvent::ClaimResolved { .. } => "ClaimResolved",
            CoverEvent::ClaimRedeemed { .. } => "ClaimRedeemed",
            CoverEvent::TokenSwapped { .. } => "TokenSwapped",
            CoverEvent::CurrencyAdded { .. } => "CurrencyAdded",
            CoverEvent::SwapActivated { .. } => "SwapActivated",
            CoverEvent::AdminTransferred { .. } => "AdminTransferred",
        }
    }
}

/// Append-only event journal
#[derive(Debug, Default)]
pub struct EventJournal {
    events: Vec<CoverEvent>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, event: CoverEvent) {
        self.events.push(event);
    }

    /// All events, oldest first
    pub fn all(&self) -> &[CoverEvent] {
        &self.events
    }

    /// Events concerning a single token, oldest first
    pub fn for_token(&self, token_id: TokenId) -> impl Iterator<Item = &CoverEvent> {
        self.events
            .iter()
            .filter(move |e| e.token_id() == Some(token_id))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
