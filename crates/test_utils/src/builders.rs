//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::{ClaimId, CoverId, CoverPeriod, HolderId, LegacyTokenId, Money};
use domain_cover::{CoverQuote, LegacyCover, LegacyCoverToken, TokenStatus};

use crate::fixtures::{HolderFixtures, MoneyFixtures, PeriodFixtures};

/// Builder for priced cover quotes
pub struct CoverQuoteBuilder {
    cover_id: CoverId,
    sum_insured: Money,
    premium: Money,
    period: CoverPeriod,
}

impl CoverQuoteBuilder {
    /// Creates a builder for a 1 ETH, 90-day cover
    pub fn new(cover_id: u64) -> Self {
        Self {
            cover_id: CoverId::new(cover_id),
            sum_insured: MoneyFixtures::eth_1(),
            premium: MoneyFixtures::eth_premium(),
            period: PeriodFixtures::ninety_days(),
        }
    }

    /// A 1000 DAI cover
    pub fn dai(cover_id: u64) -> Self {
        Self::new(cover_id)
            .with_sum_insured(MoneyFixtures::dai_1000())
            .with_premium(MoneyFixtures::dai_premium())
    }

    pub fn with_sum_insured(mut self, sum_insured: Money) -> Self {
        self.sum_insured = sum_insured;
        self
    }

    pub fn with_premium(mut self, premium: Money) -> Self {
        self.premium = premium;
        self
    }

    pub fn with_period(mut self, period: CoverPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn build(self) -> CoverQuote {
        CoverQuote {
            cover_id: self.cover_id,
            sum_insured: self.sum_insured,
            premium: self.premium,
            period: self.period,
        }
    }
}

/// Builder for legacy ledger tokens
///
/// Defaults to an unlocked `Active` token held by Alice, approved for the
/// fixture bridge, covering 1 ETH under cover id `1000 + id`.
pub struct LegacyTokenBuilder {
    id: LegacyTokenId,
    owner: HolderId,
    approved: Option<HolderId>,
    locked: bool,
    cover_id: CoverId,
    sum_insured: Money,
    period: CoverPeriod,
    status: TokenStatus,
    claim_id: Option<ClaimId>,
}

impl LegacyTokenBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id: LegacyTokenId::new(id),
            owner: HolderFixtures::alice(),
            approved: Some(HolderFixtures::bridge()),
            locked: false,
            cover_id: CoverId::new(1000 + id),
            sum_insured: MoneyFixtures::eth_1(),
            period: PeriodFixtures::one_year(),
            status: TokenStatus::Active,
            claim_id: None,
        }
    }

    /// Sets the owner; approval for the bridge is kept
    pub fn owned_by(mut self, owner: HolderId) -> Self {
        self.owner = owner;
        self
    }

    /// Removes any approval
    pub fn unapproved(mut self) -> Self {
        self.approved = None;
        self
    }

    pub fn approved_for(mut self, operator: HolderId) -> Self {
        self.approved = Some(operator);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn with_cover_id(mut self, cover_id: u64) -> Self {
        self.cover_id = CoverId::new(cover_id);
        self
    }

    pub fn with_sum_insured(mut self, sum_insured: Money) -> Self {
        self.sum_insured = sum_insured;
        self
    }

    /// Sets the claim state carried by the legacy token
    pub fn with_claim(mut self, status: TokenStatus, claim_id: u64) -> Self {
        self.status = status;
        self.claim_id = Some(ClaimId::new(claim_id));
        self
    }

    /// Sets a status without touching the claim reference
    pub fn with_status(mut self, status: TokenStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> LegacyCoverToken {
        LegacyCoverToken {
            id: self.id,
            owner: self.owner,
            approved: self.approved,
            locked: self.locked,
            cover: LegacyCover {
                cover_id: self.cover_id,
                sum_insured: self.sum_insured,
                period: self.period,
            },
            status: self.status,
            claim_id: self.claim_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_builder_defaults() {
        let quote = CoverQuoteBuilder::new(1).build();
        assert_eq!(quote.cover_id, CoverId::new(1));
        assert!(quote.validate().is_ok());
    }

    #[test]
    fn test_dai_quote_is_consistent() {
        let quote = CoverQuoteBuilder::dai(2).build();
        assert_eq!(quote.currency().as_str(), "DAI");
        assert!(quote.validate().is_ok());
    }

    #[test]
    fn test_legacy_builder() {
        let token = LegacyTokenBuilder::new(3)
            .with_claim(TokenStatus::Denied, 8)
            .build();
        assert_eq!(token.cover.cover_id, CoverId::new(1003));
        assert_eq!(token.claim_id, Some(ClaimId::new(8)));
        assert!(token.is_operator(HolderFixtures::bridge()));
    }
}
